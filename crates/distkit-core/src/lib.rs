pub mod clipboard;
pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod pipeline;
pub mod process;
pub mod stage;
pub mod step;

pub use error::{DistkitError, Result};
