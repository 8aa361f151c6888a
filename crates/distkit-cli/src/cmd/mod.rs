pub mod build;
pub mod config;
pub mod copy;
pub mod plan;
