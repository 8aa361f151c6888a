//! External process spawning for build steps.
//!
//! All OS-specific behavior lives here: the Windows `.cmd` suffix and the
//! search path used to resolve tool names. The pipeline only sees the
//! [`ProcessRunner`] trait, which lets tests swap in a recording fake.

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{DistkitError, Result};
use crate::paths;

/// Result code of a finished child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    code: Option<i32>,
}

impl ExitStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// A child that was terminated by a signal and has no exit code.
    pub fn terminated() -> Self {
        Self { code: None }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Spawns a program with inherited stdio and blocks until it exits.
pub trait ProcessRunner {
    /// Errors only when the program cannot be launched at all; a program
    /// that runs and fails is reported through the returned status.
    fn spawn(&self, program: &str, args: &[String], cwd: &Path) -> Result<ExitStatus>;
}

// ---------------------------------------------------------------------------
// Platform helpers
// ---------------------------------------------------------------------------

/// Tool name as launched on the current platform.
pub fn platform_program(name: &str) -> Cow<'_, str> {
    program_for(name, cfg!(windows))
}

/// npm installs `.cmd` shims on Windows; bare names need the suffix there.
pub fn program_for(name: &str, windows: bool) -> Cow<'_, str> {
    if windows && Path::new(name).extension().is_none() {
        Cow::Owned(format!("{name}.cmd"))
    } else {
        Cow::Borrowed(name)
    }
}

/// `<root>/node_modules/.bin` followed by the entries of `PATH`.
pub fn search_path(root: &Path) -> Option<OsString> {
    let mut dirs = vec![paths::local_bin_dir(root)];
    if let Some(path) = std::env::var_os("PATH") {
        dirs.extend(std::env::split_paths(&path));
    }
    std::env::join_paths(dirs).ok()
}

/// Resolve `program` to an executable path, relative names against `root`.
pub fn resolve_program(program: &str, root: &Path) -> Result<PathBuf> {
    let name = platform_program(program);
    which::which_in(name.as_ref(), search_path(root), root).map_err(|e| DistkitError::Launch {
        program: program.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()),
    })
}

// ---------------------------------------------------------------------------
// SystemRunner
// ---------------------------------------------------------------------------

/// Runs real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn spawn(&self, program: &str, args: &[String], cwd: &Path) -> Result<ExitStatus> {
        let resolved = resolve_program(program, cwd)?;
        tracing::debug!(program, resolved = %resolved.display(), ?args, "spawning");

        let status = Command::new(&resolved)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| DistkitError::Launch {
                program: program.to_string(),
                source,
            })?;

        Ok(status.into())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
