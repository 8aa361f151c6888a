use std::path::PathBuf;

use thiserror::Error;

use crate::step::StepKind;

#[derive(Debug, Error)]
pub enum DistkitError {
    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}\nnon-zero exit code returned, code={}, command={command}", display_code(.code))]
    StepFailed {
        step: StepKind,
        message: String,
        command: String,
        /// `None` when the child was terminated by a signal.
        code: Option<i32>,
    },

    #[error("{op} failed for {}: {source}", .path.display())]
    Fs {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "signal".to_string(),
    }
}

impl DistkitError {
    pub(crate) fn fs(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DistkitError::Fs {
            op,
            path: path.into(),
            source,
        }
    }

    /// Process exit code to report for this error.
    ///
    /// A failing tool's own code is propagated; everything else maps to `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            DistkitError::StepFailed {
                code: Some(c), ..
            } if *c != 0 => *c,
            _ => 1,
        }
    }

    /// The step this error aborted, if it came from a step.
    pub fn failed_step(&self) -> Option<StepKind> {
        match self {
            DistkitError::StepFailed { step, .. } => Some(*step),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DistkitError>;
