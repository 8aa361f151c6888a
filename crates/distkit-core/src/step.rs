use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// StepKind
// ---------------------------------------------------------------------------

/// The six build steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Cleanup,
    StyleCheck,
    Test,
    Lint,
    Compile,
    Distribute,
}

impl StepKind {
    pub fn all() -> &'static [StepKind] {
        &[
            StepKind::Cleanup,
            StepKind::StyleCheck,
            StepKind::Test,
            StepKind::Lint,
            StepKind::Compile,
            StepKind::Distribute,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Cleanup => "cleanup",
            StepKind::StyleCheck => "style_check",
            StepKind::Test => "test",
            StepKind::Lint => "lint",
            StepKind::Compile => "compile",
            StepKind::Distribute => "distribute",
        }
    }

    /// Console label printed when the step starts.
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::StyleCheck => "check code style",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

/// An external command: program name plus argument list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Space-joined command line, for messages only.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepAction {
    /// Empty (or create) the build root.
    Cleanup,
    Exec(Invocation),
    /// Stage compiled output, manifest and sources into the dist directory.
    Distribute,
}

/// One unit of the build sequence. Built once from config, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub kind: StepKind,
    pub action: StepAction,
    pub failure_message: String,
}

impl Step {
    pub fn exec(kind: StepKind, invocation: Invocation, failure_message: impl Into<String>) -> Self {
        Self {
            kind,
            action: StepAction::Exec(invocation),
            failure_message: failure_message.into(),
        }
    }

    pub fn cleanup() -> Self {
        Self {
            kind: StepKind::Cleanup,
            action: StepAction::Cleanup,
            failure_message: "cleanup failed".to_string(),
        }
    }

    pub fn distribute() -> Self {
        Self {
            kind: StepKind::Distribute,
            action: StepAction::Distribute,
            failure_message: "distribute failed".to_string(),
        }
    }

    /// What the step runs, as shown by `distkit plan`.
    pub fn describe(&self) -> String {
        match &self.action {
            StepAction::Cleanup => "(builtin) empty build directory".to_string(),
            StepAction::Exec(inv) => inv.command_line(),
            StepAction::Distribute => "(builtin) stage distribution".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
