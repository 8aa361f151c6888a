//! The build pipeline: six fixed steps, run in order, halting at the first
//! failure.
//!
//! ```text
//! cleanup → style_check → test → lint → compile → distribute → done
//!    └───────────┴──────────┴──────┴───────┴──────────┴──→ failed
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::config::{Config, LayoutConfig};
use crate::error::{DistkitError, Result};
use crate::process::ProcessRunner;
use crate::stage;
use crate::step::{Step, StepAction, StepKind};

// ---------------------------------------------------------------------------
// Observer
// ---------------------------------------------------------------------------

/// Progress callbacks. All methods default to no-ops.
pub trait PipelineObserver {
    fn step_started(&mut self, _step: &Step) {}
    fn step_finished(&mut self, _step: &Step, _elapsed: Duration) {}
    fn step_failed(&mut self, _step: &Step, _error: &DistkitError) {}
}

pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: StepKind,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Success,
    Failed { step: StepKind, exit_code: i32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Steps that completed successfully, in order.
    pub steps: Vec<StepRecord>,
    pub outcome: PipelineOutcome,
}

/// A run that stopped early. Carries the steps that did complete.
#[derive(Debug, Error)]
#[error("{step} failed: {error}")]
pub struct PipelineFailure {
    pub step: StepKind,
    pub completed: Vec<StepRecord>,
    pub error: DistkitError,
}

impl PipelineFailure {
    pub fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }

    pub fn outcome(&self) -> PipelineOutcome {
        PipelineOutcome::Failed {
            step: self.step,
            exit_code: self.exit_code(),
        }
    }

    pub fn report(&self) -> PipelineReport {
        PipelineReport {
            steps: self.completed.clone(),
            outcome: self.outcome(),
        }
    }
}

// ---------------------------------------------------------------------------
// BuildPipeline
// ---------------------------------------------------------------------------

pub struct BuildPipeline {
    root: PathBuf,
    layout: LayoutConfig,
    steps: Vec<Step>,
}

impl BuildPipeline {
    /// Fails with [`DistkitError::InvalidConfig`] when the config has
    /// error-level validation problems; nothing is touched in that case.
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Result<Self> {
        if let Some(errors) = config.blocking_errors() {
            return Err(DistkitError::InvalidConfig(errors));
        }
        Ok(Self {
            root: root.into(),
            layout: config.layout.clone(),
            steps: config.steps(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The steps in execution order, without running anything.
    pub fn plan(&self) -> &[Step] {
        &self.steps
    }

    /// Run one step to completion.
    pub fn run_step(&self, step: &Step, runner: &dyn ProcessRunner) -> Result<()> {
        match &step.action {
            StepAction::Cleanup => stage::empty_dir(&self.root.join(&self.layout.build)),
            StepAction::Exec(invocation) => {
                let status = runner.spawn(&invocation.program, &invocation.args, &self.root)?;
                if status.success() {
                    Ok(())
                } else {
                    Err(DistkitError::StepFailed {
                        step: step.kind,
                        message: step.failure_message.clone(),
                        command: invocation.command_line(),
                        code: status.code(),
                    })
                }
            }
            StepAction::Distribute => stage::distribute(&self.root, &self.layout),
        }
    }

    /// Run every step in order. The first failure ends the run.
    pub fn build(
        &self,
        runner: &dyn ProcessRunner,
        observer: &mut dyn PipelineObserver,
    ) -> std::result::Result<PipelineReport, PipelineFailure> {
        let mut completed = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            observer.step_started(step);
            let started = Instant::now();

            if let Err(error) = self.run_step(step, runner) {
                tracing::warn!(step = %step.kind, %error, "step failed");
                observer.step_failed(step, &error);
                return Err(PipelineFailure {
                    step: step.kind,
                    completed,
                    error,
                });
            }

            let elapsed = started.elapsed();
            tracing::info!(step = %step.kind, duration_ms = elapsed.as_millis() as u64, "step finished");
            observer.step_finished(step, elapsed);
            completed.push(StepRecord {
                step: step.kind,
                duration_ms: elapsed.as_millis() as u64,
            });
        }

        Ok(PipelineReport {
            steps: completed,
            outcome: PipelineOutcome::Success,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
