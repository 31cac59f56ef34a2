//! Invocation of the external dependency manager.
//!
//! The dependency manager is opaque: each configured step is run to
//! completion and its exit status is recorded, but nothing downstream reacts
//! to it. All process launching goes through [`SetupRunner`] so the bootstrap
//! sequence stays the same on every platform and can be driven by a fake in
//! tests.

use crate::config::ProvisionConfig;
use serde::Serialize;
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs one external setup command in the project root.
pub trait SetupRunner {
    /// Whether `program` can be launched at all.
    fn available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    /// Run `program args...` with `root` as working directory and wait for it.
    /// Returns the exit code, or `None` when the process was ended by a signal.
    fn run(&mut self, root: &Path, program: &str, args: &[String]) -> std::io::Result<Option<i32>>;
}

/// Launches real processes attached to our terminal, so the dependency
/// manager can still prompt (for example before replacing an existing `.venv`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner {
    /// Route the child's stdout to our stderr, keeping our own stdout clean
    /// for machine-readable output.
    pub stdout_to_stderr: bool,
}

impl SetupRunner for ProcessRunner {
    fn run(&mut self, root: &Path, program: &str, args: &[String]) -> std::io::Result<Option<i32>> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(root).stdin(Stdio::inherit());
        if self.stdout_to_stderr {
            cmd.stdout(std::io::stderr());
        }
        let status = cmd.status()?;
        Ok(status.code())
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub args: Vec<String>,
    pub exit_code: Option<i32>,
    /// Set when the process could not be launched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepResult {
    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.exit_code == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProvisionOutcome {
    Ran {
        program: String,
        steps: Vec<StepResult>,
    },
    /// The dependency manager is not installed.
    NotFound { program: String },
    Skipped,
}

/// Run every configured step in order. Failures are recorded, never returned:
/// a failed step does not stop the following ones.
pub fn provision<R: SetupRunner + ?Sized>(
    runner: &mut R,
    root: &Path,
    cfg: &ProvisionConfig,
) -> ProvisionOutcome {
    if !runner.available(&cfg.program) {
        tracing::warn!(program = %cfg.program, "dependency manager not found on PATH");
        return ProvisionOutcome::NotFound {
            program: cfg.program.clone(),
        };
    }

    let mut steps = Vec::with_capacity(cfg.steps.len());
    for args in &cfg.steps {
        tracing::debug!(program = %cfg.program, ?args, "running setup step");
        let step = match runner.run(root, &cfg.program, args) {
            Ok(exit_code) => StepResult {
                args: args.clone(),
                exit_code,
                error: None,
            },
            Err(e) => {
                tracing::warn!(program = %cfg.program, ?args, "failed to launch: {e}");
                StepResult {
                    args: args.clone(),
                    exit_code: None,
                    error: Some(e.to_string()),
                }
            }
        };
        steps.push(step);
    }

    ProvisionOutcome::Ran {
        program: cfg.program.clone(),
        steps,
    }
}
