use crate::domain::model::{LaunchOutcome, LaunchPlan};
use crate::domain::ports::ProcessRunner;
use crate::utils::error::{LauncherError, Result};
use chrono::Local;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Instant;
use tokio::process::Command;

/// Spawns the entry point with the plan's working directory and environment
/// overlay. Stdio is inherited; whatever the child prints goes straight to the
/// launcher's terminal.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

fn prepend_to_path(prepend: &[PathBuf]) -> Result<OsString> {
    let current = env::var_os("PATH").unwrap_or_default();
    let merged = prepend.iter().cloned().chain(env::split_paths(&current));

    env::join_paths(merged).map_err(|e| LauncherError::ActivationError {
        message: format!("Cannot build PATH for the child process: {}", e),
    })
}

impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, plan: &LaunchPlan) -> Result<LaunchOutcome> {
        let started_at = Local::now();
        let started = Instant::now();

        let mut command = Command::new(&plan.program);
        command.args(&plan.args).current_dir(&plan.working_dir);

        if !plan.path_prepend.is_empty() {
            command.env("PATH", prepend_to_path(&plan.path_prepend)?);
        }

        for (key, value) in &plan.env_vars {
            command.env(key, value);
        }

        tracing::info!(
            program = %plan.program,
            working_dir = %plan.working_dir.display(),
            "Invoking entry point",
        );

        let status = command
            .status()
            .await
            .map_err(|e| LauncherError::SpawnError {
                program: plan.program.clone(),
                source: e,
            })?;

        let outcome = LaunchOutcome {
            exit_code: status.code(),
            started_at,
            duration: started.elapsed(),
        };

        if status.success() {
            tracing::info!(
                elapsed_ms = outcome.duration.as_millis() as u64,
                "Entry point exited normally",
            );
        } else {
            tracing::warn!(
                exit_code = ?outcome.exit_code,
                "Entry point exited with a failure status",
            );
        }

        Ok(outcome)
    }
}
