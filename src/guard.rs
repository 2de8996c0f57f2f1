// src/guard.rs

//! Guarded entry point for embedding callers.
//!
//! A routine run through [`run_guarded`] never takes the host process down. An
//! interruption ([`ExecutionError::Interrupted`], e.g. a user pressing Ctrl+C in a
//! child) is absorbed silently; every other error is printed to stderr.

use crate::system::executor::ExecutionError;
use anyhow::Result;
use colored::Colorize;

/// How a guarded routine ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The routine returned `Ok`.
    Completed,
    /// The routine was stopped by an interrupted command.
    Interrupted,
    /// The routine failed; holds the message shown to the user.
    Failed(String),
}

/// Runs `routine`, absorbing interruptions and reporting any other failure.
pub fn run_guarded<F>(routine: F) -> GuardOutcome
where
    F: FnOnce() -> Result<()>,
{
    match routine() {
        Ok(()) => GuardOutcome::Completed,
        Err(e) => {
            if is_interruption(&e) {
                log::debug!("Routine interrupted: {}", e);
                return GuardOutcome::Interrupted;
            }
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
            GuardOutcome::Failed(format!("{:#}", e))
        }
    }
}

fn is_interruption(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<ExecutionError>(),
            Some(ExecutionError::Interrupted { .. })
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::executor::CommandExecutor;
    use crate::models::CompletionShape;
    use anyhow::{Context, anyhow};

    #[test]
    fn test_completed_routine() {
        assert_eq!(run_guarded(|| Ok(())), GuardOutcome::Completed);
    }

    #[test]
    fn test_interruption_is_absorbed() {
        let outcome = run_guarded(|| {
            Err(ExecutionError::Interrupted {
                command: "sleep 10".to_string(),
            })?
        });
        assert_eq!(outcome, GuardOutcome::Interrupted);
    }

    #[test]
    fn test_wrapped_interruption_is_absorbed() {
        let outcome = run_guarded(|| {
            let executor = CommandExecutor::new("/bin/sh", CompletionShape::TriValue);
            executor
                .execute("exit 130")
                .into_checked("exit 130")
                .context("while running the build step")?;
            Ok(())
        });
        assert_eq!(outcome, GuardOutcome::Interrupted);
    }

    #[test]
    fn test_other_failures_are_reported() {
        let outcome = run_guarded(|| Err(anyhow!("disk on fire")));
        assert_eq!(outcome, GuardOutcome::Failed("disk on fire".to_string()));

        let outcome = run_guarded(|| {
            Err(ExecutionError::NonZeroExitStatus {
                command: "false".to_string(),
                code: 1,
            })?
        });
        assert!(matches!(outcome, GuardOutcome::Failed(msg) if msg.contains("exited with code 1")));
    }
}
