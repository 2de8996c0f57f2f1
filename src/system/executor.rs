// src/system/executor.rs

//! Executors that run command strings through the shell.

use crate::{
    config::{self, Settings},
    constants::{DEFAULT_SHELL, INTERRUPTED_EXIT_CODE},
    models::{CompletionShape, ExecResult},
    system::{
        capture::{CaptureStrategy, strategy_for},
        completion::{CompletionDecoder, decoder_for},
    },
};
use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Failure of a command whose result was checked with [`ExecResult::into_checked`].
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The shell process could not be started.
    #[error("Command '{0}' could not be started.")]
    LaunchFailed(String),
    /// The command ran and exited with a non-zero code.
    #[error("Command '{command}' exited with code {code}.")]
    NonZeroExitStatus {
        /// The command as given by the caller.
        command: String,
        /// Its exit code.
        code: i32,
    },
    /// The command was stopped by Ctrl+C.
    #[error("Command '{command}' was interrupted.")]
    Interrupted {
        /// The command as given by the caller.
        command: String,
    },
}

impl ExecResult {
    /// Converts the result into an error when the command did not succeed.
    ///
    /// A launch failure becomes [`ExecutionError::LaunchFailed`], exit code 130
    /// (`SIGINT` as reported by a shell) becomes [`ExecutionError::Interrupted`] and
    /// any other non-zero code becomes [`ExecutionError::NonZeroExitStatus`].
    pub fn into_checked(self, command: &str) -> Result<Self, ExecutionError> {
        if self.is_launch_failure() {
            return Err(ExecutionError::LaunchFailed(command.to_string()));
        }
        if self.success {
            return Ok(self);
        }
        if self.code == INTERRUPTED_EXIT_CODE {
            return Err(ExecutionError::Interrupted {
                command: command.to_string(),
            });
        }
        Err(ExecutionError::NonZeroExitStatus {
            command: command.to_string(),
            code: self.code,
        })
    }
}

fn shell_command(shell: &Path, script: &str) -> Command {
    let mut command = Command::new(dunce::simplified(shell));
    command.arg("-c").arg(script);
    command
}

// --- Command Executor ---

/// Runs a command through the shell and waits for it, without capturing output.
///
/// The child inherits the caller's standard streams. The command string is handed
/// to the shell unchanged, including empty or blank strings.
#[derive(Debug)]
pub struct CommandExecutor {
    shell: PathBuf,
    decoder: Box<dyn CompletionDecoder>,
}

impl CommandExecutor {
    /// Creates an executor that runs commands with `shell -c` and decodes their
    /// status in the given shape.
    pub fn new(shell: impl Into<PathBuf>, shape: CompletionShape) -> Self {
        Self {
            shell: shell.into(),
            decoder: decoder_for(shape),
        }
    }

    /// The completion shape this executor decodes.
    pub fn shape(&self) -> CompletionShape {
        self.decoder.shape()
    }

    /// Runs `command` to completion and normalizes how it ended.
    pub fn execute(&self, command: &str) -> ExecResult {
        log::debug!("Executing: {}", command);
        let status = match shell_command(&self.shell, command).status() {
            Ok(status) => status,
            Err(e) => {
                log::debug!("Could not start '{}': {}", command, e);
                return ExecResult::launch_failure(false);
            }
        };
        let result = ExecResult::completed(self.decoder.decode(&status));
        log::debug!(
            "'{}' finished: success={}, code={}",
            command,
            result.success,
            result.code
        );
        result
    }
}

// --- Output Capturing Executor ---

/// Runs a command through the shell and captures stdout and stderr as one
/// interleaved text.
///
/// Output is read to EOF in one go and decoded lossily as UTF-8. Stdin is closed.
#[derive(Debug)]
pub struct OutputCapturingExecutor {
    shell: PathBuf,
    shape: CompletionShape,
    strategy: Box<dyn CaptureStrategy>,
}

impl OutputCapturingExecutor {
    /// Creates a capturing executor. `sentinel_prefix` is only used by the
    /// encoded-status shape.
    pub fn new(shell: impl Into<PathBuf>, shape: CompletionShape, sentinel_prefix: &str) -> Self {
        Self {
            shell: shell.into(),
            shape,
            strategy: strategy_for(shape, sentinel_prefix),
        }
    }

    /// The completion shape this executor decodes.
    pub fn shape(&self) -> CompletionShape {
        self.shape
    }

    /// Runs `command` to completion and returns its merged output.
    ///
    /// If the process cannot be opened the result is a launch failure whose output
    /// is `"Cannot open process"`.
    pub fn run_captured(&self, command: &str) -> ExecResult {
        log::debug!("Executing with capture: {}", command);
        let script = self.strategy.prepare(command);
        let output = match shell_command(&self.shell, &script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                log::debug!("Could not open process for '{}': {}", command, e);
                return ExecResult::launch_failure(true);
            }
        };
        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        let result = self.strategy.finish(text, &output.status);
        log::debug!(
            "'{}' finished: success={}, code={}, {} bytes of output",
            command,
            result.success,
            result.code,
            result.output_str().len()
        );
        result
    }
}

// --- Process-wide executors ---

/// The executors built once from [`config::active_settings`].
#[derive(Debug)]
pub struct Executors {
    /// Runs commands without capturing output.
    pub command: CommandExecutor,
    /// Runs commands and captures their merged output.
    pub capturing: OutputCapturingExecutor,
}

impl Executors {
    /// Builds both executors from `settings`, sharing one shell and shape.
    ///
    /// A shell path that cannot be expanded is logged and replaced by `/bin/sh`.
    pub fn from_settings(settings: &Settings) -> Self {
        let shell = settings.shell_path().unwrap_or_else(|e| {
            log::warn!("Invalid shell setting, using {}: {}", DEFAULT_SHELL, e);
            PathBuf::from(DEFAULT_SHELL)
        });
        let shape = settings.shape();
        Self {
            command: CommandExecutor::new(shell.clone(), shape),
            capturing: OutputCapturingExecutor::new(shell, shape, &settings.sentinel_prefix),
        }
    }
}

lazy_static! {
    static ref EXECUTORS: Executors = Executors::from_settings(config::active_settings());
}

/// The process-wide executors.
pub fn executors() -> &'static Executors {
    &EXECUTORS
}

/// Runs `command` with the process-wide [`CommandExecutor`].
pub fn execute(command: &str) -> ExecResult {
    EXECUTORS.command.execute(command)
}

/// Runs `command` with the process-wide [`OutputCapturingExecutor`].
pub fn run_captured(command: &str) -> ExecResult {
    EXECUTORS.capturing.run_captured(command)
}
