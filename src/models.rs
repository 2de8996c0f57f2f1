// src/models.rs

//! Values returned by the executors and file operations.

use crate::constants::{LAUNCH_FAILURE_CODE, LAUNCH_FAILURE_MESSAGE};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

// --- Completion ---

/// Selects how the host reports a finished process.
///
/// The shape is chosen once per executor and never re-checked per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionShape {
    /// A single raw wait-status word packing termination kind and exit code.
    /// The exit code is recovered as `floor(raw / 256)`. Captured output carries
    /// its exit code through a sentinel line instead.
    EncodedStatus,
    /// A completion flag, a termination kind and an exit code reported separately.
    TriValue,
}

impl CompletionShape {
    /// The shape used when nothing else is configured.
    pub fn platform_default() -> Self {
        Self::TriValue
    }

    /// The configuration spelling of this shape.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EncodedStatus => "encoded-status",
            Self::TriValue => "tri-value",
        }
    }
}

impl fmt::Display for CompletionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompletionShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "encoded-status" | "encoded" | "legacy" => Ok(Self::EncodedStatus),
            "tri-value" | "trivalue" => Ok(Self::TriValue),
            other => Err(format!(
                "unknown completion shape '{}' (expected 'encoded-status' or 'tri-value')",
                other
            )),
        }
    }
}

/// The normalized outcome of a finished process, independent of the shape
/// the host used to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessCompletion {
    /// `true` only for a normal exit with code 0.
    pub success: bool,
    /// The exit code, or the fallback code of an abnormal end.
    pub code: i32,
}

impl ProcessCompletion {
    /// A completion for a process that exited normally with `code`.
    pub fn exited(code: i32) -> Self {
        Self {
            success: code == 0,
            code,
        }
    }

    /// A completion for a process that did not finish normally.
    /// Never successful, even when `code` is zero.
    pub fn abnormal(code: Option<i32>) -> Self {
        Self {
            success: false,
            code: code.unwrap_or(LAUNCH_FAILURE_CODE),
        }
    }
}

// --- Results ---

/// The result of running one command to completion.
///
/// `success` implies `code == 0`. `output` is only present for captured runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Whether the command succeeded.
    pub success: bool,
    /// The command's exit code; 1 when the process could not be started.
    pub code: i32,
    /// Merged stdout and stderr of a captured run.
    pub output: Option<String>,
    launched: bool,
}

impl ExecResult {
    /// A result for a process that ran, without captured output.
    pub fn completed(completion: ProcessCompletion) -> Self {
        Self {
            success: completion.success,
            code: completion.code,
            output: None,
            launched: true,
        }
    }

    /// A result for a process that ran, carrying its merged output.
    pub fn captured(completion: ProcessCompletion, output: String) -> Self {
        Self {
            output: Some(output),
            ..Self::completed(completion)
        }
    }

    /// The result for a command whose process could not be started.
    /// Captured runs carry the fixed [`LAUNCH_FAILURE_MESSAGE`] as output.
    pub fn launch_failure(with_output: bool) -> Self {
        Self {
            success: false,
            code: LAUNCH_FAILURE_CODE,
            output: with_output.then(|| LAUNCH_FAILURE_MESSAGE.to_string()),
            launched: false,
        }
    }

    /// `true` when the process never started.
    pub fn is_launch_failure(&self) -> bool {
        !self.launched
    }

    /// Captured output, or an empty string for uncaptured runs.
    pub fn output_str(&self) -> &str {
        self.output.as_deref().unwrap_or_default()
    }
}

/// What `copy_file` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyReport {
    /// Number of bytes written to the destination.
    pub bytes_copied: u64,
    /// Whether the source's permission bits were applied to the destination.
    /// A failure here never fails the copy itself.
    pub permissions_propagated: bool,
}
