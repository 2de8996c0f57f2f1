//! # shellkit
//!
//! A single, stable contract for running shell commands and inspecting the
//! filesystem. Every command runs to completion and is reported as an
//! [`ExecResult`]: a success flag, an exit code and, for captured runs, the
//! merged stdout/stderr text. How the host reports completion (a raw encoded
//! status word or a separate flag/kind/code) is hidden behind the executors.
//!
//! Probes (`file_exists`, `which`, `calculate_md5`, ...) report expected failures
//! as `false`/`None`. Calls with malformed arguments (`copy_file`, `is_symlink`)
//! fail with a typed error.

pub mod config;
pub mod constants;
pub mod core;
pub mod guard;
pub mod models;
pub mod system;

pub use crate::core::{
    file_ops::{FileOpsError, copy_file},
    fs_probe::{
        ProbeError, directory_exists, file_exists, find, find_glob, is_symlink, list_files,
    },
    permissions::{PermissionParseError, mode_to_symbolic, symbolic_permissions_to_mode},
    tools::{calculate_md5, hostname, ping, which},
};
pub use guard::{GuardOutcome, run_guarded};
pub use models::{CompletionShape, CopyReport, ExecResult, ProcessCompletion};
pub use system::{
    executor::{CommandExecutor, ExecutionError, OutputCapturingExecutor, execute, run_captured},
    quote::quote,
};
