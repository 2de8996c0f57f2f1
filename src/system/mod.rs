//! # Process Execution Layer
//!
//! This module is the boundary between callers and the host's process primitives.
//! Every command string is run through a POSIX shell and its completion is
//! normalized into an [`ExecResult`](crate::models::ExecResult).
//!
//! ## Modules
//!
//! - **`quote`**: Single-quote escaping for values interpolated into command strings.
//! - **`completion`**: Decoders for the two ways a host reports a finished process
//!   (a raw encoded status word, or a completion flag / kind / code triple).
//! - **`capture`**: Strategies for merged-output capture. The sentinel strategy
//!   recovers the exit code from a marker line when the status cannot be trusted.
//! - **`executor`**: The `CommandExecutor` and `OutputCapturingExecutor`, plus the
//!   process-wide instances built once from the active settings.

pub mod capture;
pub mod completion;
pub mod executor;
pub mod quote;
