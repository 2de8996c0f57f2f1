// src/system/completion.rs

//! Decoders turning a host exit status into a [`ProcessCompletion`].
//!
//! Two strategies exist, one per [`CompletionShape`]. An executor picks one when it
//! is built and uses it for every call.

use crate::{
    constants::LAUNCH_FAILURE_CODE,
    models::{CompletionShape, ProcessCompletion},
};
use std::fmt;
use std::process::ExitStatus;

/// Normalizes a finished process's status.
pub trait CompletionDecoder: fmt::Debug + Send + Sync {
    /// The shape this decoder understands.
    fn shape(&self) -> CompletionShape;

    /// Decodes the status of a process that was started and waited for.
    fn decode(&self, status: &ExitStatus) -> ProcessCompletion;
}

/// Returns the decoder for `shape`.
pub fn decoder_for(shape: CompletionShape) -> Box<dyn CompletionDecoder> {
    match shape {
        CompletionShape::EncodedStatus => Box::new(EncodedStatusDecoder),
        CompletionShape::TriValue => Box::new(TriValueDecoder),
    }
}

// --- Encoded status ---

/// Decodes a raw POSIX wait-status word.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodedStatusDecoder;

impl EncodedStatusDecoder {
    /// Decodes `raw` as `code = floor(raw / 256)`.
    ///
    /// The low seven bits hold the terminating signal; when they are set the
    /// process did not exit normally and the completion is never successful.
    pub fn decode_raw(raw: i32) -> ProcessCompletion {
        let code = raw.div_euclid(256);
        if raw & 0x7f == 0 {
            ProcessCompletion::exited(code)
        } else {
            ProcessCompletion::abnormal(Some(code))
        }
    }
}

impl CompletionDecoder for EncodedStatusDecoder {
    fn shape(&self) -> CompletionShape {
        CompletionShape::EncodedStatus
    }

    fn decode(&self, status: &ExitStatus) -> ProcessCompletion {
        Self::decode_raw(raw_status(status))
    }
}

#[cfg(unix)]
fn raw_status(status: &ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.into_raw()
}

// No raw word outside Unix: rebuild one from the reported code.
#[cfg(not(unix))]
fn raw_status(status: &ExitStatus) -> i32 {
    status
        .code()
        .and_then(|code| code.checked_mul(256))
        .unwrap_or(LAUNCH_FAILURE_CODE)
}

// --- Tri-value ---

/// How a process ended, as reported by a tri-value host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationKind {
    /// The process exited on its own.
    Exit,
    /// The process was killed by a signal.
    Signal,
}

/// Decodes a `(completed, kind, code)` status.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriValueDecoder;

impl TriValueDecoder {
    /// Normalizes the three parts. The kind does not influence the result.
    ///
    /// A process that did not complete normally is a failure carrying the code
    /// it reported, or [`LAUNCH_FAILURE_CODE`] if none.
    pub fn decode_parts(
        completed: bool,
        _kind: TerminationKind,
        code: Option<i32>,
    ) -> ProcessCompletion {
        if !completed {
            return ProcessCompletion::abnormal(code);
        }
        ProcessCompletion::exited(code.unwrap_or(LAUNCH_FAILURE_CODE))
    }

    /// Splits a host status into its three parts.
    pub fn split(status: &ExitStatus) -> (bool, TerminationKind, Option<i32>) {
        match status.code() {
            Some(code) => (true, TerminationKind::Exit, Some(code)),
            None => (false, TerminationKind::Signal, terminating_signal(status)),
        }
    }
}

impl CompletionDecoder for TriValueDecoder {
    fn shape(&self) -> CompletionShape {
        CompletionShape::TriValue
    }

    fn decode(&self, status: &ExitStatus) -> ProcessCompletion {
        let (completed, kind, code) = Self::split(status);
        Self::decode_parts(completed, kind, code)
    }
}

#[cfg(unix)]
fn terminating_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn terminating_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
