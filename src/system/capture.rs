// src/system/capture.rs

//! Capture strategies for the output-capturing executor.
//!
//! A strategy rewrites the command before it is handed to the shell and turns the
//! finished process into an [`ExecResult`]. The direct strategy trusts the reported
//! status; the sentinel strategy ignores it and recovers the exit code from a line
//! appended to the output.

use crate::{
    constants::LAUNCH_FAILURE_CODE,
    models::{CompletionShape, ExecResult, ProcessCompletion},
    system::{
        completion::{CompletionDecoder, TriValueDecoder},
        quote::quote,
    },
};
use regex::Regex;
use std::fmt;
use std::process::ExitStatus;

/// Prepares a captured command and interprets its outcome.
pub trait CaptureStrategy: fmt::Debug + Send + Sync {
    /// The shell script actually run for `command`. Stderr is merged into stdout.
    fn prepare(&self, command: &str) -> String;

    /// Builds the result from the merged output and the process status.
    fn finish(&self, output: String, status: &ExitStatus) -> ExecResult;
}

/// Returns the capture strategy matching `shape`.
pub fn strategy_for(shape: CompletionShape, sentinel_prefix: &str) -> Box<dyn CaptureStrategy> {
    match shape {
        CompletionShape::TriValue => Box::new(DirectCapture::default()),
        CompletionShape::EncodedStatus => Box::new(SentinelCapture::new(sentinel_prefix)),
    }
}

/// `exec 2>&1` redirects the whole script, not only its last command.
fn merge_streams(command: &str) -> String {
    format!("exec 2>&1\n{}", command)
}

// --- Direct ---

/// Captures output and takes the exit code from the reported status.
#[derive(Debug, Default)]
pub struct DirectCapture {
    decoder: TriValueDecoder,
}

impl CaptureStrategy for DirectCapture {
    fn prepare(&self, command: &str) -> String {
        merge_streams(command)
    }

    fn finish(&self, output: String, status: &ExitStatus) -> ExecResult {
        ExecResult::captured(self.decoder.decode(status), output)
    }
}

// --- Sentinel ---

/// Appends a sentinel line carrying `$?` and strips it back out of the output.
///
/// The command is `eval`ed in a subshell, so an `exit` or a syntax error inside it
/// still reaches the sentinel. The sentinel is always printed on its own line,
/// preceded by a newline of its own, so stripping it restores the command's output
/// exactly.
#[derive(Debug)]
pub struct SentinelCapture {
    prefix: String,
    pattern: Regex,
}

impl SentinelCapture {
    /// Creates a sentinel strategy. `prefix` is matched literally.
    pub fn new(prefix: &str) -> Self {
        // The prefix is escaped, so the pattern is always valid.
        #[allow(clippy::unwrap_used)]
        let pattern = Regex::new(&format!(r"\n?{}([0-9]+)\n?\z", regex::escape(prefix))).unwrap();
        Self {
            prefix: prefix.to_string(),
            pattern,
        }
    }

    /// Splits `output` into the command's own output and the recovered exit code.
    ///
    /// Returns `None` for the code when no sentinel ends the output; the output is
    /// then returned untouched.
    pub fn strip_sentinel(&self, mut output: String) -> (String, Option<i32>) {
        let Some(captures) = self.pattern.captures(&output) else {
            log::trace!("No exit-code sentinel found in captured output");
            return (output, None);
        };
        let start = captures.get(0).map_or(output.len(), |m| m.start());
        let code = captures
            .get(1)
            .and_then(|digits| digits.as_str().parse::<i32>().ok());
        log::trace!("Recovered exit code {:?} from sentinel", code);
        output.truncate(start);
        (output, code)
    }
}

impl CaptureStrategy for SentinelCapture {
    fn prepare(&self, command: &str) -> String {
        // Parsed by `eval` so the command's own syntax stays inside the subshell.
        let script = format!(
            "( eval {} )\nprintf '\\n%s%d\\n' {} \"$?\"",
            quote(command),
            quote(&self.prefix)
        );
        merge_streams(&script)
    }

    fn finish(&self, output: String, _status: &ExitStatus) -> ExecResult {
        let (output, code) = self.strip_sentinel(output);
        let completion = match code {
            Some(code) => ProcessCompletion::exited(code),
            None => ProcessCompletion::abnormal(Some(LAUNCH_FAILURE_CODE)),
        };
        ExecResult::captured(completion, output)
    }
}
