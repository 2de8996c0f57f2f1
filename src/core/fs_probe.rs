// src/core/fs_probe.rs

//! Read-only filesystem probes.

use crate::system::{executor, quote::quote};
use regex::Regex;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

/// Failure of a probe called with malformed arguments.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The argument cannot name a file, e.g. an empty path.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// `true` if `path` resolves to a regular file. Symlinks are followed.
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// `true` if `path` resolves to a directory. Symlinks are followed.
pub fn directory_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Checks whether `path` is a symbolic link, using `test -L`.
///
/// # Errors
/// Returns [`ProbeError::InvalidArgument`] for an empty path. Any other failure
/// (missing path, `test` failing) is reported as `Ok(false)`. A blank name like
/// `" "` is a valid path and is checked like any other.
pub fn is_symlink(path: &str) -> Result<bool, ProbeError> {
    if path.is_empty() {
        return Err(ProbeError::InvalidArgument(
            "is_symlink requires a non-empty path".to_string(),
        ));
    }
    Ok(executor::execute(&format!("test -L {}", quote(path))).success)
}

/// Lists the regular files directly inside `dir`, sorted by name.
///
/// A missing or unreadable directory gives an empty list.
pub fn list_files(dir: impl AsRef<Path>) -> Vec<String> {
    regular_file_names(dir.as_ref())
}

/// Lists the regular files directly inside `dir` whose name contains `pattern`.
///
/// Every character of `pattern` is matched literally, `*` and `?` included, so
/// `find(dir, "*.log")` matches a file named `*.log` but not `app.log`.
/// [`find_glob`] gives wildcard matching.
pub fn find(dir: impl AsRef<Path>, pattern: &str) -> Vec<String> {
    let expression = format!(".*{}.*", regex::escape(pattern));
    filter_names(dir.as_ref(), &expression)
}

/// Lists the regular files directly inside `dir` whose whole name matches the
/// glob `pattern` (`*` any run of characters, `?` exactly one).
pub fn find_glob(dir: impl AsRef<Path>, pattern: &str) -> Vec<String> {
    filter_names(dir.as_ref(), &glob_to_regex(pattern))
}

/// Translates a glob into an anchored regular expression.
pub fn glob_to_regex(pattern: &str) -> String {
    let mut expression = String::from("^");
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => expression.push_str(".*"),
            '?' => expression.push('.'),
            other => expression.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    expression.push('$');
    expression
}

fn filter_names(dir: &Path, expression: &str) -> Vec<String> {
    let matcher = match Regex::new(expression) {
        Ok(matcher) => matcher,
        Err(e) => {
            log::debug!("Could not build file pattern '{}': {}", expression, e);
            return Vec::new();
        }
    };
    regular_file_names(dir)
        .into_iter()
        .filter(|name| matcher.is_match(name))
        .collect()
}

fn regular_file_names(dir: &Path) -> Vec<String> {
    let dir = dunce::simplified(dir);
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("Skipping entry while listing '{}': {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| file_exists(entry.path()))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}
