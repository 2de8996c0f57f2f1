// src/core/file_ops.rs

//! File copying.

use crate::{
    constants::COPY_CHUNK_SIZE,
    core::{fs_probe::file_exists, permissions::mode_to_symbolic},
    models::CopyReport,
    system::{
        executor::{self, OutputCapturingExecutor},
        quote::quote,
    },
};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Failure of [`copy_file`].
#[derive(Error, Debug)]
pub enum FileOpsError {
    /// A path was empty, or source and destination are the same file.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The source is missing or not a regular file.
    #[error("Source '{0}' does not exist or is not a regular file.")]
    SourceNotFound(String),
    /// The source could not be opened.
    #[error("Could not open '{path}' for reading: {source}")]
    OpenRead {
        /// The source path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The destination could not be created or truncated.
    #[error("Could not open '{path}' for writing: {source}")]
    OpenWrite {
        /// The destination path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading or writing failed partway through the copy.
    #[error("Failed to copy '{src}' to '{dst}': {source}")]
    Copy {
        /// The source path.
        src: String,
        /// The destination path.
        dst: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Copies the regular file `src` to `dst` byte for byte, then applies the
/// source's permission bits to `dst` with `chmod`.
///
/// The copy runs in fixed-size chunks. Both files are closed on every path, including
/// a failure halfway through. Setuid, setgid and sticky bits are not propagated.
/// A failed `chmod` is logged and reported through
/// [`CopyReport::permissions_propagated`]; it never fails the copy.
///
/// # Errors
/// - [`FileOpsError::InvalidArgument`] if either path is empty or both name the
///   same file.
/// - [`FileOpsError::SourceNotFound`] if `src` is not a regular file.
/// - [`FileOpsError::OpenRead`], [`FileOpsError::OpenWrite`] or [`FileOpsError::Copy`]
///   if the files cannot be opened, read or written.
pub fn copy_file(src: &str, dst: &str) -> Result<CopyReport, FileOpsError> {
    copy_file_with(&executor::executors().capturing, src, dst)
}

fn copy_file_with(
    runner: &OutputCapturingExecutor,
    src: &str,
    dst: &str,
) -> Result<CopyReport, FileOpsError> {
    if src.is_empty() || dst.is_empty() {
        return Err(FileOpsError::InvalidArgument(
            "copy_file requires non-empty source and destination paths".to_string(),
        ));
    }
    if !file_exists(src) {
        return Err(FileOpsError::SourceNotFound(src.to_string()));
    }
    // Opening `dst` for writing would truncate the source before it is read.
    if same_file(Path::new(src), Path::new(dst)) {
        return Err(FileOpsError::InvalidArgument(format!(
            "'{}' and '{}' are the same file",
            src, dst
        )));
    }

    let bytes_copied = copy_contents(src, dst)?;
    log::debug!("Copied {} bytes from '{}' to '{}'", bytes_copied, src, dst);

    let permissions_propagated = propagate_permissions(runner, Path::new(src), dst);
    Ok(CopyReport {
        bytes_copied,
        permissions_propagated,
    })
}

fn copy_contents(src: &str, dst: &str) -> Result<u64, FileOpsError> {
    let mut reader = File::open(src).map_err(|e| FileOpsError::OpenRead {
        path: src.to_string(),
        source: e,
    })?;
    let mut writer = File::create(dst).map_err(|e| FileOpsError::OpenWrite {
        path: dst.to_string(),
        source: e,
    })?;
    let copy_error = |e| FileOpsError::Copy {
        src: src.to_string(),
        dst: dst.to_string(),
        source: e,
    };

    let mut buffer = vec![0u8; COPY_CHUNK_SIZE];
    let mut total: u64 = 0;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(copy_error(e)),
        };
        let chunk = buffer.get(..read).unwrap_or_default();
        writer.write_all(chunk).map_err(copy_error)?;
        total += chunk.len() as u64;
    }
    writer.flush().map_err(copy_error)?;
    Ok(total)
}

fn propagate_permissions(runner: &OutputCapturingExecutor, src: &Path, dst: &str) -> bool {
    let Some(mode) = permission_bits(src) else {
        log::debug!("No permission bits available for '{}'", src.display());
        return false;
    };
    // Setuid, setgid and sticky bits are dropped.
    let octal = mode & 0o777;
    let result = runner.run_captured(&format!("chmod {:o} -- {}", octal, quote(dst)));
    if !result.success {
        log::warn!(
            "chmod {} on '{}' failed (code {}): {}",
            mode_to_symbolic(octal),
            dst,
            result.code,
            result.output_str().trim()
        );
    }
    result.success
}

#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(unix)]
fn permission_bits(path: &Path) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).ok().map(|m| m.permissions().mode())
}

#[cfg(not(unix))]
fn permission_bits(_path: &Path) -> Option<u32> {
    None
}
