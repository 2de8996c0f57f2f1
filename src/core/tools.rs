// src/core/tools.rs

//! Thin wrappers over external tools found on `PATH`. All of them report failure
//! as `None`/`false` rather than as an error.

use crate::{
    constants::MD5_HEX_LENGTH,
    core::fs_probe::file_exists,
    system::{executor, quote::quote},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

lazy_static! {
    // `md5sum` prefixes the line with `\` when it had to escape the file name.
    static ref MD5_LINE: Regex = Regex::new(r"\A\\?([0-9a-fA-F]+)").expect("valid md5 pattern");
}

/// Computes the MD5 digest of the file at `path` with `md5sum`.
///
/// Returns the 32-character lower-case hex digest, or `None` if the tool fails or
/// its output does not start with exactly 32 hex characters.
pub fn calculate_md5(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    let result = executor::run_captured(&format!(
        "md5sum -- {}",
        quote(&path.to_string_lossy())
    ));
    if !result.success {
        log::debug!("md5sum failed for '{}' (code {})", path.display(), result.code);
        return None;
    }
    parse_md5_output(result.output_str())
}

/// Extracts the digest from a line of `md5sum` output.
pub fn parse_md5_output(output: &str) -> Option<String> {
    let digest = MD5_LINE.captures(output)?.get(1)?.as_str();
    (digest.len() == MD5_HEX_LENGTH).then(|| digest.to_lowercase())
}

/// Resolves `name` to an executable path, like `which`.
///
/// Uses the shell's `command -v`, which is always available. Builtins, aliases and
/// functions resolve to a bare name and are rejected: the resolved path is only
/// returned if it is an existing regular file.
pub fn which(name: &str) -> Option<PathBuf> {
    if name.trim().is_empty() {
        return None;
    }
    let result = executor::run_captured(&format!("command -v {}", quote(name)));
    if !result.success {
        return None;
    }
    let resolved = result.output_str().lines().next()?.trim();
    if resolved.is_empty() || !file_exists(resolved) {
        log::debug!("'command -v {}' gave an unusable path: '{}'", name, resolved);
        return None;
    }
    Some(PathBuf::from(resolved))
}

/// The host name reported by `hostname`, without surrounding whitespace.
pub fn hostname() -> Option<String> {
    let result = executor::run_captured("hostname");
    if !result.success {
        return None;
    }
    let name = result.output_str().trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Sends a single ping to `host`. `true` if it was answered.
pub fn ping(host: &str) -> bool {
    if host.trim().is_empty() {
        return false;
    }
    executor::execute(&format!("ping -c 1 -- {} >/dev/null 2>&1", quote(host))).success
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_md5_of_known_content() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("abc's file.txt");
        fs::write(&file, b"abc").unwrap();
        assert_eq!(
            calculate_md5(&file).as_deref(),
            Some("900150983cd24fb0d6963f7d28e17f72")
        );
    }

    #[test]
    fn test_md5_of_dash_prefixed_relative_path() {
        let dir = tempfile::Builder::new()
            .prefix("-shellkit-")
            .tempdir_in(".")
            .unwrap();
        let relative = Path::new(dir.path().file_name().unwrap()).join("-x");
        fs::write(&relative, b"abc").unwrap();
        assert_eq!(
            calculate_md5(&relative).as_deref(),
            Some("900150983cd24fb0d6963f7d28e17f72")
        );
    }

    #[test]
    fn test_md5_of_missing_file() {
        assert_eq!(calculate_md5("definitely/not/here.bin"), None);
    }

    #[test]
    fn test_parse_md5_output() {
        assert_eq!(
            parse_md5_output("D41D8CD98F00B204E9800998ECF8427E  empty\n").as_deref(),
            Some("d41d8cd98f00b204e9800998ecf8427e")
        );
        assert_eq!(
            parse_md5_output("\\d41d8cd98f00b204e9800998ecf8427e  we\\nird\n").as_deref(),
            Some("d41d8cd98f00b204e9800998ecf8427e")
        );
        assert_eq!(parse_md5_output("abc123  short\n"), None);
        assert_eq!(parse_md5_output("md5sum: x: No such file or directory\n"), None);
        assert_eq!(parse_md5_output(""), None);
    }

    #[test]
    fn test_which_resolves_shell() {
        let sh = which("sh").unwrap();
        assert!(file_exists(&sh));
    }

    #[test]
    fn test_which_missing_or_empty() {
        assert_eq!(which("shellkit_no_such_tool_xyz"), None);
        assert_eq!(which(""), None);
        // A builtin resolves to its bare name.
        assert_eq!(which("cd"), None);
    }

    #[test]
    fn test_hostname_is_single_line() {
        if let Some(name) = hostname() {
            assert!(!name.is_empty());
            assert!(!name.contains('\n'));
        }
    }

    #[test]
    fn test_ping_empty_host() {
        assert!(!ping(""));
    }

    #[test]
    fn test_ping_host_is_never_an_option() {
        // As an option, `-V` would print the version and succeed.
        assert!(!ping("-V"));
    }
}
