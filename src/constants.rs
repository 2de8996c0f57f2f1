// src/constants.rs

//! Fixed values shared across the crate.

/// The shell used to interpret command strings when no other is configured.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Prefix of the line appended to captured output to carry the exit code
/// when the completion shape cannot report it directly.
pub const DEFAULT_SENTINEL_PREFIX: &str = "__EXITCODE:";

/// The code reported when a process could not be launched at all, or when its
/// exit code could not be recovered.
pub const LAUNCH_FAILURE_CODE: i32 = 1;

/// The output reported by the capturing executor when the process could not be opened.
pub const LAUNCH_FAILURE_MESSAGE: &str = "Cannot open process";

/// Exit code a POSIX shell reports for a child interrupted by `SIGINT`.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Size of each read/write chunk used when copying files.
pub const COPY_CHUNK_SIZE: usize = 4096;

/// Number of hex characters in an MD5 digest.
pub const MD5_HEX_LENGTH: usize = 32;

/// Name of the directory holding shellkit's settings (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "shellkit";

/// Name of the settings file (inside the shellkit config dir).
pub const SETTINGS_FILENAME: &str = "settings.toml";

/// Environment variable overriding the `shell` setting.
pub const ENV_SHELL: &str = "SHELLKIT_SHELL";
/// Environment variable overriding the `completion_shape` setting.
pub const ENV_COMPLETION_SHAPE: &str = "SHELLKIT_COMPLETION_SHAPE";
/// Environment variable overriding the `sentinel_prefix` setting.
pub const ENV_SENTINEL_PREFIX: &str = "SHELLKIT_SENTINEL_PREFIX";
