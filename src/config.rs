// src/config.rs

//! # Settings
//!
//! Settings are resolved in layers: built-in defaults, then the optional
//! `<config_dir>/shellkit/settings.toml`, then `SHELLKIT_*` environment variables.
//! The process-wide executors are built from [`active_settings`], which resolves
//! the layers once.

use crate::{
    constants::{
        CONFIG_DIR_NAME, DEFAULT_SENTINEL_PREFIX, DEFAULT_SHELL, ENV_COMPLETION_SHAPE,
        ENV_SENTINEL_PREFIX, ENV_SHELL, SETTINGS_FILENAME,
    },
    models::CompletionShape,
};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Failure to load or apply settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("Could not read settings file '{path}': {source}")]
    Io {
        /// The settings file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid TOML or has unknown keys.
    #[error("Failed to parse settings: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// A setting has a value that cannot be used.
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue {
        /// The setting's name.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Execution settings. Every key is optional in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// POSIX shell used to interpret command strings. `~` and `$VAR` are expanded.
    pub shell: String,
    /// Completion shape; the platform default when unset.
    pub completion_shape: Option<CompletionShape>,
    /// Prefix of the exit-code sentinel used by the encoded-status capture shape.
    pub sentinel_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            completion_shape: None,
            sentinel_prefix: DEFAULT_SENTINEL_PREFIX.to_string(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()
    }

    /// Reads and parses a settings file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolves all layers: defaults, the user settings file (if present) and the
    /// process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match settings_path() {
            Some(path) if path.is_file() => {
                log::debug!("Loading settings from '{}'", path.display());
                Self::load_file(&path)?
            }
            _ => Self::default(),
        };
        base.with_overrides(|key| env::var(key).ok())
    }

    /// Applies `SHELLKIT_*` overrides looked up through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(shell) = lookup(ENV_SHELL) {
            self.shell = shell;
        }
        if let Some(shape) = lookup(ENV_COMPLETION_SHAPE) {
            let parsed = shape
                .parse::<CompletionShape>()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: ENV_COMPLETION_SHAPE.to_string(),
                    reason,
                })?;
            self.completion_shape = Some(parsed);
        }
        if let Some(prefix) = lookup(ENV_SENTINEL_PREFIX) {
            self.sentinel_prefix = prefix;
        }
        self.validate()
    }

    /// The completion shape in effect.
    pub fn shape(&self) -> CompletionShape {
        self.completion_shape
            .unwrap_or_else(CompletionShape::platform_default)
    }

    /// The shell path with `~` and environment variables expanded.
    pub fn shell_path(&self) -> Result<PathBuf, ConfigError> {
        let expanded = shellexpand::full(&self.shell).map_err(|e| ConfigError::InvalidValue {
            key: "shell".to_string(),
            reason: e.to_string(),
        })?;
        Ok(PathBuf::from(expanded.into_owned()))
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.shell.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "shell".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.sentinel_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "sentinel_prefix".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(self)
    }
}

/// Location of the user settings file, if the system has a config directory.
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(SETTINGS_FILENAME))
}

lazy_static! {
    static ref ACTIVE_SETTINGS: Settings = Settings::load().unwrap_or_else(|e| {
        log::warn!("Falling back to default settings: {}", e);
        Settings::default()
    });
}

/// The settings used by the process-wide executors, resolved on first use.
pub fn active_settings() -> &'static Settings {
    &ACTIVE_SETTINGS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.shell, "/bin/sh");
        assert_eq!(settings.sentinel_prefix, "__EXITCODE:");
        assert_eq!(settings.shape(), CompletionShape::TriValue);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml_str(r#"completion_shape = "encoded-status""#).unwrap();
        assert_eq!(settings.shape(), CompletionShape::EncodedStatus);
        assert_eq!(settings.shell, "/bin/sh");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = Settings::from_toml_str(r#"shel = "/bin/bash""#);
        let error_msg = result.unwrap_err().to_string();
        assert!(
            error_msg.contains("unknown field `shel`"),
            "Error message was: {}",
            error_msg
        );
    }

    #[test]
    fn test_empty_prefix_is_rejected() {
        let result = Settings::from_toml_str(r#"sentinel_prefix = """#);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_environment_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SHELLKIT_SHELL", "/usr/bin/env-sh"),
            ("SHELLKIT_COMPLETION_SHAPE", "legacy"),
        ]);
        let settings = Settings::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(settings.shell, "/usr/bin/env-sh");
        assert_eq!(settings.shape(), CompletionShape::EncodedStatus);
        assert_eq!(settings.sentinel_prefix, "__EXITCODE:");
    }

    #[test]
    fn test_bad_shape_override_is_rejected() {
        let result = Settings::default().with_overrides(|key| {
            (key == "SHELLKIT_COMPLETION_SHAPE").then(|| "sometimes".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue { key, .. }) if key == "SHELLKIT_COMPLETION_SHAPE"));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "shell = \"/bin/sh\"\nsentinel_prefix = \"@@RC=\"").unwrap();
        file.flush().unwrap();
        let settings = Settings::load_file(file.path()).unwrap();
        assert_eq!(settings.sentinel_prefix, "@@RC=");
    }

    #[test]
    fn test_load_file_missing() {
        let result = Settings::load_file(Path::new("no_such_settings_file.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_shell_path_expands_home() {
        let settings = Settings {
            shell: "~/bin/sh".to_string(),
            ..Settings::default()
        };
        let path = settings.shell_path().unwrap();
        assert!(!path.to_string_lossy().starts_with('~'));
    }
}
