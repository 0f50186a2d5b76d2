//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `$XDG_CONFIG_HOME/bstv/bstv.toml`, or the file given with `-C`
//! 3. Environment variables: `BSTV_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::{DEFAULT_HISTORY_LIMIT, STORE_FILE_NAME};
use crate::application::ApplicationError;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "https://bst-visualizer-backend.onrender.com/api";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw settings for intermediate parsing (all fields optional).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub api_base: Option<String>,
    pub history_limit: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Unified configuration for bstv.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the history store
    pub data_dir: PathBuf,
    /// Base URL of the remote tree API
    pub api_base: String,
    /// Number of submissions kept in history
    pub history_limit: usize,
    /// HTTP request timeout
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            api_base: DEFAULT_API_BASE.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Platform data directory for bstv, falling back to `~/.bstv`.
fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "bstv")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.bstv"))
}

/// Get the XDG config directory for bstv.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bstv").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bstv.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Path of the history store file.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_dir.to_string_lossy().as_ref());
        self.data_dir = PathBuf::from(expanded);
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            api_base: overlay
                .api_base
                .clone()
                .unwrap_or_else(|| self.api_base.clone()),
            history_limit: overlay.history_limit.unwrap_or(self.history_limit),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; must exist when given.
    ///   Without it the global XDG file is used if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                current = current.merge_with(&load_raw_settings(path)?);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        current = current.merge_with(&load_raw_settings(&global_path)?);
                    }
                }
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;
        Ok(current)
    }

    /// Apply BSTV_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("BSTV")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        let raw = RawSettings {
            data_dir: optional(config.get_string("data_dir"))?.map(PathBuf::from),
            api_base: optional(config.get_string("api_base"))?,
            history_limit: optional(config.get::<usize>("history_limit"))?,
            timeout_secs: optional(config.get::<u64>("timeout_secs"))?,
        };
        Ok(settings.merge_with(&raw))
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.history_limit == 0 {
            return Err(ApplicationError::Config {
                message: "history_limit must be at least 1".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ApplicationError::Config {
                message: "timeout_secs must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# bstv configuration
#
# Locations (by precedence, lowest to highest):
#   File: ~/.config/bstv/bstv.toml (or `bstv -C <file>`)
#   Env:  BSTV_* environment variables, e.g. BSTV_API_BASE

# Directory holding trees.json (history of submissions)
# data_dir = "~/.local/share/bstv"

# Remote tree API
# api_base = "{DEFAULT_API_BASE}"

# Number of submissions kept in history
# history_limit = {DEFAULT_HISTORY_LIMIT}

# HTTP timeout in seconds
# timeout_secs = {DEFAULT_TIMEOUT_SECS}
"#
        )
    }
}

/// Missing keys are `None`; malformed values are errors.
fn optional<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_has_expected_values() {
        let settings = Settings::default();
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.history_limit, 100);
        assert_eq!(settings.timeout_secs, 30);
        assert!(settings.store_path().ends_with("trees.json"));
    }

    #[test]
    fn given_tilde_in_data_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/.bstv"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let dir = settings.data_dir.to_string_lossy();
        assert!(dir.starts_with(&home), "data_dir should start with home: {dir}");
        assert!(!dir.contains('~'), "data_dir should not contain tilde: {dir}");
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_specified_fields_change() {
        let base = Settings::default();
        let overlay = RawSettings {
            api_base: Some("http://localhost:8080/api".to_string()),
            history_limit: Some(5),
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.api_base, "http://localhost:8080/api");
        assert_eq!(merged.history_limit, 5);
        assert_eq!(merged.data_dir, base.data_dir);
        assert_eq!(merged.timeout_secs, base.timeout_secs);
    }

    #[test]
    fn given_zero_limit_when_validating_then_rejects() {
        let settings = Settings {
            history_limit: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.api_base.is_none());
    }
}
