use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::EngineSettings;

/// Environment variable enabling debug tracing (`1`, `true`, `yes`, `on`).
pub const DEBUG_ENV: &str = "STATEVM_DEBUG";
/// Environment variable overriding the view model tag.
pub const TAG_ENV: &str = "STATEVM_TAG";

/// Errors that can occur when loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl EngineSettings {
    /// Returns the path to the settings file.
    ///
    /// Uses `~/.config/statevm/config.toml` on Linux, or the platform
    /// equivalent via `dirs::config_dir()`. Falls back to the current
    /// directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("statevm").join("config.toml")
    }

    /// Loads settings from the default settings file.
    ///
    /// Returns `EngineSettings::default()` if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads settings from `path`, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let settings: EngineSettings =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from the default file, then applies environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = Self::load()?.with_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Applies `STATEVM_DEBUG` and `STATEVM_TAG` as returned by `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup(DEBUG_ENV) {
            self.debug = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(tag) = lookup(TAG_ENV) {
            self.tag = Some(tag);
        }
        self
    }

    /// Validates the settings.
    ///
    /// Checks:
    /// - The tag, when set, is not blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tag.as_deref().is_some_and(|tag| tag.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                message: "tag must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
