use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
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

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/recipe-scout/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("recipe-scout").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from an explicit path.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The catalog base URL is an http(s) URL
    /// - Timeouts are non-zero
    /// - The featured query is non-empty and samples at least one recipe
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.catalog.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "catalog.base_url must be an http(s) URL, got '{}'",
                    self.catalog.base_url
                ),
            });
        }

        if self.catalog.timeout_seconds == 0 || self.catalog.connect_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "catalog timeouts must be greater than zero".to_string(),
            });
        }

        if self.featured.query.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "featured.query must not be empty".to_string(),
            });
        }

        if self.featured.sample_size == 0 {
            return Err(ConfigError::ValidationError {
                message: "featured.sample_size must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
