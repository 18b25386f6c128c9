use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::types::{AuthConfig, Config};

/// Environment variable overriding `auth.nonce`.
pub const NONCE_ENV_VAR: &str = "SHIPPING_LABEL_NONCE";

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
    /// Uses `~/.config/shipping-label/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("shipping-label").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
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
    /// - Both endpoint URLs are set and use http(s)
    /// - Timeouts are positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoints = [
            (
                "address_normalization_url",
                &self.endpoints.address_normalization_url,
            ),
            ("purchase_url", &self.endpoints.purchase_url),
        ];
        for (name, url) in endpoints {
            if url.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    message: format!("Endpoint '{}' must not be empty", name),
                });
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError {
                    message: format!("Endpoint '{}' must be an http(s) URL, got '{}'", name, url),
                });
            }
        }

        if self.http.timeout_seconds == 0 || self.http.connect_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "HTTP timeouts must be positive".to_string(),
            });
        }

        Ok(())
    }
}

impl AuthConfig {
    /// The nonce to send: `SHIPPING_LABEL_NONCE` if set and non-empty,
    /// otherwise the configured one.
    pub fn resolve_nonce(&self) -> Option<String> {
        std::env::var(NONCE_ENV_VAR)
            .ok()
            .filter(|nonce| !nonce.is_empty())
            .or_else(|| self.nonce.clone())
    }
}
