//! # Configuration
//!
//! Built-in defaults, optionally overridden by a TOML file, optionally overridden
//! again by command-line flags and environment variables (see `main.rs`).
//!
//! ```toml
//! [lookup]
//! base_url = "https://www.themealdb.com/api/json/v1/1/filter.php"
//! timeout_secs = 10
//!
//! [storage]
//! backend = "file"
//! session_dir = "/tmp/meal-orders-session"
//! clear_on_exit = false
//!
//! [controller]
//! allow_concurrent_lookups = false
//! ```

use crate::lookup::http::DEFAULT_BASE_URL;
use crate::order_actor::ORDERS_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error that occurs during file I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error that occurs when parsing TOML configuration.
    #[error("Configuration error: {0}")]
    Parse(String),
    /// Error that occurs when configuration validation fails.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lookup: LookupConfig,
    pub storage: StorageConfig,
    pub controller: ControllerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub base_url: String,
    /// Unset means the HTTP client's own default.
    pub timeout_secs: Option<u64>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Required for the file backend.
    pub session_dir: Option<PathBuf>,
    pub key: String,
    /// Clear the slot on shutdown, ending the session.
    pub clear_on_exit: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            session_dir: None,
            key: ORDERS_KEY.to_string(),
            clear_on_exit: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub allow_concurrent_lookups: bool,
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Loads and validates a TOML file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        content.parse()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.lookup.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "lookup.base_url must be an http(s) URL, got {url:?}"
            )));
        }
        if self.lookup.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "lookup.timeout_secs must be positive".into(),
            ));
        }
        if self.storage.key.trim().is_empty() {
            return Err(ConfigError::Validation("storage.key cannot be empty".into()));
        }
        if self.storage.backend == StorageBackend::File && self.storage.session_dir.is_none() {
            return Err(ConfigError::Validation(
                "storage.session_dir is required for the file backend".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.lookup.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.storage.key, "mealOrders");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(!config.controller.allow_concurrent_lookups);
        assert!(config.lookup.timeout().is_none());
    }

    #[test]
    fn test_partial_override() {
        let config: Config = r#"
            [lookup]
            timeout_secs = 3

            [storage]
            backend = "file"
            session_dir = "/tmp/session"
        "#
        .parse()
        .unwrap();

        assert_eq!(config.lookup.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.lookup.timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.key, "mealOrders");
    }

    #[test]
    fn test_validation_errors() {
        let no_dir = "[storage]\nbackend = \"file\"\n".parse::<Config>();
        assert!(matches!(no_dir, Err(ConfigError::Validation(_))));

        let bad_url = "[lookup]\nbase_url = \"ftp://x\"\n".parse::<Config>();
        assert!(matches!(bad_url, Err(ConfigError::Validation(_))));

        let bad_toml = "[lookup".parse::<Config>();
        assert!(matches!(bad_toml, Err(ConfigError::Parse(_))));
    }

    #[tokio::test]
    async fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[controller]\nallow_concurrent_lookups = true\n").unwrap();

        let config = Config::from_file(&path).await.unwrap();
        assert!(config.controller.allow_concurrent_lookups);

        assert!(matches!(
            Config::from_file(temp_dir.path().join("missing.toml")).await,
            Err(ConfigError::Io(_))
        ));
    }
}
