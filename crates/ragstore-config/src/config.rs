//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Environment variable holding the backend API key.
pub const API_KEY_ENV: &str = "RAGSTORE_API_KEY";

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "RAGSTORE_BASE_URL";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub polling: PollingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            polling: PollingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, then apply
    /// environment overrides for credentials.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file yields the defaults. Credentials from the
    /// environment always win over the file.
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<Config>(&contents)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or spin the client.
    fn validate(&self) -> ConfigResult<()> {
        if self.backend.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "backend.timeout_seconds must be at least 1".to_string(),
            ));
        }
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "polling.interval_ms must be at least 1".to_string(),
            ));
        }
        if self.polling.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "polling.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment-variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.backend.api_key = Some(key);
            }
        }
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.is_empty() {
                self.backend.base_url = url;
            }
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# Ragstore Configuration
# Client for a remote RAG document-store backend

[backend]
# Backend base URL
base_url = "http://localhost:8080"

# API key. Prefer the RAGSTORE_API_KEY environment variable;
# only set this if the config file is private to you.
# api_key = ""

# Request timeout in seconds
timeout_seconds = 120

[polling]
# How often to re-check a pending ingestion operation (milliseconds)
interval_ms = 3000

# Give up after this many status checks
max_attempts = 100
"#
        .to_string()
    }
}

/// Remote backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_key: None,
            timeout_seconds: 120,
        }
    }
}

/// Ingestion polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3000,
            max_attempts: 100,
        }
    }
}
