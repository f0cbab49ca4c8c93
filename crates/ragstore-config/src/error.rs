//! Error types for ragstore configuration loading.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read ragstore config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Malformed ragstore config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No platform config directory available")]
    NoConfigDir,

    /// A value parsed fine but cannot drive the client (e.g. a zero
    /// timeout or poll interval).
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
