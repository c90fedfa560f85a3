use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration or trip data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid trip file {path}: {reason}")]
    InvalidTrip { path: PathBuf, reason: String },

    #[error("unsupported trip file extension for {0} (expected .json or .toml)")]
    UnsupportedTripFormat(PathBuf),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors from the passcode gate.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("wrong passcode")]
    WrongPasscode,

    #[error("unlock state I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unlock state is not valid JSON: {0}")]
    State(#[from] serde_json::Error),
}
