//! Error types for neurogrow

use std::path::PathBuf;

/// Result type alias using ConfigError
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading or validating a [`crate::config::GrowthConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Extension is not one of yaml, yml, json
    #[error("unsupported config format: {} (expected .yaml, .yml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Values parsed but make no sense together
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while writing a grown neuron out
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Output file could not be created or written
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Screenshot encoding error
    #[cfg(feature = "ui")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
