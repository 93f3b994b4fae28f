//! Error types for the dose_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dose_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML rule file error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A duration string did not match `<integer>[h|m|d]`
    #[error("Invalid duration {input:?}: {reason}")]
    InvalidDuration { input: String, reason: String },

    /// A time-of-day string did not match `HH:MM`
    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    /// Two medications in one schedule share a name
    #[error("Duplicate medication in schedule: {0}")]
    DuplicateMedication(String),

    /// The delegated reasoning provider failed
    #[error("Reasoning provider error: {0}")]
    Reasoning(String),
}
