//! Error types for the adherence_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for adherence_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transient failure talking to the record store or flag store.
    /// Callers recover by retrying on the next trigger or by degrading
    /// to zeroed aggregates.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Malformed schedule data on a medication record
    #[error("Schedule error: {0}")]
    Schedule(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
