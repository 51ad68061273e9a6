//! Persistence error types

use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, PersistError>;

/// Errors raised by a key-value store or while (de)serializing snapshots
#[derive(Error, Debug)]
pub enum PersistError {
    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend rejected the operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// Write would exceed the store's capacity
    #[error("Storage quota exceeded: need {needed} bytes, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    /// Parsed fine but does not describe a resumable game
    #[error("Invalid snapshot: {0}")]
    Invalid(String),

    /// No storage backend (e.g. LocalStorage disabled)
    #[error("Storage unavailable")]
    Unavailable,
}

impl PersistError {
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }
}
