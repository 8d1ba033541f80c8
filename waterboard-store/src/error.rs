//! Local storage error types.

use thiserror::Error;

/// Result type for local storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in the local record cache.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
