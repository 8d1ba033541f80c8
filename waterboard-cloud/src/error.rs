//! Cloud sync error types.
//!
//! Propagation policy: one record's failure never aborts a batch, one
//! attachment's failure never aborts its record, and only validation
//! blocks a submission outright. Everything else degrades to
//! "saved locally".

use thiserror::Error;

/// Result type for cloud operations.
pub type CloudResult<T> = Result<T, CloudError>;

/// Errors that can occur in cloud sync operations.
#[derive(Debug, Error)]
pub enum CloudError {
    /// The network call itself failed — distinct from "document not found",
    /// which reads as `Ok(None)`.
    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("attachment {name} is too large ({size_bytes} bytes, limit {limit_bytes})")]
    AttachmentTooLarge {
        name: String,
        size_bytes: u64,
        limit_bytes: u64,
    },

    #[error("attachment upload failed: {0}")]
    AttachmentUpload(String),

    /// The durability ack did not arrive in time. Non-fatal: the write was
    /// issued, only the confirmation is missing.
    #[error("server commit not confirmed within the timeout")]
    CommitTimeout,

    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
