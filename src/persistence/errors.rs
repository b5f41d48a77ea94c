//! Persistence error types.

use thiserror::Error;

/// Errors from snapshot persistence
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Snapshot payload could not be serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage backend failed to accept a write
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;
