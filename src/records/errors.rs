//! Play record error types.

use thiserror::Error;

/// Errors from recording and ranking
#[derive(Debug, Error)]
pub enum RecordError {
    /// Winner name was empty or whitespace
    #[error("winner name must not be empty")]
    EmptyWinnerName,

    /// Winner media URL did not parse
    #[error("invalid media url: {0}")]
    InvalidMediaUrl(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Record storage failed
    #[error("record storage error: {0}")]
    Storage(String),
}

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;
