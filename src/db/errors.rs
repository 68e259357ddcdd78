//! Store error types.

use thiserror::Error;

use crate::game::UserId;

/// Persistence gateway errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// User row missing for a stats update
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// Gateway temporarily unreachable
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether retrying the same call can reasonably succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Database(_) | Self::Unavailable(_) => true,
            Self::UserNotFound(_) => false,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
