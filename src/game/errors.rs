//! Game error types.

use thiserror::Error;

use super::models::Stake;
use crate::db::StoreError;

/// Errors surfaced by session and registry operations.
///
/// Every variant carries the code or input the caller supplied, so the
/// excluded HTTP layer can map it to a status without extra lookups.
#[derive(Debug, Error)]
pub enum GameError {
    /// Bad stake on creation; nothing was allocated.
    #[error("invalid bid {bid}: non-zero bids must be at least {min}")]
    InvalidBid { bid: Stake, min: Stake },

    /// No active session holds this code (or no stored game has this id).
    #[error("no game found for {code}")]
    NotFound { code: String },

    /// Both seats are already occupied.
    #[error("game {code} is full")]
    GameFull { code: String },

    /// The user already holds a seat in this session.
    #[error("already seated in game {code}")]
    AlreadySeated { code: String },

    /// The requester is neither the host nor a seated player.
    #[error("not a participant of game {code}")]
    Forbidden { code: String },

    /// Move submitted before both seats were filled.
    #[error("game {code} has not started")]
    GameNotStarted { code: String },

    /// Move submitted after the game reached a terminal state.
    #[error("game {code} is over")]
    GameOver { code: String },

    /// The rule engine rejected the move.
    #[error("illegal move {san} in game {code}")]
    IllegalMove { code: String, san: String },

    /// A session invariant did not hold (e.g. a started game missing a seat).
    #[error("inconsistent state for game {code}")]
    InternalState { code: String },

    /// The persistence gateway failed after retries were exhausted.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl GameError {
    /// Client-safe message that does not leak store internals.
    pub fn client_message(&self) -> String {
        match self {
            Self::Persistence(_) | Self::InternalState { .. } => {
                "internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;
