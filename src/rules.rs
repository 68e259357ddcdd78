//! Seam to the external chess rule engine.
//!
//! The engine validating moves and detecting checkmate/stalemate lives
//! outside this crate. The registry consumes it as a black box through
//! [`RuleEngine`]: given the current PGN and a move in standard algebraic
//! notation, the engine either extends the log and optionally reports a
//! terminal position, or rejects the move.

use thiserror::Error;

use crate::game::{Outcome, Side};

/// How the rule engine classified a terminal position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TerminalReport {
    /// Checkmate, resignation, or a clock loss decided for one side.
    Decisive(Side),
    /// Stalemate or an agreed/forced draw.
    Draw,
}

impl TerminalReport {
    #[must_use]
    pub fn outcome(self) -> Outcome {
        match self {
            Self::Decisive(side) => side.into(),
            Self::Draw => Outcome::Draw,
        }
    }
}

/// Result of applying a legal move.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MoveOutcome {
    /// The move log extended with the applied move.
    pub pgn: String,
    /// Set if the move ended the game.
    pub terminal: Option<TerminalReport>,
}

/// Rule engine errors
#[derive(Debug, Eq, Error, PartialEq)]
pub enum RulesError {
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

/// External move validator and terminal-state detector.
pub trait RuleEngine: Send + Sync {
    /// Apply `san` to the game described by `pgn`.
    fn apply_move(&self, pgn: &str, san: &str) -> Result<MoveOutcome, RulesError>;
}
