//! Game session model and state machine.
//!
//! This module provides:
//! - Core data models (users, sides, outcomes, views)
//! - The [`GameSession`] tagged state machine
//! - The [`GameError`] taxonomy shared across the crate

pub mod errors;
pub mod models;
pub mod session;

pub use errors::{GameError, GameResult};
pub use models::{CompletedGame, GameView, Outcome, Side, Stake, User, UserId};
pub use session::{GameSession, Status};
