//! Stats and bid settlement for completed games.
//!
//! This module implements:
//! - Pure resolution of a finished game into winner/loser ids and a bid
//!   transfer (full pool to the winner, or per-player refunds on a draw)
//! - [`StakeResolver`], which applies the win/loss counter updates through
//!   the user store with bounded retries
//!
//! Settlement is invoked exactly once per game by the session registry's
//! single terminal transition; nothing here double-credits on its own.

pub mod models;
pub mod resolver;

pub use models::{BidTransfer, Settlement, StatOutcome};
pub use resolver::{StakeResolver, resolve};
