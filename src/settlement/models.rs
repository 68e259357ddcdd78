//! Settlement data models.

use serde::{Deserialize, Serialize};

use crate::game::{Stake, UserId};

/// Direction of a win/loss counter update.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatOutcome {
    Win,
    Loss,
}

/// Where the pooled stake goes when a game ends.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum BidTransfer {
    /// Decisive result: the full pool (both contributions) to the winner.
    Pot { to: UserId, amount: Stake },
    /// Draw: each contributor's stake returned unchanged.
    Refund {
        to_white: UserId,
        to_black: UserId,
        amount_each: Stake,
    },
}

/// Computed consequence of one finished game.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// Winner's user id, or `None` on a draw.
    pub winner: Option<UserId>,
    /// Loser's user id, or `None` on a draw.
    pub loser: Option<UserId>,
    pub transfer: BidTransfer,
}
