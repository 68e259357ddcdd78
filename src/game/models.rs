//! Core data models for wagered chess games.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// User ID type
pub type UserId = i64;

/// Wagered amount type
pub type Stake = i64;

/// One of the two seats in a game.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Uniformly random side, used when the creator leaves side choice open.
    pub fn random() -> Self {
        if rand::rng().random_bool(0.5) {
            Self::White
        } else {
            Self::Black
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

/// Final result of a game.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    White,
    Black,
    Draw,
}

impl Outcome {
    /// The winning side, or `None` on a draw.
    #[must_use]
    pub fn winning_side(self) -> Option<Side> {
        match self {
            Self::White => Some(Side::White),
            Self::Black => Some(Side::Black),
            Self::Draw => None,
        }
    }
}

impl From<Side> for Outcome {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Self::White,
            Side::Black => Self::Black,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

/// Authenticated player identity, referenced by sessions but owned by the
/// identity source. Win/loss counters change only through settlement.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub wins: i32,
    #[serde(default)]
    pub losses: i32,
    #[serde(default)]
    pub connected: bool,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            wins: 0,
            losses: 0,
            connected: false,
        }
    }

    /// Fraction of decisive games won, in `0.0..=1.0`. Zero when the user
    /// has no recorded games.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        let total = self.wins + self.losses;
        if total <= 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(total)
        }
    }
}

/// Externally visible snapshot of a session, in the flat shape the HTTP
/// layer serves to clients.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub code: String,
    pub unlisted: bool,
    pub bid_amount: Stake,
    pub host: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub black: Option<User>,
    pub pgn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Outcome>,
}

impl GameView {
    /// The seated user opposing the host, if any.
    #[must_use]
    pub fn opponent(&self) -> Option<&User> {
        match (&self.white, &self.black) {
            (Some(w), _) if w.id != self.host.id => Some(w),
            (_, Some(b)) if b.id != self.host.id => Some(b),
            _ => None,
        }
    }
}

/// A finished game as handed to the persistence gateway. Both seats are
/// guaranteed filled, and the timestamps and winner are final.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedGame {
    /// Assigned by the store on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub code: String,
    pub bid_amount: Stake,
    pub host: User,
    pub white: User,
    pub black: User,
    pub pgn: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub winner: Outcome,
}

impl CompletedGame {
    #[must_use]
    pub fn player(&self, side: Side) -> &User {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    /// The winning player, or `None` on a draw.
    #[must_use]
    pub fn winning_player(&self) -> Option<&User> {
        self.winner.winning_side().map(|side| self.player(side))
    }

    /// The full pooled stake: both seats contribute `bid_amount`.
    #[must_use]
    pub fn pot(&self) -> Stake {
        self.bid_amount.saturating_mul(2)
    }
}
