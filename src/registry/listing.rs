//! Presentation helpers for the public game listing.
//!
//! Pure derived reads over registry snapshots: display status, win rates,
//! and the sort orders the lobby offers. Nothing here mutates sessions, and
//! every function tolerates snapshots that have gone stale between fetch and
//! render.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::game::{GameView, User};

/// Coarse status shown in the lobby table.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayStatus {
    Waiting,
    InProgress,
    Completed,
}

impl DisplayStatus {
    #[must_use]
    pub fn of(view: &GameView) -> Self {
        if view.ended_at.is_some() {
            Self::Completed
        } else if view.started_at.is_some() {
            Self::InProgress
        } else {
            Self::Waiting
        }
    }
}

/// Column the listing is sorted by.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    BidAmount,
    HostWinRate,
    OpponentWinRate,
    Status,
}

/// Sort direction
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

fn win_rate_of(user: Option<&User>) -> f64 {
    user.map(User::win_rate).unwrap_or(0.0)
}

fn compare(a: &GameView, b: &GameView, key: SortKey) -> Ordering {
    match key {
        SortKey::BidAmount => a.bid_amount.cmp(&b.bid_amount),
        SortKey::HostWinRate => win_rate_of(Some(&a.host))
            .partial_cmp(&win_rate_of(Some(&b.host)))
            .unwrap_or(Ordering::Equal),
        SortKey::OpponentWinRate => win_rate_of(a.opponent())
            .partial_cmp(&win_rate_of(b.opponent()))
            .unwrap_or(Ordering::Equal),
        SortKey::Status => DisplayStatus::of(a).cmp(&DisplayStatus::of(b)),
    }
}

/// Sort a listing snapshot in place.
pub fn sort_games(games: &mut [GameView], key: SortKey, direction: SortDirection) {
    games.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
