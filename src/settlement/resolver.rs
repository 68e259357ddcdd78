//! Stats and bid resolution for finished games.

use std::sync::Arc;
use tokio::time::{Duration, sleep};

use super::models::{BidTransfer, Settlement, StatOutcome};
use crate::db::{StoreResult, UserStore};
use crate::game::{CompletedGame, GameResult, UserId};

/// Compute the settlement for a finished game.
///
/// Decisive outcome: the winner takes the full pooled stake and gains a win,
/// the loser gains a loss. Draw: no counter changes, each side's stake comes
/// back unchanged. Pure; applying the result is [`StakeResolver`]'s job.
#[must_use]
pub fn resolve(game: &CompletedGame) -> Settlement {
    match game.winner.winning_side() {
        None => Settlement {
            winner: None,
            loser: None,
            transfer: BidTransfer::Refund {
                to_white: game.white.id,
                to_black: game.black.id,
                amount_each: game.bid_amount,
            },
        },
        Some(side) => {
            let winner = game.player(side);
            let loser = game.player(side.opposite());
            Settlement {
                winner: Some(winner.id),
                loser: Some(loser.id),
                transfer: BidTransfer::Pot {
                    to: winner.id,
                    amount: game.pot(),
                },
            }
        }
    }
}

/// Applies settlements against the user store.
///
/// Each game is resolved at most once: the registry's single terminal
/// transition guarantees that, so the resolver itself carries no dedup
/// state. Store failures are retried per counter update, never re-running
/// an update that already succeeded.
pub struct StakeResolver {
    users: Arc<dyn UserStore>,
    attempts: u32,
    retry_delay: Duration,
}

impl StakeResolver {
    pub fn new(users: Arc<dyn UserStore>, attempts: u32, retry_delay: Duration) -> Self {
        Self {
            users,
            attempts: attempts.max(1),
            retry_delay,
        }
    }

    /// Resolve `game` and apply the win/loss updates.
    pub async fn settle(&self, game: &CompletedGame) -> GameResult<Settlement> {
        let settlement = resolve(game);
        if let (Some(winner), Some(loser)) = (settlement.winner, settlement.loser) {
            self.increment_with_retry(winner, StatOutcome::Win).await?;
            self.increment_with_retry(loser, StatOutcome::Loss).await?;
            log::info!(
                "settled game {}: winner {winner} takes pot {}, loser {loser}",
                game.code,
                game.pot()
            );
        } else {
            log::info!(
                "settled game {} as a draw: {} returned to each player",
                game.code,
                game.bid_amount
            );
        }
        Ok(settlement)
    }

    async fn increment_with_retry(&self, user_id: UserId, outcome: StatOutcome) -> StoreResult<()> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.users.increment_win_loss(user_id, outcome).await {
                Ok(()) => return Ok(()),
                Err(err) if attempt < self.attempts && err.is_transient() => {
                    log::warn!(
                        "updating stats for user {user_id} failed (attempt {attempt}): {err}"
                    );
                    sleep(self.retry_delay).await;
                }
                Err(err) => {
                    log::error!(
                        "giving up on stats update for user {user_id} after {attempt} attempts: {err}"
                    );
                    return Err(err);
                }
            }
        }
    }
}
