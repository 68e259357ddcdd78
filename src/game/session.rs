//! Game session state machine.
//!
//! A session moves through an explicit tagged lifecycle:
//!
//! - **Open**: one seat filled (the host's), waiting for an opponent
//! - **InProgress**: both seats filled, moves accepted
//! - **Completed**: terminal position reached, winner recorded
//! - **Abandoned**: destroyed by a leave before completion
//!
//! Which timestamps and winner fields are meaningful is determined by the
//! status variant rather than by field presence checks. Transitions never
//! re-open a started game, never vacate a filled seat, and set `started_at`,
//! `ended_at`, and `winner` exactly once.

use chrono::{DateTime, Utc};

use super::errors::{GameError, GameResult};
use super::models::{CompletedGame, GameView, Outcome, Side, Stake, User, UserId};

/// Lifecycle status of a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Status {
    Open,
    InProgress {
        started_at: DateTime<Utc>,
    },
    Completed {
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        winner: Outcome,
    },
    Abandoned,
}

/// One active game: seats, move log, stake, and lifecycle status.
///
/// Owned exclusively by the session registry while active; all mutation goes
/// through the transition methods below so the state machine invariants hold.
#[derive(Clone, Debug)]
pub struct GameSession {
    code: String,
    unlisted: bool,
    bid_amount: Stake,
    host: User,
    white: Option<User>,
    black: Option<User>,
    pgn: String,
    timeout: Option<u32>,
    status: Status,
}

impl GameSession {
    /// Create a new open session with the host seated on `side`.
    pub fn new(
        code: String,
        host: User,
        side: Side,
        unlisted: bool,
        bid_amount: Stake,
        timeout: Option<u32>,
    ) -> Self {
        let (white, black) = match side {
            Side::White => (Some(host.clone()), None),
            Side::Black => (None, Some(host.clone())),
        };
        Self {
            code,
            unlisted,
            bid_amount,
            host,
            white,
            black,
            pgn: String::new(),
            timeout,
            status: Status::Open,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn pgn(&self) -> &str {
        &self.pgn
    }

    pub fn seat(&self, side: Side) -> Option<&User> {
        match side {
            Side::White => self.white.as_ref(),
            Side::Black => self.black.as_ref(),
        }
    }

    /// The side still waiting for a player, if any.
    pub fn open_side(&self) -> Option<Side> {
        if self.white.is_none() {
            Some(Side::White)
        } else if self.black.is_none() {
            Some(Side::Black)
        } else {
            None
        }
    }

    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.white.as_ref().is_some_and(|u| u.id == user_id)
            || self.black.as_ref().is_some_and(|u| u.id == user_id)
    }

    /// Whether the session still exists from a caller's point of view.
    /// Completed and abandoned sessions are logically gone from the registry
    /// even if a stale handle still reaches them.
    pub fn is_active(&self) -> bool {
        matches!(self.status, Status::Open | Status::InProgress { .. })
    }

    /// Whether the session belongs in the public listing: listed, undecided,
    /// and with a seat still open.
    pub fn is_listed_open(&self) -> bool {
        !self.unlisted && self.status == Status::Open
    }

    /// Seat `user`, starting the game if this fills the second seat.
    ///
    /// Returns the side taken. The caller serializes invocations per code,
    /// which is what makes the last-seat race resolve to exactly one winner.
    pub fn take_seat(&mut self, user: User) -> GameResult<Side> {
        if self.is_participant(user.id) {
            return Err(GameError::AlreadySeated {
                code: self.code.clone(),
            });
        }
        match self.status {
            Status::Open => {
                let side = self.open_side().ok_or(GameError::InternalState {
                    code: self.code.clone(),
                })?;
                match side {
                    Side::White => self.white = Some(user),
                    Side::Black => self.black = Some(user),
                }
                if self.open_side().is_none() {
                    self.status = Status::InProgress {
                        started_at: Utc::now(),
                    };
                }
                Ok(side)
            }
            Status::InProgress { .. } => Err(GameError::GameFull {
                code: self.code.clone(),
            }),
            Status::Completed { .. } | Status::Abandoned => Err(GameError::NotFound {
                code: self.code.clone(),
            }),
        }
    }

    /// Gate a move submission: only seated players, only while in progress.
    pub fn ensure_can_move(&self, user_id: UserId) -> GameResult<()> {
        match self.status {
            Status::Open => Err(GameError::GameNotStarted {
                code: self.code.clone(),
            }),
            Status::InProgress { .. } => {
                if self.is_participant(user_id) {
                    Ok(())
                } else {
                    Err(GameError::Forbidden {
                        code: self.code.clone(),
                    })
                }
            }
            Status::Completed { .. } | Status::Abandoned => Err(GameError::GameOver {
                code: self.code.clone(),
            }),
        }
    }

    /// Replace the move log with the rule engine's extended PGN.
    pub fn set_pgn(&mut self, pgn: String) {
        self.pgn = pgn;
    }

    /// Record the terminal outcome and detach the finished game.
    ///
    /// This is the single terminal transition for a completed game: it can
    /// succeed at most once, and a second attempt (or one racing a leave)
    /// observes the session as gone.
    pub fn finish(&mut self, winner: Outcome) -> GameResult<CompletedGame> {
        match self.status {
            Status::InProgress { started_at } => {
                let ended_at = Utc::now();
                let white = self.white.clone().ok_or(GameError::InternalState {
                    code: self.code.clone(),
                })?;
                let black = self.black.clone().ok_or(GameError::InternalState {
                    code: self.code.clone(),
                })?;
                self.status = Status::Completed {
                    started_at,
                    ended_at,
                    winner,
                };
                Ok(CompletedGame {
                    id: None,
                    code: self.code.clone(),
                    bid_amount: self.bid_amount,
                    host: self.host.clone(),
                    white,
                    black,
                    pgn: self.pgn.clone(),
                    started_at,
                    ended_at,
                    winner,
                })
            }
            Status::Open => Err(GameError::GameNotStarted {
                code: self.code.clone(),
            }),
            Status::Completed { .. } | Status::Abandoned => Err(GameError::NotFound {
                code: self.code.clone(),
            }),
        }
    }

    /// Check leave permission: the host or a seated player only.
    pub fn ensure_can_leave(&self, user_id: UserId) -> GameResult<()> {
        if !self.is_active() {
            return Err(GameError::NotFound {
                code: self.code.clone(),
            });
        }
        if self.host.id == user_id || self.is_participant(user_id) {
            Ok(())
        } else {
            Err(GameError::Forbidden {
                code: self.code.clone(),
            })
        }
    }

    /// Destroy the session regardless of progress. No persistence follows.
    pub fn abandon(&mut self) -> GameResult<()> {
        match self.status {
            Status::Open | Status::InProgress { .. } => {
                self.status = Status::Abandoned;
                Ok(())
            }
            Status::Completed { .. } | Status::Abandoned => Err(GameError::NotFound {
                code: self.code.clone(),
            }),
        }
    }

    /// Flat snapshot for callers.
    pub fn view(&self) -> GameView {
        let (started_at, ended_at, winner) = match self.status {
            Status::Open | Status::Abandoned => (None, None, None),
            Status::InProgress { started_at } => (Some(started_at), None, None),
            Status::Completed {
                started_at,
                ended_at,
                winner,
            } => (Some(started_at), Some(ended_at), Some(winner)),
        };
        GameView {
            code: self.code.clone(),
            unlisted: self.unlisted,
            bid_amount: self.bid_amount,
            host: self.host.clone(),
            white: self.white.clone(),
            black: self.black.clone(),
            pgn: self.pgn.clone(),
            timeout: self.timeout,
            started_at,
            ended_at,
            winner,
        }
    }
}
