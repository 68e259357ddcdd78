//! Session registry coordinating all active games.
//!
//! The registry is the single source of truth for in-flight sessions. One
//! instance is constructed at service start with its stores and rule engine
//! injected, and every request handler goes through it.
//!
//! Concurrency discipline: the code-to-session map sits behind an `RwLock`
//! whose hold times are O(1) (insert, lookup, remove of an `Arc`); all
//! per-code mutation happens under that session's own `Mutex`, so operations
//! on distinct codes never block each other. Store calls run with both locks
//! released, on detached data. Lock order is map before session; the one
//! path that touches the session first (move-driven completion) drops the
//! session lock before touching the map.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, RwLock};
use tokio::time::{Duration, sleep};

use super::codegen::CodeGenerator;
use crate::config::ServiceConfig;
use crate::db::{GameStore, UserStore};
use crate::game::{
    CompletedGame, GameError, GameResult, GameSession, GameView, Outcome, Side, Stake, User, UserId,
};
use crate::rules::{RuleEngine, RulesError};
use crate::settlement::StakeResolver;

type SessionSlot = Arc<Mutex<GameSession>>;

/// Game creation request
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateGame {
    /// Requested side; a uniformly random one when unset.
    pub side: Option<Side>,
    /// Excluded from the public listing (still joinable by code).
    pub unlisted: bool,
    /// Stake each player puts up. Zero means a friendly game.
    pub bid_amount: Stake,
    /// Optional per-player clock budget in seconds, enforced by the
    /// external clock engine; stored here only.
    pub timeout: Option<u32>,
}

/// Registry of all active game sessions.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionSlot>>,
    codes: CodeGenerator,
    games: Arc<dyn GameStore>,
    resolver: StakeResolver,
    rules: Arc<dyn RuleEngine>,
    config: ServiceConfig,
}

impl SessionRegistry {
    /// Create a new registry with injected collaborators.
    pub fn new(
        config: ServiceConfig,
        games: Arc<dyn GameStore>,
        users: Arc<dyn UserStore>,
        rules: Arc<dyn RuleEngine>,
    ) -> Self {
        let codes = CodeGenerator::new(config.code_length);
        let resolver = StakeResolver::new(
            users,
            config.persist_attempts,
            Duration::from_millis(config.persist_retry_ms),
        );
        Self {
            sessions: RwLock::new(HashMap::new()),
            codes,
            games,
            resolver,
            rules,
            config,
        }
    }

    /// Create a new session hosted by `host`.
    ///
    /// Fails with `InvalidBid` before any code is consumed. The session is
    /// visible to lookup and listing as soon as this returns.
    pub async fn create(&self, host: User, request: CreateGame) -> GameResult<GameView> {
        let min = self.config.min_bid;
        if request.bid_amount < 0 || (request.bid_amount != 0 && request.bid_amount < min) {
            return Err(GameError::InvalidBid {
                bid: request.bid_amount,
                min,
            });
        }

        let side = request.side.unwrap_or_else(Side::random);
        let mut sessions = self.sessions.write().await;
        // Retry on collision against the live code set.
        let code = loop {
            let candidate = self.codes.generate();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        let session = GameSession::new(
            code.clone(),
            host,
            side,
            request.unlisted,
            request.bid_amount,
            request.timeout,
        );
        let view = session.view();
        sessions.insert(code.clone(), Arc::new(Mutex::new(session)));
        drop(sessions);

        log::info!(
            "created game {code} (side {side}, unlisted {}, bid {})",
            request.unlisted,
            request.bid_amount
        );
        Ok(view)
    }

    /// Snapshot of joinable public sessions: listed, undecided, one seat
    /// open. Order is unspecified; callers sort.
    pub async fn list_public(&self) -> Vec<GameView> {
        let slots: Vec<SessionSlot> = self.sessions.read().await.values().cloned().collect();
        let mut views = Vec::new();
        for slot in slots {
            let session = slot.lock().await;
            if session.is_listed_open() {
                views.push(session.view());
            }
        }
        views
    }

    /// Fetch one active session by code.
    pub async fn find_by_code(&self, code: &str) -> GameResult<GameView> {
        let slot = self.slot(code).await?;
        let session = slot.lock().await;
        if !session.is_active() {
            return Err(not_found(code));
        }
        Ok(session.view())
    }

    /// Join the open seat of the session with `code`.
    ///
    /// Exactly one of two racing joiners wins the last seat; the loser gets
    /// `GameFull`. A user already seated gets the current view back
    /// unchanged (idempotent rejoin).
    pub async fn join(&self, code: &str, user: User) -> GameResult<GameView> {
        let slot = self.slot(code).await?;
        let mut session = slot.lock().await;
        let user_id = user.id;
        match session.take_seat(user) {
            Ok(side) => {
                log::info!("user {user_id} joined game {code} as {side}");
                Ok(session.view())
            }
            Err(GameError::AlreadySeated { .. }) => Ok(session.view()),
            Err(err) => Err(err),
        }
    }

    /// Submit a move for a seated player.
    ///
    /// Legality is the rule engine's call; this gates on participant and
    /// state, appends the engine's extended PGN, and runs the completion
    /// path inline when the engine reports a terminal position.
    pub async fn submit_move(&self, code: &str, user_id: UserId, san: &str) -> GameResult<GameView> {
        let slot = self.slot(code).await?;
        let (view, completed) = {
            let mut session = slot.lock().await;
            session.ensure_can_move(user_id)?;
            let outcome = self
                .rules
                .apply_move(session.pgn(), san)
                .map_err(|RulesError::IllegalMove(san)| GameError::IllegalMove {
                    code: code.to_string(),
                    san,
                })?;
            session.set_pgn(outcome.pgn);
            let completed = match outcome.terminal {
                Some(report) => Some(session.finish(report.outcome())?),
                None => None,
            };
            (session.view(), completed)
        };

        if let Some(game) = completed {
            self.complete(game).await?;
        }
        Ok(view)
    }

    /// Remove a session entirely, regardless of progress. Abandonment: no
    /// partial game is persisted.
    pub async fn leave(&self, code: &str, user_id: UserId) -> GameResult<()> {
        let slot = self.slot(code).await?;
        {
            let mut session = slot.lock().await;
            session.ensure_can_leave(user_id)?;
            session.abandon()?;
        }
        self.sessions.write().await.remove(code);
        log::info!("game {code} abandoned by user {user_id}");
        Ok(())
    }

    /// Record a terminal outcome reported by the rule or clock engine.
    ///
    /// Succeeds at most once per code; a second call observes the session
    /// as gone and gets `NotFound`.
    pub async fn record_terminal(&self, code: &str, winner: Outcome) -> GameResult<GameView> {
        let slot = self.slot(code).await?;
        let (view, game) = {
            let mut session = slot.lock().await;
            let game = session.finish(winner)?;
            (session.view(), game)
        };
        self.complete(game).await?;
        Ok(view)
    }

    /// Fetch one finished game by its store id.
    pub async fn finished_game(&self, id: i64) -> GameResult<CompletedGame> {
        let game = self.games.find_by_id(id).await?;
        game.ok_or_else(|| not_found(&id.to_string()))
    }

    /// Fetch finished games for a user, most recent first.
    pub async fn finished_games_for(&self, user_id: UserId) -> GameResult<Vec<CompletedGame>> {
        Ok(self.games.find_by_user_id(user_id).await?)
    }

    /// Number of sessions currently registered.
    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drain and discard all active sessions at service stop.
    pub async fn shutdown(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        for code in sessions.keys() {
            log::warn!("discarding active game {code} at shutdown");
        }
        sessions.clear();
        count
    }

    async fn slot(&self, code: &str) -> GameResult<SessionSlot> {
        self.sessions
            .read()
            .await
            .get(code)
            .cloned()
            .ok_or_else(|| not_found(code))
    }

    /// Completion path for a detached finished game: remove the session,
    /// settle stats and stake, then persist with bounded retries. The
    /// outcome is never dropped silently; exhausted retries escalate as
    /// `Persistence`.
    async fn complete(&self, game: CompletedGame) -> GameResult<()> {
        self.sessions.write().await.remove(&game.code);
        self.resolver.settle(&game).await?;
        let id = self.save_with_retry(&game).await?;
        log::info!(
            "game {} completed: winner {}, stored as {id}",
            game.code,
            game.winner
        );
        Ok(())
    }

    async fn save_with_retry(&self, game: &CompletedGame) -> GameResult<i64> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.games.save(game).await {
                Ok(id) => return Ok(id),
                Err(err) if attempt < self.config.persist_attempts && err.is_transient() => {
                    log::warn!(
                        "saving completed game {} failed (attempt {attempt}): {err}",
                        game.code
                    );
                    sleep(Duration::from_millis(self.config.persist_retry_ms)).await;
                }
                Err(err) => {
                    log::error!(
                        "giving up on saving game {} after {attempt} attempts: {err}",
                        game.code
                    );
                    return Err(err.into());
                }
            }
        }
    }
}

fn not_found(code: &str) -> GameError {
    GameError::NotFound {
        code: code.to_string(),
    }
}
