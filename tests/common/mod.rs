//! Shared in-memory doubles for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU32, Ordering},
};

use chess_wager::db::{GameStore, StoreError, StoreResult, UserStore};
use chess_wager::rules::{MoveOutcome, RuleEngine, RulesError, TerminalReport};
use chess_wager::{CompletedGame, ServiceConfig, SessionRegistry, StatOutcome, User, UserId};

/// In-memory game store with injectable transient failures.
#[derive(Default)]
pub struct MemoryGameStore {
    games: Mutex<Vec<CompletedGame>>,
    fail_remaining: AtomicU32,
    save_attempts: AtomicU32,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `n` save attempts with a transient outage.
    pub fn failing_first(n: u32) -> Self {
        let store = Self::default();
        store.fail_remaining.store(n, Ordering::SeqCst);
        store
    }

    pub fn saved(&self) -> Vec<CompletedGame> {
        self.games.lock().unwrap().clone()
    }

    pub fn save_attempts(&self) -> u32 {
        self.save_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GameStore for MemoryGameStore {
    async fn save(&self, game: &CompletedGame) -> StoreResult<i64> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        if self
            .fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::Unavailable("injected outage".to_string()));
        }
        let mut games = self.games.lock().unwrap();
        let id = games.len() as i64 + 1;
        let mut stored = game.clone();
        stored.id = Some(id);
        games.push(stored);
        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<CompletedGame>> {
        Ok(self
            .games
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == Some(id))
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> StoreResult<Vec<CompletedGame>> {
        let mut games: Vec<CompletedGame> = self
            .games
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.white.id == user_id || g.black.id == user_id)
            .cloned()
            .collect();
        games.sort_by(|a, b| b.ended_at.cmp(&a.ended_at));
        Ok(games)
    }
}

/// In-memory user store tracking win/loss counters.
#[derive(Default)]
pub struct MemoryUserStore {
    stats: Mutex<HashMap<UserId, (i32, i32)>>,
    fail_remaining: AtomicU32,
    update_attempts: AtomicU32,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `n` updates with a transient outage.
    pub fn failing_first(n: u32) -> Self {
        let store = Self::default();
        store.fail_remaining.store(n, Ordering::SeqCst);
        store
    }

    /// `(wins, losses)` recorded for a user.
    pub fn stats(&self, user_id: UserId) -> (i32, i32) {
        self.stats
            .lock()
            .unwrap()
            .get(&user_id)
            .copied()
            .unwrap_or((0, 0))
    }

    pub fn update_attempts(&self) -> u32 {
        self.update_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn increment_win_loss(&self, user_id: UserId, outcome: StatOutcome) -> StoreResult<()> {
        self.update_attempts.fetch_add(1, Ordering::SeqCst);
        if self
            .fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::Unavailable("injected outage".to_string()));
        }
        let mut stats = self.stats.lock().unwrap();
        let entry = stats.entry(user_id).or_insert((0, 0));
        match outcome {
            StatOutcome::Win => entry.0 += 1,
            StatOutcome::Loss => entry.1 += 1,
        }
        Ok(())
    }
}

/// Scripted rule engine: appends moves to the log and reports whatever the
/// test staged for the next move.
#[derive(Default)]
pub struct ScriptedRules {
    next_terminal: Mutex<Option<TerminalReport>>,
    reject_next: Mutex<bool>,
}

impl ScriptedRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next applied move ends the game with `report`.
    pub fn report_on_next_move(&self, report: TerminalReport) {
        *self.next_terminal.lock().unwrap() = Some(report);
    }

    /// The next applied move is illegal.
    pub fn reject_next_move(&self) {
        *self.reject_next.lock().unwrap() = true;
    }
}

impl RuleEngine for ScriptedRules {
    fn apply_move(&self, pgn: &str, san: &str) -> Result<MoveOutcome, RulesError> {
        if std::mem::take(&mut *self.reject_next.lock().unwrap()) {
            return Err(RulesError::IllegalMove(san.to_string()));
        }
        let pgn = if pgn.is_empty() {
            san.to_string()
        } else {
            format!("{pgn} {san}")
        };
        let terminal = self.next_terminal.lock().unwrap().take();
        Ok(MoveOutcome { pgn, terminal })
    }
}

/// A registry wired to in-memory doubles.
pub struct Harness {
    pub registry: Arc<SessionRegistry>,
    pub games: Arc<MemoryGameStore>,
    pub users: Arc<MemoryUserStore>,
    pub rules: Arc<ScriptedRules>,
}

pub fn harness() -> Harness {
    harness_with(MemoryGameStore::new(), MemoryUserStore::new())
}

pub fn harness_with(games: MemoryGameStore, users: MemoryUserStore) -> Harness {
    let games = Arc::new(games);
    let users = Arc::new(users);
    let rules = Arc::new(ScriptedRules::new());
    let config = ServiceConfig {
        persist_retry_ms: 1,
        ..Default::default()
    };
    let registry = Arc::new(SessionRegistry::new(
        config,
        games.clone(),
        users.clone(),
        rules.clone(),
    ));
    Harness {
        registry,
        games,
        users,
        rules,
    }
}

pub fn user(id: UserId, name: &str) -> User {
    User::new(id, name)
}
