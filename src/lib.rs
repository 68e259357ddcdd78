//! # Chess Wager
//!
//! Session engine for wagered chess games: matches two players into a staked
//! game, tracks the session from creation through completion, and reconciles
//! the outcome against each player's record and stake.
//!
//! ## Architecture
//!
//! The crate is the active-session core of a larger service. The HTTP layer,
//! authentication, chess rule engine, and UI live outside it:
//!
//! - **Session registry**: concurrency-safe store of in-flight games, keyed
//!   by short public codes; serializes all mutation per code
//! - **Game session**: explicit tagged state machine
//!   (`Open` → `InProgress` → `Completed`, or `Abandoned`)
//! - **Settlement**: win/loss counters and the pooled stake, applied exactly
//!   once per game at the registry's single terminal transition
//! - **Persistence gateway**: sqlx/Postgres repositories behind store traits
//! - **Rule engine seam**: move legality and terminal detection consumed as
//!   a black box
//!
//! ## Example
//!
//! ```no_run
//! use chess_wager::{CreateGame, ServiceConfig, SessionRegistry, User};
//! use chess_wager::db::{Database, PgGameStore, PgUserStore};
//! use std::sync::Arc;
//!
//! # struct Engine;
//! # impl chess_wager::RuleEngine for Engine {
//! #     fn apply_move(
//! #         &self,
//! #         _: &str,
//! #         _: &str,
//! #     ) -> Result<chess_wager::MoveOutcome, chess_wager::rules::RulesError> {
//! #         unimplemented!()
//! #     }
//! # }
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::from_env()?;
//!     let db = Database::new(&config.database).await?;
//!     let registry = SessionRegistry::new(
//!         config,
//!         Arc::new(PgGameStore::new(db.pool().clone())),
//!         Arc::new(PgUserStore::new(db.pool().clone())),
//!         Arc::new(Engine),
//!     );
//!
//!     let host = User::new(1, "alice");
//!     let game = registry.create(host, CreateGame::default()).await?;
//!     println!("created game {}", game.code);
//!     Ok(())
//! }
//! ```

/// Service configuration.
pub mod config;
pub use config::{ConfigError, DEFAULT_MIN_BID, ServiceConfig};

/// Persistence gateway (pool, repositories, store traits).
pub mod db;
pub use db::{Database, GameStore, StoreError, StoreResult, UserStore};

/// Game models and the session state machine.
pub mod game;
pub use game::{
    CompletedGame, GameError, GameResult, GameSession, GameView, Outcome, Side, Stake, Status,
    User, UserId,
};

/// The session registry, code generator, and listing helpers.
pub mod registry;
pub use registry::{CodeGenerator, CreateGame, SessionRegistry};

/// Rule engine seam.
pub mod rules;
pub use rules::{MoveOutcome, RuleEngine, TerminalReport};

/// Stats and bid settlement.
pub mod settlement;
pub use settlement::{BidTransfer, Settlement, StakeResolver, StatOutcome, resolve};
