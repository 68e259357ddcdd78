//! Repository trait definitions for testability and dependency injection.
//!
//! The session registry consumes durable storage through these traits, so
//! tests can swap in in-memory doubles and the Postgres implementations stay
//! at the edge of the crate.

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::errors::{StoreError, StoreResult};
use crate::game::{CompletedGame, Outcome, User, UserId};
use crate::settlement::StatOutcome;

/// Durable storage for finished games.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Persist a completed game, returning its assigned id.
    async fn save(&self, game: &CompletedGame) -> StoreResult<i64>;

    /// Fetch one finished game by id.
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<CompletedGame>>;

    /// Fetch finished games a user played in, most recent first.
    async fn find_by_user_id(&self, user_id: UserId) -> StoreResult<Vec<CompletedGame>>;
}

/// Win/loss counter updates on the user store.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn increment_win_loss(&self, user_id: UserId, outcome: StatOutcome) -> StoreResult<()>;
}

/// Postgres implementation of [`GameStore`]
pub struct PgGameStore {
    pool: PgPool,
}

impl PgGameStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const GAME_COLUMNS: &str = "id, code, bid_amount, host_id, host_name, \
     white_id, white_name, black_id, black_name, pgn, started_at, ended_at, winner";

fn row_to_game(row: &PgRow) -> CompletedGame {
    CompletedGame {
        id: Some(row.get("id")),
        code: row.get("code"),
        bid_amount: row.get("bid_amount"),
        host: User::new(row.get("host_id"), row.get::<String, _>("host_name")),
        white: User::new(row.get("white_id"), row.get::<String, _>("white_name")),
        black: User::new(row.get("black_id"), row.get::<String, _>("black_name")),
        pgn: row.get("pgn"),
        started_at: row.get::<chrono::NaiveDateTime, _>("started_at").and_utc(),
        ended_at: row.get::<chrono::NaiveDateTime, _>("ended_at").and_utc(),
        winner: match row.get::<String, _>("winner").as_str() {
            "white" => Outcome::White,
            "black" => Outcome::Black,
            _ => Outcome::Draw,
        },
    }
}

#[async_trait]
impl GameStore for PgGameStore {
    async fn save(&self, game: &CompletedGame) -> StoreResult<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO finished_games
                (code, bid_amount, host_id, host_name, white_id, white_name,
                 black_id, black_name, pgn, started_at, ended_at, winner)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(&game.code)
        .bind(game.bid_amount)
        .bind(game.host.id)
        .bind(&game.host.name)
        .bind(game.white.id)
        .bind(&game.white.name)
        .bind(game.black.id)
        .bind(&game.black.name)
        .bind(&game.pgn)
        .bind(game.started_at.naive_utc())
        .bind(game.ended_at.naive_utc())
        .bind(game.winner.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<CompletedGame>> {
        let row = sqlx::query(&format!(
            "SELECT {GAME_COLUMNS} FROM finished_games WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_game))
    }

    async fn find_by_user_id(&self, user_id: UserId) -> StoreResult<Vec<CompletedGame>> {
        let rows = sqlx::query(&format!(
            "SELECT {GAME_COLUMNS} FROM finished_games
             WHERE white_id = $1 OR black_id = $1
             ORDER BY ended_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_game).collect())
    }
}

/// Postgres implementation of [`UserStore`]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn increment_win_loss(&self, user_id: UserId, outcome: StatOutcome) -> StoreResult<()> {
        let query = match outcome {
            StatOutcome::Win => sqlx::query("UPDATE users SET wins = wins + 1 WHERE id = $1"),
            StatOutcome::Loss => sqlx::query("UPDATE users SET losses = losses + 1 WHERE id = $1"),
        };
        let result = query.bind(user_id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(user_id));
        }
        Ok(())
    }
}
