//! Service configuration management.
//!
//! Consolidates all environment variable reads and provides validated
//! configuration for the session registry and its persistence gateway.

use thiserror::Error;

use crate::db::DatabaseConfig;
use crate::game::Stake;
use crate::registry::codegen::DEFAULT_CODE_LENGTH;

/// Minimum non-zero bid accepted at game creation.
pub const DEFAULT_MIN_BID: Stake = 50;

/// Complete service configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Smallest accepted non-zero bid
    pub min_bid: Stake,
    /// Length of generated game codes
    pub code_length: usize,
    /// Attempts against the persistence gateway before escalating
    pub persist_attempts: u32,
    /// Delay between persistence attempts, in milliseconds
    pub persist_retry_ms: u64,
    /// Database configuration
    pub database: DatabaseConfig,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables and defaults: `MIN_BID` (50), `GAME_CODE_LENGTH`
    /// (6), `PERSIST_ATTEMPTS` (3), `PERSIST_RETRY_MS` (250), plus the
    /// `DB_*` pool variables with a development `DATABASE_URL` fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ServiceConfig {
            min_bid: parse_env_or("MIN_BID", DEFAULT_MIN_BID),
            code_length: parse_env_or("GAME_CODE_LENGTH", DEFAULT_CODE_LENGTH),
            persist_attempts: parse_env_or("PERSIST_ATTEMPTS", 3),
            persist_retry_ms: parse_env_or("PERSIST_RETRY_MS", 250),
            database: DatabaseConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_bid < 0 {
            return Err(ConfigError::Invalid {
                var: "MIN_BID".to_string(),
                reason: "Must not be negative".to_string(),
            });
        }

        // Below 6 characters the collision bound for concurrent codes no
        // longer holds.
        if self.code_length < 6 {
            return Err(ConfigError::Invalid {
                var: "GAME_CODE_LENGTH".to_string(),
                reason: "Must be at least 6".to_string(),
            });
        }

        if self.persist_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "PERSIST_ATTEMPTS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_bid: DEFAULT_MIN_BID,
            code_length: DEFAULT_CODE_LENGTH,
            persist_attempts: 3,
            persist_retry_ms: 250,
            database: DatabaseConfig::development(),
        }
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
pub(crate) fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
