//! Session registry: the concurrency core of the service.
//!
//! This module implements:
//! - [`SessionRegistry`]: the concurrency-safe store of all active sessions
//! - [`CodeGenerator`]: short collision-resistant public game codes
//! - Listing helpers deriving the public lobby view from registry snapshots

pub mod codegen;
pub mod listing;
pub mod manager;

pub use codegen::{CODE_ALPHABET, CodeGenerator, DEFAULT_CODE_LENGTH};
pub use listing::{DisplayStatus, SortDirection, SortKey, sort_games};
pub use manager::{CreateGame, SessionRegistry};
