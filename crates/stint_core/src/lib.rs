//! # stint_core - Lineup Stint Reconstruction Engine
//!
//! Rebuilds, for each team of a completed basketball game, the sequence of
//! five-man units that were on court, from the play-by-play substitution log
//! (or per-player rotation rows).
//!
//! ## Features
//! - Stints tile the whole game per team, overtime included, with exact
//!   millisecond arithmetic
//! - Order-independent lineup identity, scoped by game and team
//! - Team-isolated failures with typed errors
//! - Stint boundaries reconciled onto the event log's action indices
//! - JSON API for string-in/string-out integration
//!
//! The crate performs no I/O beyond an optional config file and never
//! installs a tracing subscriber.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod models;
pub mod validate;

// Re-export main API functions
pub use api::{reconstruct_game_json, stint_schema_json, ReconstructRequest, ReconstructResponse, SCHEMA_VERSION};
pub use config::{ClockConfig, ReconcileConfig, ReconstructionConfig, CONFIG_PATH_ENV};
pub use error::{
    ClockError, ConfigError, MalformedEventError, NoNearbyEvent, ReconstructionError, Result, StintError,
    ValidationError,
};

// Re-export pipeline
pub use engine::{
    reconstruct_feed, reconstruct_game, reconstruct_game_from_rotation, reconstruct_game_records,
    reconstruct_games, GameLog, GameReconstruction, TeamReconstruction,
};
pub use ingest::{normalize_records, NormalizedFeed, Roster, RosterEntry, RotationRecord, RotationUnit};
pub use models::{
    Event, EventKind, GameClock, GameId, GameTime, Lineup, LineupHash, PlayerId, ReconcileStatus, Stint,
    StintKey, TeamId,
};
pub use validate::{validate_game, validate_team_stints};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
