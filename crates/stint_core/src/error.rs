use thiserror::Error;

use crate::models::{Event, GameTime, Lineup, PlayerId, TeamId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("invalid period: {0}")]
    InvalidPeriod(u8),

    #[error("clock value {value} outside period {period} of length {length}")]
    OutOfRange { period: u8, value: GameTime, length: GameTime },

    #[error("unparsable clock string: '{0}'")]
    Unparsable(String),
}

/// One raw record that could not be normalized. The record is skipped and
/// the rest of the game is processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed event record #{record} (action {action_index:?}): {reason}")]
pub struct MalformedEventError {
    /// Position of the record in the raw feed
    pub record: usize,
    pub action_index: Option<u64>,
    pub reason: String,
}

/// Failures that end one team's reconstruction for the game. The team
/// emits no stints; the other team is unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconstructionError {
    #[error(
        "team {team_id} period {period}: starting five unresolved, {} candidate(s) after scanning {subs_scanned} substitution(s)",
        .candidates.len()
    )]
    StartingFiveUnresolved {
        team_id: TeamId,
        period: u8,
        candidates: Vec<PlayerId>,
        subs_scanned: usize,
    },

    #[error(
        "team {team_id}: substitution at action {} sends off {:?} who is not on court {active}",
        .event.action_index,
        .event.player_out_id
    )]
    SubstitutionMismatch { team_id: TeamId, event: Box<Event>, active: Lineup },

    #[error("team {team_id}: lineup would hold {active_size} players at {at}")]
    LineupIntegrity {
        team_id: TeamId,
        at: GameTime,
        active_size: usize,
        event: Option<Box<Event>>,
    },
}

impl ReconstructionError {
    pub fn team_id(&self) -> TeamId {
        match self {
            ReconstructionError::StartingFiveUnresolved { team_id, .. }
            | ReconstructionError::SubstitutionMismatch { team_id, .. }
            | ReconstructionError::LineupIntegrity { team_id, .. } => *team_id,
        }
    }

    /// Stable short code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            ReconstructionError::StartingFiveUnresolved { .. } => "starting_five_unresolved",
            ReconstructionError::SubstitutionMismatch { .. } => "substitution_mismatch",
            ReconstructionError::LineupIntegrity { .. } => "lineup_integrity",
        }
    }
}

/// A stint boundary with no event close enough to reconcile against. The
/// stint is kept with unresolved indices.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("team {team_id}: no event within {tolerance} of stint boundary {at}")]
pub struct NoNearbyEvent {
    pub team_id: TeamId,
    pub at: GameTime,
    pub tolerance: GameTime,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("team {team_id}: stints begin at {at}, expected 0")]
    LateStart { team_id: TeamId, at: GameTime },

    #[error("team {team_id}: gap or overlap between {previous_end} and {next_start}")]
    Discontinuity { team_id: TeamId, previous_end: GameTime, next_start: GameTime },

    #[error("team {team_id}: stints end at {at}, game ends at {game_end}")]
    EarlyEnd { team_id: TeamId, at: GameTime, game_end: GameTime },

    #[error("team {team_id}: zero-length stint at {at}")]
    ZeroDuration { team_id: TeamId, at: GameTime },

    #[error("team {team_id}: stint at {at} does not hold five sorted distinct players")]
    BadLineup { team_id: TeamId, at: GameTime },

    #[error("team {team_id}: lineup hash '{hash}' does not match its players")]
    HashMismatch { team_id: TeamId, hash: String },

    #[error("lineup hash '{hash}' appears for teams {first} and {second}")]
    SharedAcrossTeams { hash: String, first: TeamId, second: TeamId },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Crate-level error for the string-in/string-out surfaces.
#[derive(Error, Debug)]
pub enum StintError {
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unsupported schema version {found}, expected {expected}")]
    SchemaVersion { found: u8, expected: u8 },

    #[error(transparent)]
    Config(#[from] ConfigError),

}

pub type Result<T> = std::result::Result<T, StintError>;
