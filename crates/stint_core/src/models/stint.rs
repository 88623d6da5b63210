use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GameId, PlayerId, TeamId};
use super::time::GameTime;

/// Order-independent identity of a five-man group: the sorted ids joined
/// with `-`. Only unique within `(game_id, team_id)`; store it under
/// [`StintKey`], never on its own.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct LineupHash(pub String);

impl LineupHash {
    pub fn of(players: &[PlayerId]) -> Self {
        let mut sorted = players.to_vec();
        sorted.sort_unstable();
        Self(sorted.iter().map(|p| p.0.to_string()).collect::<Vec<_>>().join("-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineupHash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage key for a stint's lineup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub struct StintKey {
    pub game_id: GameId,
    pub team_id: TeamId,
    pub lineup_hash: LineupHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStatus {
    /// Not yet mapped onto the event log
    #[default]
    Pending,
    Resolved,
    /// At least one boundary had no event within tolerance
    Unresolved,
}

/// A maximal interval with one unchanged five-man unit on court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Stint {
    pub game_id: GameId,
    pub team_id: TeamId,
    pub period: u8,
    /// Ascending player ids
    pub players: [PlayerId; 5],
    pub lineup_hash: LineupHash,
    pub start: GameTime,
    pub end: GameTime,
    /// Reporting convenience. Summing these is only approximate; partition
    /// checks use [`Stint::duration`], which is exact to the millisecond.
    pub duration_secs: f64,
    /// First action index inside the stint (inclusive)
    pub start_index: Option<u64>,
    /// First action index after the stint (exclusive)
    pub end_index: Option<u64>,
    #[serde(default)]
    pub reconcile: ReconcileStatus,
}

impl Stint {
    /// Exact length; these sum to the game length without rounding.
    pub fn duration(&self) -> GameTime {
        self.end.saturating_sub(self.start)
    }

    pub fn key(&self) -> StintKey {
        StintKey {
            game_id: self.game_id.clone(),
            team_id: self.team_id,
            lineup_hash: self.lineup_hash.clone(),
        }
    }

    /// Whether `action_index` falls inside `[start_index, end_index)`.
    pub fn claims(&self, action_index: u64) -> bool {
        match (self.start_index, self.end_index) {
            (Some(start), Some(end)) => action_index >= start && action_index < end,
            _ => false,
        }
    }

    /// JSON Schema handed to the persistence layer.
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Stint)
    }
}

impl fmt::Display for Stint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let index = |i: Option<u64>| i.map_or_else(|| "?".to_string(), |i| i.to_string());
        write!(
            f,
            "team {} P{} {} -> {} ({}) [{}] idx {}..{}",
            self.team_id,
            self.period,
            self.start,
            self.end,
            self.duration(),
            self.lineup_hash,
            index(self.start_index),
            index(self.end_index),
        )
    }
}
