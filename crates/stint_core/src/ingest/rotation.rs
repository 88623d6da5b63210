//! # Rotation Adapter
//!
//! Per-player on-court intervals (the provider's game-rotation rows) →
//! [`LineupState`]s, as an alternative to replaying substitutions.
//!
//! ## Algorithm
//! 1. Convert each row's `in`/`out` to game time using the caller's unit
//! 2. Cut the game at every row boundary and every period boundary
//! 3. Each segment's lineup is the set of players whose `[in, out)` covers it
//! 4. A segment without exactly five players fails the team

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

use crate::error::ReconstructionError;
use crate::models::{GameClock, GameTime, Lineup, LineupState, PlayerId, TeamId, LINEUP_SIZE};

/// Unit of `in_time`/`out_time` on rotation rows. The provider's
/// `IN_TIME_REAL`/`OUT_TIME_REAL` columns are tenths of a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationUnit {
    #[default]
    Seconds,
    Tenths,
}

impl RotationUnit {
    pub fn to_game_time(self, value: f64) -> Option<GameTime> {
        match self {
            RotationUnit::Seconds => GameTime::from_secs_f64(value),
            RotationUnit::Tenths => GameTime::from_secs_f64(value / 10.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationRecord {
    #[serde(alias = "TEAM_ID")]
    pub team_id: TeamId,
    #[serde(alias = "PERSON_ID")]
    pub player_id: PlayerId,
    #[serde(alias = "IN_TIME_REAL")]
    pub in_time: f64,
    #[serde(alias = "OUT_TIME_REAL")]
    pub out_time: f64,
}

/// Periods supported by the rows alone: the longest run `1..=p` in which
/// every team has at least a lineup's worth of rows overlapping each period.
/// A single row running far past the end does not lengthen the game.
pub fn rotation_periods(
    records: &[RotationRecord],
    unit: RotationUnit,
    clock: &GameClock,
    teams: &BTreeSet<TeamId>,
) -> u8 {
    if teams.is_empty() {
        return 0;
    }
    let spans: Vec<(TeamId, GameTime, GameTime)> = records
        .iter()
        .filter(|r| teams.contains(&r.team_id))
        .filter_map(|r| Some((r.team_id, unit.to_game_time(r.in_time)?, unit.to_game_time(r.out_time)?)))
        .filter(|(_, from, to)| from < to)
        .collect();

    let supported = |period: u8| {
        let (start, end) = (clock.period_start(period), clock.period_end(period));
        teams.iter().all(|&team| {
            spans
                .iter()
                .filter(|&&(t, from, to)| t == team && from < end && to > start)
                .count()
                >= LINEUP_SIZE
        })
    };

    let mut periods = 0u8;
    while periods < u8::MAX && supported(periods + 1) {
        periods += 1;
    }
    periods
}

struct Interval {
    player_id: PlayerId,
    from: GameTime,
    to: GameTime,
}

/// Lineup states of `team_id` over a game of `periods_played` periods.
pub fn lineup_states_from_rotation(
    team_id: TeamId,
    records: &[RotationRecord],
    unit: RotationUnit,
    clock: &GameClock,
    periods_played: u8,
) -> Result<Vec<LineupState>, ReconstructionError> {
    let game_end = clock.game_length(periods_played);

    let mut intervals = Vec::new();
    for record in records.iter().filter(|r| r.team_id == team_id) {
        let (Some(from), Some(to)) = (unit.to_game_time(record.in_time), unit.to_game_time(record.out_time))
        else {
            warn!(
                "team {}: skipping rotation row of player {} with invalid times {}..{}",
                team_id, record.player_id, record.in_time, record.out_time
            );
            continue;
        };
        if to > game_end {
            warn!(
                "team {}: clipping rotation row of player {} from {} to game end {}",
                team_id, record.player_id, to, game_end
            );
        }
        let to = to.min(game_end);
        if to <= from {
            warn!(
                "team {}: skipping empty rotation row of player {} at {}",
                team_id, record.player_id, from
            );
            continue;
        }
        intervals.push(Interval { player_id: record.player_id, from, to });
    }

    let mut cuts: BTreeSet<GameTime> = (1..=periods_played).map(|p| clock.period_start(p)).collect();
    cuts.insert(game_end);
    for interval in &intervals {
        cuts.insert(interval.from);
        cuts.insert(interval.to);
    }
    let cuts: Vec<GameTime> = cuts.into_iter().filter(|&t| t <= game_end).collect();

    let mut states = Vec::with_capacity(cuts.len());
    for window in cuts.windows(2) {
        let (from, to) = (window[0], window[1]);
        let on_court = intervals
            .iter()
            .filter(|i| i.from <= from && i.to >= to)
            .map(|i| i.player_id);
        let lineup = Lineup::new(on_court).map_err(|active_size| ReconstructionError::LineupIntegrity {
            team_id,
            at: from,
            active_size,
            event: None,
        })?;
        states.push(LineupState {
            team_id,
            period: clock.period_at(from, periods_played).unwrap_or(periods_played),
            lineup,
            valid_from: from,
            valid_to: to,
        });
    }

    Ok(states)
}
