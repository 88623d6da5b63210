//! # Game Reconstruction
//!
//! Runs the per-team pipeline for one game:
//! starters → substitution replay → stints → reconciliation.
//!
//! Teams are isolated from each other: a team that fails keeps its typed
//! error and emits no stints, the other team carries on. Games are
//! independent, so [`reconstruct_games`] fans them out over rayon.

use rayon::prelude::*;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

use super::reconciler::{reconcile_stints, EventTimeline};
use super::starters::resolve_starting_five;
use super::state_machine::replay_substitutions;
use super::stint_builder::build_stints;
use crate::config::ReconstructionConfig;
use crate::error::{MalformedEventError, NoNearbyEvent, ReconstructionError};
use crate::ingest::{
    lineup_states_from_rotation, normalize_records, rotation_periods, NormalizedFeed, Roster, RotationRecord,
    RotationUnit,
};
use crate::models::{
    sort_events, supported_periods, team_substitutions, Event, GameClock, GameId, GameTime, LineupState, Stint, TeamId,
};

/// Outcome for one team of one game.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamReconstruction {
    pub team_id: TeamId,
    pub outcome: Result<Vec<Stint>, ReconstructionError>,
}

impl TeamReconstruction {
    /// Stints of a successful team; empty for a failed one.
    pub fn stints(&self) -> &[Stint] {
        self.outcome.as_deref().unwrap_or(&[])
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Per-game report.
#[derive(Debug, Clone, PartialEq)]
pub struct GameReconstruction {
    pub game_id: GameId,
    pub periods_played: u8,
    pub game_length: GameTime,
    /// Ascending team id
    pub teams: Vec<TeamReconstruction>,
    pub rejected_events: Vec<MalformedEventError>,
    pub reconcile_failures: Vec<NoNearbyEvent>,
}

impl GameReconstruction {
    pub fn team(&self, team_id: TeamId) -> Option<&TeamReconstruction> {
        self.teams.iter().find(|t| t.team_id == team_id)
    }

    /// All stints of successful teams, team by team.
    pub fn stints(&self) -> impl Iterator<Item = &Stint> {
        self.teams.iter().flat_map(TeamReconstruction::stints)
    }
}

/// One game's canonical events, for batch processing.
#[derive(Debug, Clone, PartialEq)]
pub struct GameLog {
    pub game_id: GameId,
    pub events: Vec<Event>,
}

/// Reconstruct every team found in `events`.
pub fn reconstruct_game(game_id: &GameId, events: &[Event], config: &ReconstructionConfig) -> GameReconstruction {
    reconstruct_feed(game_id, NormalizedFeed::from_events(events.to_vec()), config)
}

/// Normalize raw provider records, then reconstruct.
pub fn reconstruct_game_records(
    game_id: &GameId,
    records: &[Value],
    roster: &Roster,
    config: &ReconstructionConfig,
) -> GameReconstruction {
    reconstruct_feed(game_id, normalize_records(records, config, roster), config)
}

/// Reconstruct from an already-normalized feed, keeping its rejected records
/// in the report.
pub fn reconstruct_feed(game_id: &GameId, feed: NormalizedFeed, config: &ReconstructionConfig) -> GameReconstruction {
    let clock = GameClock::new(&config.clock);
    let events = &feed.events;
    let teams = discover_teams(events, config.neutral_team_id);
    let periods_played = supported_periods(events, &teams);
    warn_unsupported_periods(game_id, events, periods_played);

    info!(
        "Reconstructing game {} ({} events, {} periods)",
        game_id,
        events.len(),
        periods_played
    );

    let outcomes: Vec<(TeamId, Result<Vec<LineupState>, ReconstructionError>)> = teams
        .into_iter()
        .map(|team_id| (team_id, team_states(events, team_id, &clock, periods_played)))
        .collect();

    finish(game_id, events, outcomes, feed.rejected, periods_played, &clock, config)
}

/// Reconstruct from per-player rotation rows instead of substitutions.
/// `events` is only used for reconciliation and may be empty.
pub fn reconstruct_game_from_rotation(
    game_id: &GameId,
    events: &[Event],
    rotation: &[RotationRecord],
    unit: RotationUnit,
    config: &ReconstructionConfig,
) -> GameReconstruction {
    let clock = GameClock::new(&config.clock);
    let mut events = events.to_vec();
    sort_events(&mut events);

    let teams: BTreeSet<TeamId> = rotation
        .iter()
        .map(|r| r.team_id)
        .filter(|&t| t != config.neutral_team_id)
        .collect();

    // The log decides the length when it has one; otherwise each team's
    // own rows must put a full lineup into a period for it to count.
    let periods_played = match supported_periods(&events, &discover_teams(&events, config.neutral_team_id)) {
        0 => rotation_periods(rotation, unit, &clock, &teams),
        from_log => {
            warn_unsupported_periods(game_id, &events, from_log);
            from_log
        }
    };

    info!(
        "Reconstructing game {} from {} rotation rows ({} periods)",
        game_id,
        rotation.len(),
        periods_played
    );

    let outcomes = teams
        .into_iter()
        .map(|team_id| {
            let states = lineup_states_from_rotation(team_id, rotation, unit, &clock, periods_played);
            (team_id, states)
        })
        .collect();

    finish(game_id, &events, outcomes, Vec::new(), periods_played, &clock, config)
}

/// Reconstruct many independent games in parallel. Output order follows
/// input order and matches sequential processing.
pub fn reconstruct_games(games: &[GameLog], config: &ReconstructionConfig) -> Vec<GameReconstruction> {
    games
        .par_iter()
        .map(|game| reconstruct_game(&game.game_id, &game.events, config))
        .collect()
}

/// Lineup states of one team: starters of every period, then replay.
pub fn team_states(
    events: &[Event],
    team_id: TeamId,
    clock: &GameClock,
    periods_played: u8,
) -> Result<Vec<LineupState>, ReconstructionError> {
    let mut starters = BTreeMap::new();
    for period in 1..=periods_played {
        let lineup = resolve_starting_five(events, team_id, period)?;
        debug!("team {} P{} starters {}", team_id, period, lineup);
        starters.insert(period, lineup);
    }

    let subs = team_substitutions(events, team_id);
    replay_substitutions(team_id, &starters, &subs, clock, periods_played)
}

/// Stints of one team, not yet reconciled.
pub fn reconstruct_team(
    game_id: &GameId,
    events: &[Event],
    team_id: TeamId,
    config: &ReconstructionConfig,
    periods_played: u8,
) -> Result<Vec<Stint>, ReconstructionError> {
    let clock = GameClock::new(&config.clock);
    let states = team_states(events, team_id, &clock, periods_played)?;
    Ok(build_stints(game_id, &states))
}

fn discover_teams(events: &[Event], neutral: TeamId) -> BTreeSet<TeamId> {
    events
        .iter()
        .filter_map(|e| e.team_id)
        .filter(|&t| t != neutral)
        .collect()
}

fn warn_unsupported_periods(game_id: &GameId, events: &[Event], periods_played: u8) {
    let beyond = events.iter().filter(|e| e.period > periods_played).count();
    if beyond > 0 {
        warn!(
            "game {}: ignoring {} events past period {} that not every team reached",
            game_id, beyond, periods_played
        );
    }
}

fn finish(
    game_id: &GameId,
    events: &[Event],
    outcomes: Vec<(TeamId, Result<Vec<LineupState>, ReconstructionError>)>,
    rejected_events: Vec<MalformedEventError>,
    periods_played: u8,
    clock: &GameClock,
    config: &ReconstructionConfig,
) -> GameReconstruction {
    let timeline = EventTimeline::new(events);
    let tolerance = config.reconcile.tolerance();
    let mut reconcile_failures = Vec::new();

    let teams: Vec<TeamReconstruction> = outcomes
        .into_iter()
        .map(|(team_id, states)| {
            let outcome = states.map(|states| {
                let mut stints = build_stints(game_id, &states);
                reconcile_failures.extend(reconcile_stints(&mut stints, &timeline, tolerance));
                stints
            });
            match &outcome {
                Ok(stints) => debug!("team {}: {} stints", team_id, stints.len()),
                Err(err) => warn!("game {}: team {} failed [{}]: {}", game_id, err.team_id(), err.code(), err),
            }
            TeamReconstruction { team_id, outcome }
        })
        .collect();

    let succeeded = teams.iter().filter(|t| t.is_ok()).count();
    info!(
        "Game {} reconstructed: {}/{} teams, {} stints, {} rejected records, {} unreconciled boundaries",
        game_id,
        succeeded,
        teams.len(),
        teams.iter().map(|t| t.stints().len()).sum::<usize>(),
        rejected_events.len(),
        reconcile_failures.len()
    );

    GameReconstruction {
        game_id: game_id.clone(),
        periods_played,
        game_length: clock.game_length(periods_played),
        teams,
        rejected_events,
        reconcile_failures,
    }
}
