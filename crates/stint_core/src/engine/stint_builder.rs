//! # Stint Builder
//!
//! Lineup states → stints.
//!
//! ## Algorithm
//! 1. Drop zero-length states
//! 2. Merge consecutive states of one period that hold the same five
//! 3. Stamp each survivor with its duration and lineup hash
//!
//! Stints come out with [`ReconcileStatus::Pending`]; the reconciler fills
//! in the action indices.

use tracing::debug;

use crate::models::{GameId, GameTime, Lineup, LineupState, ReconcileStatus, Stint, TeamId};

/// Internal struct for growing one stint across merged states.
struct StintBuilder {
    team_id: TeamId,
    period: u8,
    lineup: Lineup,
    start: GameTime,
    end: GameTime,
}

impl StintBuilder {
    fn new(state: &LineupState) -> Self {
        Self {
            team_id: state.team_id,
            period: state.period,
            lineup: state.lineup,
            start: state.valid_from,
            end: state.valid_to,
        }
    }

    fn extends(&self, state: &LineupState) -> bool {
        state.period == self.period && state.lineup == self.lineup && state.valid_from == self.end
    }

    fn build(self, game_id: &GameId) -> Stint {
        let duration = self.end.saturating_sub(self.start);
        Stint {
            game_id: game_id.clone(),
            team_id: self.team_id,
            period: self.period,
            players: *self.lineup.players(),
            lineup_hash: self.lineup.hash(),
            start: self.start,
            end: self.end,
            duration_secs: duration.as_secs_f64(),
            start_index: None,
            end_index: None,
            reconcile: ReconcileStatus::Pending,
        }
    }
}

pub fn build_stints(game_id: &GameId, states: &[LineupState]) -> Vec<Stint> {
    let mut stints = Vec::new();
    let mut current: Option<StintBuilder> = None;

    for state in states {
        if state.is_degenerate() {
            debug!(
                "team {} P{}: dropping zero-length lineup {} at {}",
                state.team_id, state.period, state.lineup, state.valid_from
            );
            continue;
        }

        if let Some(builder) = current.as_mut().filter(|b| b.extends(state)) {
            builder.end = state.valid_to;
            continue;
        }
        if let Some(done) = current.replace(StintBuilder::new(state)) {
            stints.push(done.build(game_id));
        }
    }

    if let Some(done) = current {
        stints.push(done.build(game_id));
    }

    stints
}
