//! # Lineup State Machine
//!
//! Replays one team's substitutions from each period's starting five and
//! emits the on-court lineup between consecutive transitions.
//!
//! Substitutions sharing a timestamp are applied through a pending queue: a
//! candidate is applied once its outgoing player is on court and its
//! incoming player is not; everything else waits for the next pass. A pass
//! that applies nothing ends the team's reconstruction.
//!
//! A same-instant transition closes a zero-length state. Those are left in
//! the output and dropped by the stint builder.

use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

use crate::error::ReconstructionError;
use crate::models::{Event, GameClock, GameTime, Lineup, LineupState, TeamId, LINEUP_SIZE};

/// Replay state of one team inside one period.
struct Replay {
    team_id: TeamId,
    period: u8,
    active: Lineup,
    since: GameTime,
    states: Vec<LineupState>,
}

impl Replay {
    fn close(&mut self, at: GameTime) {
        self.states.push(LineupState {
            team_id: self.team_id,
            period: self.period,
            lineup: self.active,
            valid_from: self.since,
            valid_to: at,
        });
        self.since = at;
    }

    fn applicable(&self, sub: &Event) -> bool {
        match (sub.player_out_id, sub.player_in_id) {
            (Some(out), Some(incoming)) => self.active.contains(out) && !self.active.contains(incoming),
            _ => false,
        }
    }

    fn apply(&mut self, sub: &Event) -> Result<(), ReconstructionError> {
        let integrity = |active_size: usize| ReconstructionError::LineupIntegrity {
            team_id: self.team_id,
            at: sub.time,
            active_size,
            event: Some(Box::new(sub.clone())),
        };

        let (Some(out), Some(incoming)) = (sub.player_out_id, sub.player_in_id) else {
            return Err(integrity(LINEUP_SIZE - 1));
        };
        if out == incoming {
            // the set never changes, but the record still claims a departure
            return Err(integrity(LINEUP_SIZE - 1));
        }
        let next = self.active.substitute(out, incoming).map_err(integrity)?;

        self.close(sub.time);
        debug!(
            "team {} P{} {}: {} out, {} in -> {}",
            self.team_id, self.period, sub.time, out, incoming, next
        );
        self.active = next;
        Ok(())
    }

    /// Apply every substitution of one instant, in whatever order makes
    /// each one valid.
    fn apply_instant(&mut self, group: Vec<&Event>) -> Result<(), ReconstructionError> {
        let mut pending: VecDeque<&Event> = group.into();
        while !pending.is_empty() {
            let mut progressed = false;
            for _ in 0..pending.len() {
                let Some(sub) = pending.pop_front() else { break };
                if self.applicable(sub) {
                    self.apply(sub)?;
                    progressed = true;
                } else {
                    pending.push_back(sub);
                }
            }
            if progressed {
                continue;
            }

            // Nothing fits. An outgoing player on court means the incoming
            // one is already there too; otherwise the record is stale.
            if let Some(sub) = pending.iter().find(|s| s.player_out_id.is_some_and(|p| self.active.contains(p))) {
                return self.apply(sub);
            }
            let Some(sub) = pending.pop_front() else { break };
            return Err(ReconstructionError::SubstitutionMismatch {
                team_id: self.team_id,
                event: Box::new(sub.clone()),
                active: self.active,
            });
        }
        Ok(())
    }
}

/// Lineup states of `team_id` for periods `1..=periods_played`.
///
/// `subs` are the team's substitutions in canonical order; `starters` holds
/// the starting five of every period.
pub fn replay_substitutions(
    team_id: TeamId,
    starters: &BTreeMap<u8, Lineup>,
    subs: &[&Event],
    clock: &GameClock,
    periods_played: u8,
) -> Result<Vec<LineupState>, ReconstructionError> {
    let mut states = Vec::new();

    for period in 1..=periods_played {
        let Some(&starting) = starters.get(&period) else {
            return Err(ReconstructionError::StartingFiveUnresolved {
                team_id,
                period,
                candidates: Vec::new(),
                subs_scanned: 0,
            });
        };

        let mut replay = Replay {
            team_id,
            period,
            active: starting,
            since: clock.period_start(period),
            states: Vec::new(),
        };

        let mut period_subs = subs.iter().copied().filter(|s| s.period == period).peekable();
        while let Some(first) = period_subs.next() {
            let mut group = vec![first];
            while let Some(next) = period_subs.next_if(|s| s.time == first.time) {
                group.push(next);
            }
            if group.len() > 1 {
                debug!(
                    "team {} P{}: {} substitutions at {}",
                    team_id,
                    period,
                    group.len(),
                    first.time
                );
            }
            replay.apply_instant(group)?;
        }

        replay.close(clock.period_end(period));
        states.append(&mut replay.states);
    }

    Ok(states)
}
