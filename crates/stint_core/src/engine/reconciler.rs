//! # Timestamp Reconciler
//!
//! Maps stint boundaries onto action indices of the full game log, so a
//! downstream consumer can attribute each event to exactly one stint per
//! team.
//!
//! - nearest event by absolute time difference
//! - exact ties go to the earlier action index
//! - boundaries are half-open: `[start_index, end_index)`, so a shared
//!   boundary event belongs to the later stint
//! - nothing within tolerance: indices stay `None`, stint is `Unresolved`

use tracing::warn;

use crate::error::NoNearbyEvent;
use crate::models::{Event, GameTime, ReconcileStatus, Stint};

/// All events of a game (both teams and neutral) ordered by
/// `(time, action_index)`.
#[derive(Debug, Clone, Default)]
pub struct EventTimeline {
    entries: Vec<(GameTime, u64)>,
}

impl EventTimeline {
    pub fn new(events: &[Event]) -> Self {
        let mut entries: Vec<(GameTime, u64)> = events.iter().map(|e| (e.time, e.action_index)).collect();
        entries.sort_unstable();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Action index of the event nearest `at`, if one lies within `tolerance`.
    pub fn nearest(&self, at: GameTime, tolerance: GameTime) -> Option<u64> {
        let split = self.entries.partition_point(|&(time, _)| time < at);

        // first entry of the latest time strictly before `at`
        let before = split.checked_sub(1).map(|last| {
            let time = self.entries[last].0;
            self.entries[self.entries.partition_point(|&(t, _)| t < time)]
        });
        let after = self.entries.get(split).copied();

        let (time, index) = match (before, after) {
            (Some(b), Some(a)) => {
                let (db, da) = (at.abs_diff(b.0), at.abs_diff(a.0));
                if db < da || (db == da && b.1 < a.1) {
                    b
                } else {
                    a
                }
            }
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => return None,
        };

        (at.abs_diff(time) <= tolerance).then_some(index)
    }
}

/// Fill in action indices and reconcile status. Returns one failure per
/// distinct unmatched boundary.
pub fn reconcile_stints(
    stints: &mut [Stint],
    timeline: &EventTimeline,
    tolerance: GameTime,
) -> Vec<NoNearbyEvent> {
    let mut failures: Vec<NoNearbyEvent> = Vec::new();

    for stint in stints.iter_mut() {
        stint.start_index = timeline.nearest(stint.start, tolerance);
        stint.end_index = timeline.nearest(stint.end, tolerance);

        let mut resolved = true;
        for (at, index) in [(stint.start, stint.start_index), (stint.end, stint.end_index)] {
            if index.is_some() {
                continue;
            }
            resolved = false;
            if failures.iter().any(|f| f.team_id == stint.team_id && f.at == at) {
                continue;
            }
            let failure = NoNearbyEvent { team_id: stint.team_id, at, tolerance };
            warn!("{}", failure);
            failures.push(failure);
        }

        stint.reconcile = if resolved {
            ReconcileStatus::Resolved
        } else {
            ReconcileStatus::Unresolved
        };
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameId, LineupHash, PlayerId, TeamId};

    const TEAM: TeamId = TeamId(1610612754);

    fn at(idx: u64, millis: u64) -> Event {
        Event::action(idx, 1, GameTime::from_millis(millis), Some(TEAM), None, "Shot")
    }

    fn stint(start: u64, end: u64) -> Stint {
        let players = [PlayerId(1), PlayerId(2), PlayerId(3), PlayerId(4), PlayerId(5)];
        Stint {
            game_id: GameId::from("0042400407"),
            team_id: TEAM,
            period: 1,
            players,
            lineup_hash: LineupHash::of(&players),
            start: GameTime::from_secs(start),
            end: GameTime::from_secs(end),
            duration_secs: (end - start) as f64,
            start_index: None,
            end_index: None,
            reconcile: ReconcileStatus::Pending,
        }
    }

    #[test]
    fn test_nearest_by_time_difference() {
        let timeline = EventTimeline::new(&[at(1, 0), at(4, 290_000), at(7, 302_000)]);
        let tolerance = GameTime::from_secs(24);
        assert_eq!(timeline.nearest(GameTime::from_secs(300), tolerance), Some(7));
        assert_eq!(timeline.nearest(GameTime::from_secs(295), tolerance), Some(4));
        assert_eq!(timeline.nearest(GameTime::from_secs(200), tolerance), None);
    }

    #[test]
    fn test_ties_prefer_earlier_index() {
        let equidistant = EventTimeline::new(&[at(9, 298_000), at(10, 302_000)]);
        assert_eq!(equidistant.nearest(GameTime::from_secs(300), GameTime::from_secs(24)), Some(9));

        // same instant: several events, lowest index wins
        let same_time = EventTimeline::new(&[at(12, 300_000), at(11, 300_000), at(13, 300_000)]);
        assert_eq!(same_time.nearest(GameTime::from_secs(300), GameTime::ZERO), Some(11));
        assert_eq!(same_time.nearest(GameTime::from_secs(301), GameTime::from_secs(24)), Some(11));
    }

    #[test]
    fn test_adjacent_stints_share_boundary_index() {
        let timeline = EventTimeline::new(&[at(1, 0), at(20, 300_000), at(21, 300_000), at(50, 720_000)]);
        let mut stints = vec![stint(0, 300), stint(300, 720)];
        let failures = reconcile_stints(&mut stints, &timeline, GameTime::from_secs(24));

        assert!(failures.is_empty());
        assert_eq!((stints[0].start_index, stints[0].end_index), (Some(1), Some(20)));
        assert_eq!((stints[1].start_index, stints[1].end_index), (Some(20), Some(50)));
        assert!(!stints[0].claims(20));
        assert!(stints[1].claims(20));
        assert!(stints.iter().all(|s| s.reconcile == ReconcileStatus::Resolved));
    }

    #[test]
    fn test_unmatched_boundary_flags_stint() {
        let timeline = EventTimeline::new(&[at(1, 0), at(50, 720_000)]);
        let mut stints = vec![stint(0, 300), stint(300, 720)];
        let failures = reconcile_stints(&mut stints, &timeline, GameTime::from_secs(24));

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].at, GameTime::from_secs(300));
        assert_eq!(stints[0].start_index, Some(1));
        assert_eq!(stints[0].end_index, None);
        assert!(stints.iter().all(|s| s.reconcile == ReconcileStatus::Unresolved));
    }
}
