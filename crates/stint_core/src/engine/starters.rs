//! # Starting-Five Resolver
//!
//! Who was on court for a team when a period began.
//!
//! ## Algorithm
//! 1. Collect distinct participants of the team's non-substitution events in
//!    the period, up to its first substitution
//! 2. Exactly five → done; more than five → unresolved
//! 3. Fewer → walk the period's substitutions in order. An outgoing player
//!    who is neither a candidate nor entered earlier in the period must have
//!    started. Stop at five.
//!
//! The walk visits each substitution once, so it always terminates.

use tracing::debug;

use crate::error::ReconstructionError;
use crate::models::{Event, Lineup, PlayerId, TeamId, LINEUP_SIZE};

/// `events` must be in canonical order (see [`crate::models::sort_events`]).
pub fn resolve_starting_five(
    events: &[Event],
    team_id: TeamId,
    period: u8,
) -> Result<Lineup, ReconstructionError> {
    let period_events = events.iter().filter(|e| e.period == period && e.belongs_to(team_id));

    let mut candidates: Vec<PlayerId> = Vec::with_capacity(LINEUP_SIZE);
    let mut subs = Vec::new();
    for event in period_events {
        if event.is_substitution() {
            subs.push(event);
        } else if subs.is_empty() {
            if let Some(player) = event.player_id {
                if !candidates.contains(&player) {
                    candidates.push(player);
                }
            }
        }
    }

    let unresolved = |candidates: Vec<PlayerId>, subs_scanned: usize| {
        ReconstructionError::StartingFiveUnresolved { team_id, period, candidates, subs_scanned }
    };

    if candidates.len() > LINEUP_SIZE {
        return Err(unresolved(candidates, 0));
    }

    let mut entered: Vec<PlayerId> = Vec::new();
    let mut scanned = 0;
    for sub in &subs {
        if candidates.len() == LINEUP_SIZE {
            break;
        }
        scanned += 1;
        if let Some(out) = sub.player_out_id {
            if !candidates.contains(&out) && !entered.contains(&out) {
                debug!(
                    "team {} P{}: {} implied starter by substitution {}",
                    team_id, period, out, sub.action_index
                );
                candidates.push(out);
            }
        }
        if let Some(incoming) = sub.player_in_id {
            entered.push(incoming);
        }
    }

    if candidates.len() != LINEUP_SIZE {
        return Err(unresolved(candidates, scanned));
    }
    Lineup::new(candidates.iter().copied()).map_err(|_| unresolved(candidates, scanned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameTime;

    const TEAM: TeamId = TeamId(1610612760);
    const OTHER: TeamId = TeamId(1610612754);

    fn act(idx: u64, period: u8, secs: u64, team: TeamId, player: u64) -> Event {
        Event::action(idx, period, GameTime::from_secs(secs), Some(team), Some(PlayerId(player)), "Shot")
    }

    fn sub(idx: u64, period: u8, secs: u64, out: u64, incoming: u64) -> Event {
        Event::substitution(idx, period, GameTime::from_secs(secs), TEAM, PlayerId(out), PlayerId(incoming))
    }

    fn ids(raw: &[u64]) -> Lineup {
        Lineup::new(raw.iter().copied().map(PlayerId)).unwrap()
    }

    #[test]
    fn test_five_participants_before_first_sub() {
        let events = vec![
            act(1, 1, 10, TEAM, 1),
            act(2, 1, 20, TEAM, 2),
            act(3, 1, 25, OTHER, 99),
            act(4, 1, 30, TEAM, 3),
            act(5, 1, 40, TEAM, 4),
            act(6, 1, 50, TEAM, 1),
            act(7, 1, 60, TEAM, 5),
            sub(8, 1, 100, 5, 6),
            act(9, 1, 110, TEAM, 6),
        ];
        assert_eq!(resolve_starting_five(&events, TEAM, 1).unwrap(), ids(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_quiet_starter_implied_by_substitution() {
        let events = vec![
            act(1, 2, 730, TEAM, 1),
            act(2, 2, 740, TEAM, 2),
            act(3, 2, 750, TEAM, 3),
            sub(4, 2, 800, 6, 7),
            sub(5, 2, 850, 7, 8),
            sub(6, 2, 900, 4, 9),
        ];
        // 7 entered at 800; leaving at 850 says nothing about the start
        assert_eq!(resolve_starting_five(&events, TEAM, 2).unwrap(), ids(&[1, 2, 3, 4, 6]));
    }

    #[test]
    fn test_exhausted_walk_is_unresolved() {
        let events = vec![act(1, 1, 10, TEAM, 1), act(2, 1, 20, TEAM, 2), sub(3, 1, 30, 3, 4)];
        let err = resolve_starting_five(&events, TEAM, 1).unwrap_err();
        assert_eq!(
            err,
            ReconstructionError::StartingFiveUnresolved {
                team_id: TEAM,
                period: 1,
                candidates: vec![PlayerId(1), PlayerId(2), PlayerId(3)],
                subs_scanned: 1,
            }
        );
    }

    #[test]
    fn test_too_many_participants_is_unresolved() {
        let events: Vec<Event> = (1..=6).map(|p| act(p, 3, 1500 + p, TEAM, p)).collect();
        assert!(matches!(
            resolve_starting_five(&events, TEAM, 3),
            Err(ReconstructionError::StartingFiveUnresolved { period: 3, .. })
        ));
    }
}
