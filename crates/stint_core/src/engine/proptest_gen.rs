//! Property-based test generators for lineup reconstruction
//!
//! Generates whole games of valid substitutions so the partition and
//! identity properties can be checked against the full pipeline.

use proptest::prelude::*;
use proptest::sample::subsequence;

use crate::config::ReconstructionConfig;
use crate::models::{Event, GameClock, GameTime, PlayerId, TeamId, LINEUP_SIZE};

pub const TEAM: TeamId = TeamId(1610612754);
const SQUAD: u64 = 12;

/// Raw substitution choice: offset into the period in seconds, and which
/// active / bench slot to use. Resolved against the live lineup by
/// [`team_log`].
pub type SubChoice = (u64, usize, usize);

pub fn starters_strategy() -> impl Strategy<Value = Vec<u64>> {
    subsequence((1..=SQUAD).collect::<Vec<u64>>(), LINEUP_SIZE)
}

pub fn period_strategy(period_secs: u64) -> impl Strategy<Value = (Vec<u64>, Vec<SubChoice>)> {
    (
        starters_strategy(),
        prop::collection::vec((0..=period_secs, 0..LINEUP_SIZE, 0..16usize), 0..12),
    )
}

/// Regulation plus up to two overtimes.
pub fn game_strategy() -> impl Strategy<Value = Vec<(Vec<u64>, Vec<SubChoice>)>> {
    let clock = GameClock::new(&ReconstructionConfig::nba().clock);
    (4u8..=6).prop_flat_map(move |periods| {
        let per_period: Vec<_> = (1..=periods)
            .map(|p| period_strategy(clock.period_length(p).as_millis() / 1000))
            .collect();
        per_period
    })
}

/// Turn generated choices into a canonical event log for [`TEAM`]. Every
/// starter acts at the opening instant of the period, before any
/// substitution index.
pub fn team_log(periods: &[(Vec<u64>, Vec<SubChoice>)], clock: &GameClock) -> Vec<Event> {
    let mut events = Vec::new();

    for (p, (starters, choices)) in periods.iter().enumerate() {
        let period = p as u8 + 1;
        let start = clock.period_start(period);
        let base = u64::from(period) * 1000;

        let mut active: Vec<u64> = starters.clone();
        for (slot, &player) in starters.iter().enumerate() {
            events.push(Event::action(base + slot as u64, period, start, Some(TEAM), Some(PlayerId(player)), "Shot"));
        }

        let mut choices = choices.clone();
        choices.sort_by_key(|c| c.0);
        for (k, (offset, out_slot, in_slot)) in choices.into_iter().enumerate() {
            let bench: Vec<u64> = (1..=SQUAD).filter(|id| !active.contains(id)).collect();
            let out = active[out_slot % active.len()];
            let incoming = bench[in_slot % bench.len()];
            active.retain(|&id| id != out);
            active.push(incoming);

            let time = start + GameTime::from_secs(offset);
            events.push(Event::substitution(base + 100 + k as u64, period, time, TEAM, PlayerId(out), PlayerId(incoming)));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{reconstruct_game, team_states};
    use crate::models::{GameId, LineupHash};
    use crate::validate::validate_team_stints;

    proptest! {
        #[test]
        fn test_stints_partition_the_game(periods in game_strategy()) {
            let config = ReconstructionConfig::nba();
            let clock = GameClock::new(&config.clock);
            let events = team_log(&periods, &clock);

            let game = reconstruct_game(&GameId::from("0022400001"), &events, &config);
            let team = game.team(TEAM).unwrap();
            let stints = team.outcome.as_ref().unwrap();

            prop_assert_eq!(game.game_length, clock.game_length(periods.len() as u8));
            prop_assert_eq!(validate_team_stints(TEAM, stints, game.game_length), Ok(()));

            let total: u64 = stints.iter().map(|s| s.duration().as_millis()).sum();
            prop_assert_eq!(total, game.game_length.as_millis());
            prop_assert!(stints.iter().all(|s| s.duration_secs > 0.0));
        }

        #[test]
        fn test_adjacent_stints_in_a_period_differ(periods in game_strategy()) {
            let config = ReconstructionConfig::nba();
            let events = team_log(&periods, &GameClock::new(&config.clock));
            let game = reconstruct_game(&GameId::from("0022400001"), &events, &config);
            let stints = game.team(TEAM).unwrap().stints();

            for pair in stints.windows(2) {
                if pair[0].period == pair[1].period {
                    prop_assert_ne!(&pair[0].lineup_hash, &pair[1].lineup_hash);
                }
            }
        }

        #[test]
        fn test_single_substitution_swaps_one_player(periods in game_strategy()) {
            let config = ReconstructionConfig::nba();
            let clock = GameClock::new(&config.clock);
            let events = team_log(&periods, &clock);
            let states = team_states(&events, TEAM, &clock, periods.len() as u8).unwrap();
            let states: Vec<_> = states.into_iter().filter(|s| !s.is_degenerate()).collect();

            for pair in states.windows(2) {
                if pair[0].period != pair[1].period {
                    continue;
                }
                let at = pair[1].valid_from;
                let subs: Vec<&Event> = events
                    .iter()
                    .filter(|e| e.is_substitution() && e.period == pair[1].period && e.time == at)
                    .collect();
                if subs.len() != 1 {
                    continue;
                }
                let (out, incoming) = pair[0].lineup.changes_to(&pair[1].lineup);
                prop_assert_eq!(out, vec![subs[0].player_out_id.unwrap()]);
                prop_assert_eq!(incoming, vec![subs[0].player_in_id.unwrap()]);
            }
        }

        #[test]
        fn test_lineup_hash_ignores_assembly_order(
            shuffled in subsequence((1u64..=30).collect::<Vec<_>>(), LINEUP_SIZE).prop_shuffle()
        ) {
            let mut sorted = shuffled.clone();
            sorted.sort_unstable();
            let a: Vec<PlayerId> = shuffled.into_iter().map(PlayerId).collect();
            let b: Vec<PlayerId> = sorted.into_iter().map(PlayerId).collect();
            prop_assert_eq!(LineupHash::of(&a), LineupHash::of(&b));
        }
    }
}
