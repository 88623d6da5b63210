//! Snapshot tests for rendered stint tables using insta
//!
//! Keeps the human-readable stint rendering stable, including the handling
//! of chained same-instant substitutions and fractional boundaries.

use insta::assert_snapshot;

use super::reconstruct_game;
use crate::config::ReconstructionConfig;
use crate::models::{Event, GameId, GameTime, PlayerId, TeamId};

const PACERS: TeamId = TeamId(1610612754);

fn create_sample_log() -> Vec<Event> {
    let starters = [1627783, 1629614, 1626167, 1630169, 1628983];
    let mut events = vec![Event::action(1, 1, GameTime::ZERO, None, None, "period")];
    for (k, player) in starters.into_iter().enumerate() {
        let idx = k as u64 + 2;
        events.push(Event::action(idx, 1, GameTime::from_secs(8 + idx), Some(PACERS), Some(PlayerId(player)), "Shot"));
    }
    events.extend([
        Event::substitution(20, 1, GameTime::from_secs(300), PACERS, PlayerId(1629614), PlayerId(1630167)),
        Event::substitution(21, 1, GameTime::from_secs(300), PACERS, PlayerId(1630167), PlayerId(1631097)),
        Event::action(30, 1, GameTime::from_millis(500_500), Some(PACERS), Some(PlayerId(1631097)), "Shot"),
        Event::substitution(31, 1, GameTime::from_millis(610_250), PACERS, PlayerId(1626167), PlayerId(1629614)),
        Event::action(40, 1, GameTime::from_secs(720), None, None, "period"),
    ]);
    events
}

#[test]
fn test_stint_table_snapshot() {
    let mut config = ReconstructionConfig::nba();
    config.clock.regulation_periods = 1;

    let game = reconstruct_game(&GameId::from("0042400407"), &create_sample_log(), &config);
    let table = game.stints().map(ToString::to_string).collect::<Vec<_>>().join("\n");

    assert_snapshot!(table, @r"
    team 1610612754 P1 0.000s -> 300.000s (300.000s) [1626167-1627783-1628983-1629614-1630169] idx 1..20
    team 1610612754 P1 300.000s -> 610.250s (310.250s) [1626167-1627783-1628983-1630169-1631097] idx 20..31
    team 1610612754 P1 610.250s -> 720.000s (109.750s) [1627783-1628983-1629614-1630169-1631097] idx 31..40
    ");
}
