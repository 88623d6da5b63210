use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::ids::{PlayerId, TeamId};
use super::time::GameTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Substitution,
    Other,
}

/// One normalized play-by-play record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    /// Provider action number, strictly increasing within a game
    pub action_index: u64,
    pub period: u8,
    /// Seconds into the game
    pub time: GameTime,
    pub kind: EventKind,
    /// `None` for neutral events (period start/end, timeouts without a team)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    /// Acting participant of a non-substitution event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_out_id: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_in_id: Option<PlayerId>,
    /// Raw provider type string, kept for diagnostics
    #[serde(default)]
    pub action_type: String,
}

impl Event {
    pub fn substitution(
        action_index: u64,
        period: u8,
        time: GameTime,
        team_id: TeamId,
        player_out_id: PlayerId,
        player_in_id: PlayerId,
    ) -> Self {
        Self {
            action_index,
            period,
            time,
            kind: EventKind::Substitution,
            team_id: Some(team_id),
            player_id: Some(player_out_id),
            player_out_id: Some(player_out_id),
            player_in_id: Some(player_in_id),
            action_type: "Substitution".to_string(),
        }
    }

    pub fn action(
        action_index: u64,
        period: u8,
        time: GameTime,
        team_id: Option<TeamId>,
        player_id: Option<PlayerId>,
        action_type: &str,
    ) -> Self {
        Self {
            action_index,
            period,
            time,
            kind: EventKind::Other,
            team_id,
            player_id,
            player_out_id: None,
            player_in_id: None,
            action_type: action_type.to_string(),
        }
    }

    /// Canonical ordering key: `(period, time, action_index)`.
    pub fn sort_key(&self) -> (u8, GameTime, u64) {
        (self.period, self.time, self.action_index)
    }

    pub fn is_substitution(&self) -> bool {
        self.kind == EventKind::Substitution
    }

    pub fn belongs_to(&self, team_id: TeamId) -> bool {
        self.team_id == Some(team_id)
    }
}

pub fn sort_events(events: &mut [Event]) {
    events.sort_by_key(Event::sort_key);
}

/// Periods the log supports: the longest run `1..=p` in which every one of
/// `teams` has at least one event. Neutral records and stray rows past that
/// run never lengthen the game.
pub fn supported_periods(events: &[Event], teams: &BTreeSet<TeamId>) -> u8 {
    if teams.is_empty() {
        return 0;
    }
    let mut seen: BTreeMap<u8, BTreeSet<TeamId>> = BTreeMap::new();
    for event in events {
        if let Some(team) = event.team_id.filter(|t| teams.contains(t)) {
            seen.entry(event.period).or_default().insert(team);
        }
    }

    let mut periods = 0u8;
    while periods < u8::MAX && seen.get(&(periods + 1)).is_some_and(|s| s.len() == teams.len()) {
        periods += 1;
    }
    periods
}

/// Substitutions of one team, chronological.
pub fn team_substitutions(events: &[Event], team_id: TeamId) -> Vec<&Event> {
    events.iter().filter(|e| e.is_substitution() && e.belongs_to(team_id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: TeamId = TeamId(1610612754);
    const AWAY: TeamId = TeamId(1610612760);

    fn touch(idx: u64, period: u8, team: Option<TeamId>) -> Event {
        Event::action(idx, period, GameTime::ZERO, team, Some(PlayerId(idx)), "Shot")
    }

    #[test]
    fn test_supported_periods_need_every_team() {
        let teams = BTreeSet::from([HOME, AWAY]);
        let events = vec![
            touch(1, 1, Some(HOME)),
            touch(2, 1, Some(AWAY)),
            touch(3, 2, Some(HOME)),
            touch(4, 2, Some(AWAY)),
            // only one side shows up in the third period
            touch(5, 3, Some(HOME)),
            // neutral marker far past the end
            touch(6, 9, None),
        ];
        assert_eq!(supported_periods(&events, &teams), 2);
        assert_eq!(supported_periods(&events, &BTreeSet::from([HOME])), 3);
        assert_eq!(supported_periods(&events, &BTreeSet::new()), 0);
    }

    #[test]
    fn test_gap_ends_the_supported_run() {
        let teams = BTreeSet::from([HOME]);
        let events = vec![touch(1, 1, Some(HOME)), touch(2, 3, Some(HOME))];
        assert_eq!(supported_periods(&events, &teams), 1);
    }
}
