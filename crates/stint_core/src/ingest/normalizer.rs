//! # Event Normalizer
//!
//! Raw play-by-play records → canonical [`Event`]s sorted by
//! `(period, time, action_index)`.
//!
//! ## Algorithm
//! 1. Deserialize each record on its own; a record that fails is rejected
//!    and the rest continue.
//! 2. Index `(team, playerName) → personId` over every parsed record.
//! 3. Convert clocks to game time, map the neutral team id to `None`, and
//!    resolve substitution participants (explicit ids first, then the
//!    description against the name index and roster).
//! 4. Drop repeated action indices, sort.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

use super::clock_parser::parse_clock;
use super::roster::{NameIndex, Roster};
use crate::config::ReconstructionConfig;
use crate::error::MalformedEventError;
use crate::models::{sort_events, supported_periods, Event, EventKind, GameClock, PlayerId, TeamId};

static SUB_DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*SUB:\s*(.+?)\s+FOR\s+(.+?)\s*$").expect("substitution pattern is valid")
});

/// One provider record as it arrives. Field names follow the play-by-play
/// feed, with snake_case spellings accepted as well.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    #[serde(default, alias = "actionNumber", deserialize_with = "lenient_u64")]
    pub action_index: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub period: Option<u64>,
    #[serde(default, alias = "clock_time")]
    pub clock: Option<String>,
    #[serde(default, alias = "actionType", alias = "event_type")]
    pub action_type: Option<String>,
    #[serde(default, alias = "teamId", deserialize_with = "lenient_u64")]
    pub team_id: Option<u64>,
    #[serde(default, alias = "personId", deserialize_with = "lenient_u64")]
    pub player_id: Option<u64>,
    #[serde(default, alias = "playerName")]
    pub player_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "playerOutId", deserialize_with = "lenient_u64")]
    pub player_out_id: Option<u64>,
    #[serde(default, alias = "playerInId", deserialize_with = "lenient_u64")]
    pub player_in_id: Option<u64>,
}

/// Ids arrive as numbers, numeric strings, `""` or `null` depending on the
/// feed revision. Zero means "nobody".
fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(
            n.as_u64()
                .ok_or_else(|| D::Error::custom(format!("expected unsigned integer, got {n}")))?,
        ),
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(
            s.trim()
                .parse::<u64>()
                .map_err(|_| D::Error::custom(format!("expected unsigned integer, got '{s}'")))?,
        ),
        Some(other) => {
            return Err(D::Error::custom(format!("expected unsigned integer, got {other}")))
        }
    };
    Ok(parsed)
}

/// Output of normalization: the usable events plus every rejected record.
#[derive(Debug, Clone, Default)]
pub struct NormalizedFeed {
    pub events: Vec<Event>,
    pub rejected: Vec<MalformedEventError>,
}

impl NormalizedFeed {
    /// Wrap events that are already canonical.
    pub fn from_events(mut events: Vec<Event>) -> Self {
        sort_events(&mut events);
        Self { events, rejected: Vec::new() }
    }

    /// Periods in which every team of the feed acted; see [`supported_periods`].
    pub fn periods_played(&self) -> u8 {
        let teams: BTreeSet<TeamId> = self.events.iter().filter_map(|e| e.team_id).collect();
        supported_periods(&self.events, &teams)
    }
}

/// Normalize one game's raw records.
pub fn normalize_records(
    records: &[Value],
    config: &ReconstructionConfig,
    roster: &Roster,
) -> NormalizedFeed {
    let clock = GameClock::new(&config.clock);
    let mut rejected = Vec::new();

    let mut parsed: Vec<(usize, RawEvent)> = Vec::with_capacity(records.len());
    for (record, value) in records.iter().enumerate() {
        match RawEvent::deserialize(value) {
            Ok(raw) => parsed.push((record, raw)),
            Err(err) => rejected.push(MalformedEventError {
                record,
                action_index: ["actionNumber", "action_index"]
                    .iter()
                    .find_map(|key| value.get(key).and_then(Value::as_u64)),
                reason: err.to_string(),
            }),
        }
    }

    let neutral = config.neutral_team_id;
    let mut names = NameIndex::default();
    for (_, raw) in &parsed {
        if let (Some(team), Some(player), Some(name)) = (raw.team_id, raw.player_id, &raw.player_name) {
            if team != neutral.0 && player != 0 {
                names.insert(TeamId(team), name, PlayerId(player));
            }
        }
    }

    let mut seen_actions = HashSet::new();
    let mut events = Vec::with_capacity(parsed.len());
    for (record, raw) in &parsed {
        match normalize_one(*record, raw, &clock, neutral, &names, roster) {
            Ok(event) if !seen_actions.insert(event.action_index) => {
                rejected.push(MalformedEventError {
                    record: *record,
                    action_index: Some(event.action_index),
                    reason: "duplicate action index".to_string(),
                });
            }
            Ok(event) => events.push(event),
            Err(err) => rejected.push(err),
        }
    }

    for err in &rejected {
        warn!("{}", err);
    }
    rejected.sort_by_key(|e| e.record);

    sort_events(&mut events);
    debug!(
        "normalized {} records: {} events, {} rejected",
        records.len(),
        events.len(),
        rejected.len()
    );

    NormalizedFeed { events, rejected }
}

fn normalize_one(
    record: usize,
    raw: &RawEvent,
    clock: &GameClock,
    neutral: TeamId,
    names: &NameIndex,
    roster: &Roster,
) -> Result<Event, MalformedEventError> {
    let malformed = |reason: String| MalformedEventError {
        record,
        action_index: raw.action_index,
        reason,
    };

    let action_index = raw.action_index.ok_or_else(|| malformed("missing action index".into()))?;
    let period = raw
        .period
        .and_then(|p| u8::try_from(p).ok())
        .filter(|&p| p > 0)
        .ok_or_else(|| malformed(format!("missing or invalid period {:?}", raw.period)))?;
    let clock_text = raw.clock.as_deref().ok_or_else(|| malformed("missing clock".into()))?;
    let remaining = parse_clock(clock_text).map_err(|e| malformed(e.to_string()))?;
    let time = clock.at_remaining(period, remaining).map_err(|e| malformed(e.to_string()))?;

    let team_id = raw.team_id.filter(|&t| t != 0 && t != neutral.0).map(TeamId);
    let action_type = raw.action_type.clone().unwrap_or_default();
    let is_substitution = action_type.trim().eq_ignore_ascii_case("substitution");

    if !is_substitution {
        return Ok(Event {
            action_index,
            period,
            time,
            kind: EventKind::Other,
            team_id,
            player_id: raw.player_id.filter(|&p| p != 0).map(PlayerId),
            player_out_id: None,
            player_in_id: None,
            action_type,
        });
    }

    let team = team_id.ok_or_else(|| malformed("substitution without a team".into()))?;
    let described = raw.description.as_deref().and_then(|text| {
        SUB_DESCRIPTION
            .captures(text)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
    });

    // personId on a play-by-play substitution row is the outgoing player
    let player_out_id = raw
        .player_out_id
        .or(raw.player_id)
        .filter(|&p| p != 0)
        .map(PlayerId)
        .or_else(|| {
            described.as_ref().and_then(|(_, outgoing)| names.resolve(roster, team, outgoing))
        })
        .ok_or_else(|| malformed("cannot resolve outgoing player".into()))?;

    let player_in_id = match raw.player_in_id.filter(|&p| p != 0) {
        Some(id) => PlayerId(id),
        None => {
            let (incoming, _) = described
                .as_ref()
                .ok_or_else(|| malformed("substitution without incoming player".into()))?;
            names
                .resolve(roster, team, incoming)
                .ok_or_else(|| malformed(format!("cannot resolve incoming player '{incoming}'")))?
        }
    };

    Ok(Event {
        action_index,
        period,
        time,
        kind: EventKind::Substitution,
        team_id: Some(team),
        player_id: Some(player_out_id),
        player_out_id: Some(player_out_id),
        player_in_id: Some(player_in_id),
        action_type,
    })
}
