//! Player name resolution for substitution descriptions.
//!
//! Play-by-play substitution rows carry the outgoing player's id but only
//! the incoming player's *name* (`"SUB: Nembhard FOR Siakam"`). Names are
//! resolved against, in order:
//! 1. names seen on other records of the same game, scoped to the team
//! 2. a caller-supplied [`Roster`]
//!
//! A name that maps to more than one id at a level is treated as unknown at
//! that level rather than guessed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{PlayerId, TeamId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub team_id: TeamId,
    pub player_id: PlayerId,
    /// Full display name, e.g. "Andrew Nembhard"
    pub name: String,
}

/// Roster fallback for names the feed itself never attaches an id to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    pub players: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(players: Vec<RosterEntry>) -> Self {
        Self { players }
    }

    /// Unique roster entry of `team_id` whose name contains `name`
    /// (case-insensitive).
    pub fn find(&self, team_id: TeamId, name: &str) -> Option<PlayerId> {
        let needle = normalize_name(name);
        if needle.is_empty() {
            return None;
        }
        let mut matches = self
            .players
            .iter()
            .filter(|entry| entry.team_id == team_id && normalize_name(&entry.name).contains(&needle))
            .map(|entry| entry.player_id);
        let first = matches.next()?;
        matches.all(|other| other == first).then_some(first)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameSlot {
    Unique(PlayerId),
    Ambiguous,
}

/// `(team, name) → id` built from the records of one game.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    names: HashMap<(TeamId, String), NameSlot>,
}

impl NameIndex {
    pub fn insert(&mut self, team_id: TeamId, name: &str, player_id: PlayerId) {
        let key = (team_id, normalize_name(name));
        if key.1.is_empty() {
            return;
        }
        self.names
            .entry(key)
            .and_modify(|slot| {
                if *slot != NameSlot::Unique(player_id) {
                    *slot = NameSlot::Ambiguous;
                }
            })
            .or_insert(NameSlot::Unique(player_id));
    }

    pub fn get(&self, team_id: TeamId, name: &str) -> Option<PlayerId> {
        match self.names.get(&(team_id, normalize_name(name)))? {
            NameSlot::Unique(id) => Some(*id),
            NameSlot::Ambiguous => None,
        }
    }

    /// Feed index first, roster second.
    pub fn resolve(&self, roster: &Roster, team_id: TeamId, name: &str) -> Option<PlayerId> {
        self.get(team_id, name).or_else(|| roster.find(team_id, name))
    }
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}
