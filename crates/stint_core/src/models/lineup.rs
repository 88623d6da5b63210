//! Five-man units.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::ids::{PlayerId, TeamId};
use super::stint::LineupHash;
use super::time::GameTime;

pub const LINEUP_SIZE: usize = 5;

/// Five distinct players, always held in ascending id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<PlayerId>", into = "Vec<PlayerId>")]
pub struct Lineup([PlayerId; LINEUP_SIZE]);

impl Lineup {
    /// Returns the number of distinct ids when it is not exactly five.
    pub fn new(players: impl IntoIterator<Item = PlayerId>) -> Result<Self, usize> {
        let distinct: BTreeSet<PlayerId> = players.into_iter().collect();
        if distinct.len() != LINEUP_SIZE {
            return Err(distinct.len());
        }
        let mut sorted = [PlayerId(0); LINEUP_SIZE];
        for (slot, id) in sorted.iter_mut().zip(distinct) {
            *slot = id;
        }
        Ok(Self(sorted))
    }

    pub fn players(&self) -> &[PlayerId; LINEUP_SIZE] {
        &self.0
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.0.binary_search(&player).is_ok()
    }

    /// Swap `out` for `incoming`. On failure returns the size the active set
    /// would have had after the swap.
    pub fn substitute(&self, out: PlayerId, incoming: PlayerId) -> Result<Lineup, usize> {
        let mut next: BTreeSet<PlayerId> = self.0.iter().copied().collect();
        let removed = next.remove(&out);
        let added = next.insert(incoming);
        if !removed || !added {
            return Err(next.len());
        }
        Lineup::new(next)
    }

    pub fn hash(&self) -> LineupHash {
        LineupHash::of(&self.0)
    }

    /// Players that left and players that entered going from `self` to `next`.
    pub fn changes_to(&self, next: &Lineup) -> (Vec<PlayerId>, Vec<PlayerId>) {
        let left = self.0.iter().copied().filter(|p| !next.contains(*p)).collect();
        let entered = next.0.iter().copied().filter(|p| !self.contains(*p)).collect();
        (left, entered)
    }
}

impl TryFrom<Vec<PlayerId>> for Lineup {
    type Error = String;

    fn try_from(players: Vec<PlayerId>) -> Result<Self, Self::Error> {
        let count = players.len();
        Lineup::new(players).map_err(|distinct| {
            format!("lineup needs {LINEUP_SIZE} distinct players, got {distinct} of {count}")
        })
    }
}

impl From<Lineup> for Vec<PlayerId> {
    fn from(lineup: Lineup) -> Self {
        lineup.0.to_vec()
    }
}

impl fmt::Display for Lineup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", self.hash())
    }
}

/// A lineup together with the interval it was on court. Produced and
/// consumed inside one reconstruction, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupState {
    pub team_id: TeamId,
    pub period: u8,
    pub lineup: Lineup,
    pub valid_from: GameTime,
    pub valid_to: GameTime,
}

impl LineupState {
    pub fn duration(&self) -> GameTime {
        self.valid_to.saturating_sub(self.valid_from)
    }

    pub fn is_degenerate(&self) -> bool {
        self.valid_to <= self.valid_from
    }
}
