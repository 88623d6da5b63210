//! Output checks for reconstructed stints.
//!
//! A team's stints must tile `[0, game_length)` exactly, each holding five
//! distinct ascending ids under their canonical hash. Across a game no
//! lineup hash may belong to two teams.

use std::collections::HashMap;

use crate::engine::GameReconstruction;
use crate::error::ValidationError;
use crate::models::{GameTime, LineupHash, Stint, TeamId};

pub type ValidationResult<T> = Result<T, ValidationError>;

pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

impl Validate for Stint {
    fn validate(&self) -> ValidationResult<()> {
        if self.end <= self.start {
            return Err(ValidationError::ZeroDuration { team_id: self.team_id, at: self.start });
        }
        if !self.players.windows(2).all(|w| w[0] < w[1]) {
            return Err(ValidationError::BadLineup { team_id: self.team_id, at: self.start });
        }
        if self.lineup_hash != LineupHash::of(&self.players) {
            return Err(ValidationError::HashMismatch {
                team_id: self.team_id,
                hash: self.lineup_hash.to_string(),
            });
        }
        Ok(())
    }
}

/// Check one team's stints against the partition of `[0, game_length)`.
pub fn validate_team_stints(team_id: TeamId, stints: &[Stint], game_length: GameTime) -> ValidationResult<()> {
    let Some(first) = stints.first() else {
        if game_length == GameTime::ZERO {
            return Ok(());
        }
        return Err(ValidationError::EarlyEnd { team_id, at: GameTime::ZERO, game_end: game_length });
    };

    if first.start != GameTime::ZERO {
        return Err(ValidationError::LateStart { team_id, at: first.start });
    }
    for stint in stints {
        stint.validate()?;
    }
    for pair in stints.windows(2) {
        if pair[0].end != pair[1].start {
            return Err(ValidationError::Discontinuity {
                team_id,
                previous_end: pair[0].end,
                next_start: pair[1].start,
            });
        }
    }

    let last_end = stints.last().map_or(GameTime::ZERO, |s| s.end);
    if last_end != game_length {
        return Err(ValidationError::EarlyEnd { team_id, at: last_end, game_end: game_length });
    }
    Ok(())
}

/// Check every successful team of a game, then lineup identity across teams.
/// Failed teams have no stints and are skipped.
pub fn validate_game(game: &GameReconstruction) -> ValidationResult<()> {
    let mut owners: HashMap<&LineupHash, TeamId> = HashMap::new();

    for team in game.teams.iter().filter(|t| t.is_ok()) {
        validate_team_stints(team.team_id, team.stints(), game.game_length)?;

        for stint in team.stints() {
            let owner = *owners.entry(&stint.lineup_hash).or_insert(team.team_id);
            if owner != team.team_id {
                return Err(ValidationError::SharedAcrossTeams {
                    hash: stint.lineup_hash.to_string(),
                    first: owner,
                    second: team.team_id,
                });
            }
        }
    }
    Ok(())
}
