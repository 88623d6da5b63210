//! Lineup reconstruction pipeline, leaves first:
//! [`starters`] → [`state_machine`] → [`stint_builder`] → [`reconciler`],
//! driven per team and per game by [`game`].

pub mod game;
pub mod reconciler;
pub mod starters;
pub mod state_machine;
pub mod stint_builder;

#[cfg(test)]
pub mod proptest_gen;

#[cfg(test)]
mod snapshot_tests;

pub use game::{
    reconstruct_feed, reconstruct_game, reconstruct_game_from_rotation, reconstruct_game_records,
    reconstruct_games, reconstruct_team, team_states, GameLog, GameReconstruction, TeamReconstruction,
};
pub use reconciler::{reconcile_stints, EventTimeline};
pub use starters::resolve_starting_five;
pub use state_machine::replay_substitutions;
pub use stint_builder::build_stints;
