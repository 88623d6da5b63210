pub mod event;
pub mod ids;
pub mod lineup;
pub mod stint;
pub mod time;

pub use event::{sort_events, supported_periods, team_substitutions, Event, EventKind};
pub use ids::{GameId, PlayerId, TeamId};
pub use lineup::{Lineup, LineupState, LINEUP_SIZE};
pub use stint::{LineupHash, ReconcileStatus, Stint, StintKey};
pub use time::{GameClock, GameTime};
