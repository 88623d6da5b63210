//! Provider feed → canonical events.

pub mod clock_parser;
pub mod normalizer;
pub mod roster;
pub mod rotation;

pub use clock_parser::parse_clock;
pub use normalizer::{normalize_records, NormalizedFeed, RawEvent};
pub use roster::{NameIndex, Roster, RosterEntry};
pub use rotation::{lineup_states_from_rotation, rotation_periods, RotationRecord, RotationUnit};
