//! Game time and the period clock.
//!
//! Every instant in the crate is a [`GameTime`]: seconds into the game,
//! counted from the opening tip and running straight through overtime.
//! It is stored as integer milliseconds so stint durations add up exactly,
//! and it serializes as floating seconds.
//!
//! [`GameClock`] is the only place that knows how long a period is. Both
//! "elapsed in period" and "remaining in period" clocks go through the same
//! period-start formula, for regulation and overtime alike.

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;

use crate::config::ClockConfig;
use crate::error::ClockError;

/// Seconds into the game, millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GameTime {
    millis: u64,
}

impl GameTime {
    pub const ZERO: GameTime = GameTime { millis: 0 };

    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self { millis: secs * 1000 }
    }

    /// Rounds to the nearest millisecond. Negative, NaN and infinite inputs
    /// have no meaning on a game clock and yield `None`.
    pub fn from_secs_f64(secs: f64) -> Option<Self> {
        if !secs.is_finite() || secs < 0.0 {
            return None;
        }
        Some(Self { millis: (secs * 1000.0).round() as u64 })
    }

    pub const fn as_millis(self) -> u64 {
        self.millis
    }

    pub fn as_secs_f64(self) -> f64 {
        self.millis as f64 / 1000.0
    }

    pub fn saturating_sub(self, other: GameTime) -> GameTime {
        GameTime { millis: self.millis.saturating_sub(other.millis) }
    }

    pub fn abs_diff(self, other: GameTime) -> GameTime {
        GameTime { millis: self.millis.abs_diff(other.millis) }
    }
}

impl Add for GameTime {
    type Output = GameTime;

    fn add(self, rhs: GameTime) -> GameTime {
        GameTime { millis: self.millis + rhs.millis }
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:03}s", self.millis / 1000, self.millis % 1000)
    }
}

impl Serialize for GameTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

impl<'de> Deserialize<'de> for GameTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        GameTime::from_secs_f64(secs).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid game time: {secs} seconds"))
        })
    }
}

impl JsonSchema for GameTime {
    fn schema_name() -> String {
        "GameTime".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <f64 as JsonSchema>::json_schema(gen)
    }
}

/// Period-length arithmetic for one competition format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameClock {
    regulation_periods: u8,
    regulation_period: GameTime,
    overtime_period: GameTime,
}

impl GameClock {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            regulation_periods: config.regulation_periods,
            regulation_period: GameTime::from_secs(u64::from(config.regulation_period_secs)),
            overtime_period: GameTime::from_secs(u64::from(config.overtime_period_secs)),
        }
    }

    pub fn regulation_periods(&self) -> u8 {
        self.regulation_periods
    }

    pub fn is_overtime(&self, period: u8) -> bool {
        period > self.regulation_periods
    }

    pub fn period_length(&self, period: u8) -> GameTime {
        if self.is_overtime(period) {
            self.overtime_period
        } else {
            self.regulation_period
        }
    }

    /// Game time at which `period` (1-based) begins. Period 0 does not
    /// exist; it is treated as the opening instant.
    pub fn period_start(&self, period: u8) -> GameTime {
        let completed = u64::from(period.saturating_sub(1));
        let regulation = u64::from(self.regulation_periods);
        let millis = if completed <= regulation {
            completed * self.regulation_period.as_millis()
        } else {
            regulation * self.regulation_period.as_millis()
                + (completed - regulation) * self.overtime_period.as_millis()
        };
        GameTime::from_millis(millis)
    }

    pub fn period_end(&self, period: u8) -> GameTime {
        self.period_start(period) + self.period_length(period)
    }

    /// Total length of a game that went `periods_played` periods.
    pub fn game_length(&self, periods_played: u8) -> GameTime {
        if periods_played == 0 {
            return GameTime::ZERO;
        }
        self.period_end(periods_played)
    }

    /// `(period, seconds elapsed in period)` to seconds into game.
    pub fn at_elapsed(&self, period: u8, elapsed: GameTime) -> Result<GameTime, ClockError> {
        if period == 0 {
            return Err(ClockError::InvalidPeriod(period));
        }
        let length = self.period_length(period);
        if elapsed > length {
            return Err(ClockError::OutOfRange { period, value: elapsed, length });
        }
        Ok(self.period_start(period) + elapsed)
    }

    /// `(period, time remaining on the game clock)` to seconds into game.
    pub fn at_remaining(&self, period: u8, remaining: GameTime) -> Result<GameTime, ClockError> {
        if period == 0 {
            return Err(ClockError::InvalidPeriod(period));
        }
        let length = self.period_length(period);
        if remaining > length {
            return Err(ClockError::OutOfRange { period, value: remaining, length });
        }
        self.at_elapsed(period, length.saturating_sub(remaining))
    }

    /// Period containing `time`, treating each period as half-open
    /// `[start, end)`. The final instant of the game belongs to the last period.
    pub fn period_at(&self, time: GameTime, periods_played: u8) -> Option<u8> {
        (1..=periods_played).find(|&period| {
            let (start, end) = (self.period_start(period), self.period_end(period));
            time >= start && (time < end || (period == periods_played && time == end))
        })
    }
}
