//! Period structure of a competition.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Number of regulation periods (default: 4)
    pub regulation_periods: u8,
    /// Length of a regulation period in seconds (default: 720)
    pub regulation_period_secs: u32,
    /// Length of each overtime period in seconds (default: 300)
    pub overtime_period_secs: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::nba()
    }
}

impl ClockConfig {
    pub fn nba() -> Self {
        Self { regulation_periods: 4, regulation_period_secs: 720, overtime_period_secs: 300 }
    }

    pub fn ten_minute_quarters() -> Self {
        Self { regulation_periods: 4, regulation_period_secs: 600, overtime_period_secs: 300 }
    }

    pub fn ncaa_men() -> Self {
        Self { regulation_periods: 2, regulation_period_secs: 1200, overtime_period_secs: 300 }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.regulation_periods == 0 {
            return Err("regulation_periods must be > 0".into());
        }
        if self.regulation_period_secs == 0 {
            return Err("regulation_period_secs must be > 0".into());
        }
        if self.overtime_period_secs == 0 {
            return Err("overtime_period_secs must be > 0".into());
        }
        Ok(())
    }
}
