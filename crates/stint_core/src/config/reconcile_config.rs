use serde::{Deserialize, Serialize};

use crate::models::GameTime;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Largest gap, in seconds, between a stint boundary and the event it
    /// is mapped onto (default: 24.0, one shot clock)
    pub max_tolerance_secs: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self { max_tolerance_secs: 24.0 }
    }
}

impl ReconcileConfig {
    pub fn tolerance(&self) -> GameTime {
        GameTime::from_secs_f64(self.max_tolerance_secs).unwrap_or(GameTime::ZERO)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.max_tolerance_secs.is_finite() || self.max_tolerance_secs < 0.0 {
            return Err(format!(
                "max_tolerance_secs must be a non-negative number, got {}",
                self.max_tolerance_secs
            ));
        }
        Ok(())
    }
}
