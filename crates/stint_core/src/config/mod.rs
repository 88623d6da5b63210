//! # Reconstruction Configuration
//!
//! Every constant the engine depends on lives here and is passed in by the
//! caller: period lengths, the neutral team id, and the reconciliation
//! tolerance. Nothing is read from global state.
//!
//! ```rust
//! use stint_core::config::ReconstructionConfig;
//!
//! let nba = ReconstructionConfig::default();
//! let fiba = ReconstructionConfig::fiba();
//! assert!(fiba.clock.regulation_period_secs < nba.clock.regulation_period_secs);
//! ```

mod clock_config;
mod reconcile_config;

pub use clock_config::ClockConfig;
pub use reconcile_config::ReconcileConfig;

use serde::{Deserialize, Serialize};
use std::{env, fs};

use crate::error::ConfigError;
use crate::models::TeamId;

/// Env var naming a JSON file that overrides the default configuration.
pub const CONFIG_PATH_ENV: &str = "STINT_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionConfig {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    /// Team id the provider puts on events that belong to neither team
    #[serde(default)]
    pub neutral_team_id: TeamId,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self::nba()
    }
}

impl ReconstructionConfig {
    /// Four 12-minute quarters, 5-minute overtime
    pub fn nba() -> Self {
        Self {
            clock: ClockConfig::nba(),
            reconcile: ReconcileConfig::default(),
            neutral_team_id: TeamId(0),
        }
    }

    /// Four 10-minute quarters, 5-minute overtime
    pub fn wnba() -> Self {
        Self { clock: ClockConfig::ten_minute_quarters(), ..Self::nba() }
    }

    /// Same period structure as the WNBA
    pub fn fiba() -> Self {
        Self { clock: ClockConfig::ten_minute_quarters(), ..Self::nba() }
    }

    /// Two 20-minute halves, 5-minute overtime
    pub fn ncaa_men() -> Self {
        Self { clock: ClockConfig::ncaa_men(), ..Self::nba() }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clock.validate().map_err(ConfigError::Invalid)?;
        self.reconcile.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Load the file named by [`CONFIG_PATH_ENV`]; defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_string(), source })?;
        Self::from_json(&content)
    }
}
