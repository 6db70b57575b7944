//! Match format configuration.
//!
//! Defaults describe a T20 match. A JSON file named by
//! `CRICKET_MATCH_CONFIG_PATH` may override any field.

use serde::{Deserialize, Serialize};
use std::{env, fs};
use thiserror::Error;

pub const MATCH_CONFIG_PATH_ENV: &str = "CRICKET_MATCH_CONFIG_PATH";

pub const DEFAULT_OVERS: u32 = 20;
pub const DEFAULT_MAX_OVERS_PER_BOWLER: u32 = 4;
pub const DEFAULT_PLAYERS_PER_SIDE: usize = 11;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read match config from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse match config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid match config: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Overs per innings.
    pub overs: u32,
    /// Cap on overs any single bowler may bowl in an innings.
    pub max_overs_per_bowler: u32,
    /// Minimum roster size accepted at import.
    pub players_per_side: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            overs: DEFAULT_OVERS,
            max_overs_per_bowler: DEFAULT_MAX_OVERS_PER_BOWLER,
            players_per_side: DEFAULT_PLAYERS_PER_SIDE,
        }
    }
}

impl MatchConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by `CRICKET_MATCH_CONFIG_PATH`, or defaults
    /// when the variable is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let Ok(path) = env::var(MATCH_CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;

        let config = Self::from_json(&content)?;
        tracing::info!(
            path,
            overs = config.overs,
            max_overs_per_bowler = config.max_overs_per_bowler,
            "loaded match config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.overs == 0 {
            return Err(ConfigError::Validation("overs must be at least 1".to_string()));
        }
        if self.max_overs_per_bowler == 0 {
            return Err(ConfigError::Validation(
                "max_overs_per_bowler must be at least 1".to_string(),
            ));
        }
        if self.max_overs_per_bowler > self.overs {
            return Err(ConfigError::Validation(format!(
                "max_overs_per_bowler ({}) cannot exceed overs ({})",
                self.max_overs_per_bowler, self.overs
            )));
        }
        if self.players_per_side < 2 {
            return Err(ConfigError::Validation(format!(
                "players_per_side must be at least 2, got {}",
                self.players_per_side
            )));
        }
        if !self.bowlers_cover_innings(self.players_per_side) {
            return Err(ConfigError::Validation(format!(
                "{} bowlers capped at {} overs cannot bowl {} overs",
                self.players_per_side, self.max_overs_per_bowler, self.overs
            )));
        }
        Ok(())
    }

    /// Whether `bowlers` players, each under the per-bowler cap, can bowl
    /// every over of an innings.
    pub fn bowlers_cover_innings(&self, bowlers: usize) -> bool {
        (self.max_overs_per_bowler as u64).saturating_mul(bowlers as u64) >= self.overs as u64
    }
}
