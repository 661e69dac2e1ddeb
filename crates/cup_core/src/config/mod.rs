//! # Simulation Configuration
//!
//! Every tuning constant of the match model and the format drivers lives here.
//! Sections deserialize with `#[serde(default)]`, so a YAML file only needs to
//! name the values it overrides:
//!
//! ```yaml
//! match_engine:
//!   base_goal_expectation: 1.3
//! swiss:
//!   rounds: 7
//! ```
//!
//! ```rust
//! use cup_core::config::SimConfig;
//!
//! let config = SimConfig::default();
//! let chalk = SimConfig::deterministic();
//! let (chalk_p, default_p) = (
//!     chalk.match_engine.favourite_win_probability,
//!     config.match_engine.favourite_win_probability,
//! );
//! assert!(chalk_p > default_p);
//! ```

mod engine_config;
mod format_config;

pub use engine_config::MatchEngineConfig;
pub use format_config::{
    FairPlayConfig, GroupStageConfig, IncentiveConfig, PlayoffConfig, SwissConfig,
};

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub match_engine: MatchEngineConfig,
    pub group_stage: GroupStageConfig,
    pub playoff: PlayoffConfig,
    pub swiss: SwissConfig,
    pub incentive: IncentiveConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::realistic()
    }
}

impl SimConfig {
    /// Default model: fixed 0.90 / 0.05 / 0.05 outcome split.
    pub fn realistic() -> Self {
        Self {
            match_engine: MatchEngineConfig::default(),
            group_stage: GroupStageConfig::default(),
            playoff: PlayoffConfig::default(),
            swiss: SwissConfig::default(),
            incentive: IncentiveConfig::default(),
        }
    }

    /// Higher-rated home side always wins regulation; no cards.
    pub fn deterministic() -> Self {
        let mut cfg = Self::realistic();
        cfg.match_engine.favourite_win_probability = 1.0;
        cfg.match_engine.underdog_win_probability = 0.0;
        cfg.match_engine.draw_probability = 0.0;
        cfg.group_stage.fair_play = FairPlayConfig::disabled();
        cfg
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: SimConfig = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let mut problems = self.match_engine.problems();

        if self.group_stage.group_count == 0 || self.group_stage.group_size < 2 {
            problems.push("group stage needs at least one group of two".to_string());
        }
        if !(0.0..=1.0).contains(&self.group_stage.fair_play.red_card_probability) {
            problems.push("red_card_probability must be within [0, 1]".to_string());
        }
        if self.playoff.bracket_size < 2 || !self.playoff.bracket_size.is_power_of_two() {
            problems.push(format!(
                "playoff bracket_size must be a power of two >= 2, got {}",
                self.playoff.bracket_size
            ));
        }
        if self.swiss.rounds == 0 {
            problems.push("swiss rounds must be at least 1".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SimError::InvalidConfig(problems.join("; ")))
        }
    }
}
