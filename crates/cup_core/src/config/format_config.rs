//! Format driver and evaluator settings

use serde::{Deserialize, Serialize};

/// Disciplinary proxy applied to both sides of every group match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FairPlayConfig {
    /// Yellow cards per side are uniform in `0..=max_yellow_cards` (default: 2)
    pub max_yellow_cards: u32,
    /// Points per yellow card (default: 1)
    pub yellow_card_points: u32,
    /// Chance of a red card per side and match (default: 0.03)
    pub red_card_probability: f64,
    /// Points per red card (default: 4)
    pub red_card_points: u32,
}

impl Default for FairPlayConfig {
    fn default() -> Self {
        Self {
            max_yellow_cards: 2,
            yellow_card_points: 1,
            red_card_probability: 0.03,
            red_card_points: 4,
        }
    }
}

impl FairPlayConfig {
    /// No cards at all.
    pub fn disabled() -> Self {
        Self {
            max_yellow_cards: 0,
            yellow_card_points: 0,
            red_card_probability: 0.0,
            red_card_points: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupStageConfig {
    /// Number of groups, labelled from 'A' (default: 12)
    pub group_count: usize,
    /// Teams per group, also the number of pots (default: 4)
    pub group_size: usize,
    pub fair_play: FairPlayConfig,
}

impl Default for GroupStageConfig {
    fn default() -> Self {
        Self { group_count: 12, group_size: 4, fair_play: FairPlayConfig::default() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayoffConfig {
    /// Entrants taken from the top of the rating table (default: 32)
    pub bracket_size: usize,
}

impl Default for PlayoffConfig {
    fn default() -> Self {
        Self { bracket_size: 32 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwissConfig {
    /// Rounds played by every team (default: 8)
    pub rounds: usize,
}

impl Default for SwissConfig {
    fn default() -> Self {
        Self { rounds: 8 }
    }
}

/// Thresholds for classifying a group side as safe / out / live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IncentiveConfig {
    /// Points at which a team can no longer be caught (default: 6)
    pub safe_points: u32,
    /// Points needed to stay in contention (default: 4)
    pub qualify_points: u32,
}

impl Default for IncentiveConfig {
    fn default() -> Self {
        Self { safe_points: 6, qualify_points: 4 }
    }
}
