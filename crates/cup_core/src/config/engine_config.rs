//! Match engine tuning

use serde::{Deserialize, Serialize};

/// Outcome model parameters for [`PoissonMatchEngine`](crate::engine::PoissonMatchEngine).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchEngineConfig {
    // === Outcome category (step function on rating comparison) ===
    /// Win probability of the home side when it is strictly higher rated (default: 0.90)
    pub favourite_win_probability: f64,
    /// Win probability of the home side otherwise (default: 0.05)
    pub underdog_win_probability: f64,
    /// Fixed draw probability (default: 0.05)
    pub draw_probability: f64,

    // === Goal means ===
    /// Base goal expectation per side (default: 1.1)
    pub base_goal_expectation: f64,
    /// Rating gap that adds 100% to the favourite's mean (default: 1200)
    pub rating_scale: f64,
    /// Lower bound for either mean (default: 0.2)
    pub min_goal_mean: f64,

    // === Resampling / knockout ===
    /// Poisson draws before nudging the score (default: 50)
    pub max_resample_attempts: u32,
    /// Extra-time goal mean as a fraction of the regulation mean (default: 0.4)
    pub extra_time_factor: f64,
}

impl Default for MatchEngineConfig {
    fn default() -> Self {
        Self {
            favourite_win_probability: 0.90,
            underdog_win_probability: 0.05,
            draw_probability: 0.05,

            base_goal_expectation: 1.1,
            rating_scale: 1200.0,
            min_goal_mean: 0.2,

            max_resample_attempts: 50,
            extra_time_factor: 0.4,
        }
    }
}

impl MatchEngineConfig {
    pub(crate) fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (name, p) in [
            ("favourite_win_probability", self.favourite_win_probability),
            ("underdog_win_probability", self.underdog_win_probability),
            ("draw_probability", self.draw_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                problems.push(format!("{name} must be within [0, 1], got {p}"));
            }
        }
        if self.favourite_win_probability + self.draw_probability > 1.0 {
            problems.push("favourite_win_probability + draw_probability exceeds 1".to_string());
        }
        if self.underdog_win_probability + self.draw_probability > 1.0 {
            problems.push("underdog_win_probability + draw_probability exceeds 1".to_string());
        }
        if !(self.base_goal_expectation > 0.0) {
            problems.push("base_goal_expectation must be positive".to_string());
        }
        if !(self.rating_scale > 0.0) {
            problems.push("rating_scale must be positive".to_string());
        }
        if !(self.min_goal_mean > 0.0) {
            problems.push("min_goal_mean must be positive".to_string());
        }
        if self.max_resample_attempts == 0 {
            problems.push("max_resample_attempts must be at least 1".to_string());
        }
        if self.extra_time_factor < 0.0 {
            problems.push("extra_time_factor must not be negative".to_string());
        }
        problems
    }
}
