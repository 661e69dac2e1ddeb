//! Probability helpers for the match model
//!
//! All functions are pure apart from the rng they are handed, so the outcome
//! model can be tested without running a full match.

use super::SimRng;
use crate::config::MatchEngineConfig;
use rand::Rng;
use rand_distr::{Distribution, Poisson};

// ============================================================================
// Outcome category
// ============================================================================

/// Result category decided before any goals are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedOutcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl ForcedOutcome {
    pub fn accepts(self, home_goals: u32, away_goals: u32) -> bool {
        match self {
            ForcedOutcome::HomeWin => home_goals > away_goals,
            ForcedOutcome::AwayWin => away_goals > home_goals,
            ForcedOutcome::Draw => home_goals == away_goals,
        }
    }

    /// Bend a score into this category: the loser's tally decides a forced win,
    /// the higher tally decides a forced draw.
    pub fn nudge(self, home_goals: u32, away_goals: u32) -> (u32, u32) {
        match self {
            ForcedOutcome::HomeWin => (away_goals + 1, away_goals),
            ForcedOutcome::AwayWin => (home_goals, home_goals + 1),
            ForcedOutcome::Draw => {
                let level = home_goals.max(away_goals);
                (level, level)
            }
        }
    }
}

/// Step function on the rating comparison, not an Elo curve.
#[inline]
pub fn win_probability(rating: f64, opponent: f64, cfg: &MatchEngineConfig) -> f64 {
    if rating > opponent {
        cfg.favourite_win_probability
    } else {
        cfg.underdog_win_probability
    }
}

#[inline]
pub fn draw_probability(_rating: f64, _opponent: f64, cfg: &MatchEngineConfig) -> f64 {
    cfg.draw_probability
}

/// Map one uniform draw onto home win / draw / away win.
pub fn forced_outcome(home: f64, away: f64, roll: f64, cfg: &MatchEngineConfig) -> ForcedOutcome {
    let win_p = win_probability(home, away, cfg);
    let draw_p = draw_probability(home, away, cfg);
    if roll < win_p {
        ForcedOutcome::HomeWin
    } else if roll < win_p + draw_p {
        ForcedOutcome::Draw
    } else {
        ForcedOutcome::AwayWin
    }
}

// ============================================================================
// Goal means
// ============================================================================

/// Two attacking means from the rating gap.
///
/// A 600-point edge scales the home mean by 1.5 and the away mean by 1/1.5.
/// Both are floored at `min_goal_mean`; a gap of `-rating_scale` or worse
/// floors both.
pub fn expected_goals(home: f64, away: f64, cfg: &MatchEngineConfig) -> (f64, f64) {
    let factor = 1.0 + (home - away) / cfg.rating_scale;
    let home_mean = (cfg.base_goal_expectation * factor).max(cfg.min_goal_mean);
    let away_mean = if factor > 0.0 {
        (cfg.base_goal_expectation / factor).max(cfg.min_goal_mean)
    } else {
        cfg.min_goal_mean
    };
    (home_mean, away_mean)
}

/// One Poisson goal count. Non-finite or non-positive means score nothing.
pub fn sample_goals(mean: f64, rng: &mut SimRng) -> u32 {
    match Poisson::new(mean) {
        Ok(dist) => {
            let goals: f64 = dist.sample(rng);
            goals as u32
        }
        Err(_) => 0,
    }
}

/// Bernoulli shootout: `true` when the home side converts.
pub fn home_wins_shootout(home: f64, away: f64, rng: &mut SimRng, cfg: &MatchEngineConfig) -> bool {
    rng.gen::<f64>() < win_probability(home, away, cfg)
}
