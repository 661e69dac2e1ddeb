//! Default match engine: forced outcome category + Poisson goals.

use super::probability::{
    expected_goals, forced_outcome, home_wins_shootout, sample_goals, ForcedOutcome,
};
use super::{MatchEngine, SimRng};
use crate::config::MatchEngineConfig;
use crate::models::{MatchOutcome, Team};
use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct PoissonMatchEngine {
    config: MatchEngineConfig,
    /// Matches whose score had to be nudged after the retry budget ran out.
    nudged: u64,
}

impl PoissonMatchEngine {
    pub fn new(config: MatchEngineConfig) -> Self {
        Self { config, nudged: 0 }
    }

    pub fn config(&self) -> &MatchEngineConfig {
        &self.config
    }

    pub fn nudged_matches(&self) -> u64 {
        self.nudged
    }

    /// Regulation score consistent with `forced`.
    fn regulation_score(
        &mut self,
        forced: ForcedOutcome,
        means: (f64, f64),
        rng: &mut SimRng,
    ) -> (u32, u32) {
        let mut home_goals = 0;
        let mut away_goals = 0;
        for _ in 0..self.config.max_resample_attempts {
            home_goals = sample_goals(means.0, rng);
            away_goals = sample_goals(means.1, rng);
            if forced.accepts(home_goals, away_goals) {
                return (home_goals, away_goals);
            }
        }

        self.nudged += 1;
        forced.nudge(home_goals, away_goals)
    }
}

impl MatchEngine for PoissonMatchEngine {
    fn simulate(
        &mut self,
        home: &Team,
        away: &Team,
        knockout: bool,
        rng: &mut SimRng,
    ) -> MatchOutcome {
        let (r_home, r_away) = (home.rating, away.rating);

        // Decide W-D-L first, then find goals that fit it.
        let roll: f64 = rng.gen();
        let forced = forced_outcome(r_home, r_away, roll, &self.config);
        let means = expected_goals(r_home, r_away, &self.config);

        let (mut home_goals, mut away_goals) = self.regulation_score(forced, means, rng);

        let mut penalties = false;
        if knockout && home_goals == away_goals {
            let factor = self.config.extra_time_factor;
            home_goals += sample_goals(means.0 * factor, rng);
            away_goals += sample_goals(means.1 * factor, rng);

            if home_goals == away_goals {
                penalties = true;
                if home_wins_shootout(r_home, r_away, rng, &self.config) {
                    home_goals += 1;
                } else {
                    away_goals += 1;
                }
            }
        }

        MatchOutcome { home_goals, away_goals, penalties }
    }
}
