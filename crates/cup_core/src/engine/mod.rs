//! # Match Engine
//!
//! [`MatchEngine`] turns two teams into a final score. [`SimContext`] bundles
//! what one simulated edition shares between its stages: the roster, the
//! engine and the single random stream. Every match of an edition goes through
//! [`SimContext::play`] (or [`SimContext::play_group_match`]), which is the
//! only place team stats are recorded.
//!
//! Randomness is drawn in a fixed order from one [`SimRng`], so an edition is
//! fully determined by the rng state handed to its driver.

pub mod poisson_engine;
pub mod probability;

pub use poisson_engine::PoissonMatchEngine;
pub use probability::ForcedOutcome;

use crate::config::FairPlayConfig;
use crate::models::{MatchOutcome, MatchResult, Roster, Team, TeamId};
use rand::Rng;
use tracing::debug;

/// Deterministic random stream shared by everything in one edition.
pub type SimRng = rand_chacha::ChaCha8Rng;

pub trait MatchEngine {
    /// Play `home` against `away`. With `knockout` set the outcome always has
    /// a winner.
    fn simulate(
        &mut self,
        home: &Team,
        away: &Team,
        knockout: bool,
        rng: &mut SimRng,
    ) -> MatchOutcome;
}

impl<E: MatchEngine + ?Sized> MatchEngine for Box<E> {
    fn simulate(
        &mut self,
        home: &Team,
        away: &Team,
        knockout: bool,
        rng: &mut SimRng,
    ) -> MatchOutcome {
        (**self).simulate(home, away, knockout, rng)
    }
}

pub struct SimContext<E> {
    pub roster: Roster,
    pub engine: E,
    pub rng: SimRng,
    matches_played: usize,
}

impl<E: MatchEngine> SimContext<E> {
    pub fn new(roster: Roster, engine: E, rng: SimRng) -> Self {
        Self { roster, engine, rng, matches_played: 0 }
    }

    pub fn matches_played(&self) -> usize {
        self.matches_played
    }

    /// Play and record one match without disciplinary points.
    pub fn play(&mut self, home: TeamId, away: TeamId, knockout: bool) -> MatchResult {
        self.play_inner(home, away, knockout, None)
    }

    /// Play and record a group match; both sides also collect fair-play points.
    pub fn play_group_match(
        &mut self,
        home: TeamId,
        away: TeamId,
        fair_play: &FairPlayConfig,
    ) -> MatchResult {
        self.play_inner(home, away, false, Some(fair_play))
    }

    fn play_inner(
        &mut self,
        home: TeamId,
        away: TeamId,
        knockout: bool,
        fair_play: Option<&FairPlayConfig>,
    ) -> MatchResult {
        let (home_team, away_team) = (self.roster.team(home), self.roster.team(away));
        let outcome = self.engine.simulate(home_team, away_team, knockout, &mut self.rng);

        let cards = match fair_play {
            Some(cfg) => (draw_fair_play(cfg, &mut self.rng), draw_fair_play(cfg, &mut self.rng)),
            None => (0, 0),
        };
        self.roster.record_result(home, away, outcome.home_goals, outcome.away_goals, cards);
        self.matches_played += 1;

        let result = MatchResult::from_outcome(home, away, outcome);
        debug!("{}", describe(&self.roster, &result));
        result
    }
}

/// Card points for one side of one match.
pub fn draw_fair_play(cfg: &FairPlayConfig, rng: &mut SimRng) -> u32 {
    let yellows = rng.gen_range(0..=cfg.max_yellow_cards);
    let red = rng.gen::<f64>() < cfg.red_card_probability;
    yellows * cfg.yellow_card_points + if red { cfg.red_card_points } else { 0 }
}

/// "Home 2-1 Away → Home (p)" style line.
pub fn describe(roster: &Roster, result: &MatchResult) -> String {
    let verdict = match result.winner {
        Some(w) => format!("{} wins", roster.name(w)),
        None => "draw".to_string(),
    };
    let pens = if result.penalties { " (p)" } else { "" };
    format!(
        "{} {}-{} {} → {}{}",
        roster.name(result.home),
        result.home_goals,
        result.away_goals,
        roster.name(result.away),
        verdict,
        pens
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamRating;
    use rand::SeedableRng;

    /// Home side wins 1-0 whenever it is rated higher, otherwise loses 0-1.
    struct Chalk;

    impl MatchEngine for Chalk {
        fn simulate(
            &mut self,
            home: &Team,
            away: &Team,
            _knockout: bool,
            _rng: &mut SimRng,
        ) -> MatchOutcome {
            if home.rating > away.rating {
                MatchOutcome::new(1, 0)
            } else {
                MatchOutcome::new(0, 1)
            }
        }
    }

    fn context() -> SimContext<Chalk> {
        let ratings = [TeamRating::new("A", 1900.0), TeamRating::new("B", 1500.0)];
        let roster = Roster::from_ratings(&ratings).unwrap();
        SimContext::new(roster, Chalk, SimRng::seed_from_u64(0))
    }

    #[test]
    fn test_play_records_both_sides() {
        let mut ctx = context();
        let result = ctx.play(TeamId(1), TeamId(0), false);

        assert_eq!(result.winner, Some(TeamId(0)));
        assert_eq!(ctx.roster[TeamId(0)].points, 3);
        assert_eq!(ctx.roster[TeamId(1)].losses, 1);
        assert_eq!(ctx.matches_played(), 1);
        assert_eq!(describe(&ctx.roster, &result), "B 0-1 A → A wins");
    }

    #[test]
    fn test_group_match_adds_fair_play() {
        let mut ctx = context();
        let cfg = FairPlayConfig {
            max_yellow_cards: 3,
            yellow_card_points: 1,
            red_card_probability: 1.0,
            red_card_points: 4,
        };
        for _ in 0..5 {
            ctx.play_group_match(TeamId(0), TeamId(1), &cfg);
        }
        // Five guaranteed reds each.
        assert!(ctx.roster[TeamId(0)].fair_play >= 20);
        assert!(ctx.roster[TeamId(1)].fair_play >= 20);
    }

    #[test]
    fn test_disabled_fair_play_is_zero() {
        let mut rng = SimRng::seed_from_u64(8);
        for _ in 0..100 {
            assert_eq!(draw_fair_play(&FairPlayConfig::disabled(), &mut rng), 0);
        }
    }
}
