//! Swiss system: fixed number of rounds, pairing by current standing.

use super::{TournamentFormat, TournamentShape};
use crate::config::SwissConfig;
use crate::engine::{MatchEngine, SimContext, SimRng};
use crate::error::{Result, SimError};
use crate::models::{MatchResult, Roster, TeamId, TeamRating};
use rand::Rng;
use std::cmp::Ordering;
use tracing::{debug, debug_span, info};

pub struct SwissTournament<E> {
    ctx: SimContext<E>,
    rounds: usize,
    round_results: Vec<Vec<MatchResult>>,
}

impl<E: MatchEngine> SwissTournament<E> {
    pub fn new(
        ratings: &[TeamRating],
        engine: E,
        rng: SimRng,
        config: &SwissConfig,
    ) -> Result<Self> {
        if config.rounds == 0 {
            return Err(SimError::InvalidConfig("swiss.rounds must be at least 1".to_string()));
        }
        let roster = Roster::from_ratings(ratings)?;
        Ok(Self {
            ctx: SimContext::new(roster, engine, rng),
            rounds: config.rounds,
            round_results: Vec::new(),
        })
    }

    /// Pairs for the next round; an odd team out sits the round out.
    ///
    /// Order: points desc, rating desc, then a lot drawn per team in roster order.
    pub fn pair_round(&mut self) -> Vec<(TeamId, TeamId)> {
        let roster = &self.ctx.roster;
        let rng = &mut self.ctx.rng;
        let mut keyed: Vec<(TeamId, f64)> = roster.ids().map(|id| (id, rng.gen::<f64>())).collect();
        keyed.sort_by(|(a, lot_a), (b, lot_b)| {
            let (ta, tb) = (roster.team(*a), roster.team(*b));
            tb.points
                .cmp(&ta.points)
                .then_with(|| tb.rating.total_cmp(&ta.rating))
                .then_with(|| lot_b.partial_cmp(lot_a).unwrap_or(Ordering::Equal))
        });

        if keyed.len() % 2 == 1 {
            if let Some((bye, _)) = keyed.last() {
                debug!("{} sits out", roster.name(*bye));
            }
        }
        keyed.chunks_exact(2).map(|pair| (pair[0].0, pair[1].0)).collect()
    }

    pub fn round_results(&self) -> &[Vec<MatchResult>] {
        &self.round_results
    }

    pub fn match_count(&self) -> usize {
        self.round_results.iter().map(Vec::len).sum()
    }
}

impl<E: MatchEngine> TournamentFormat for SwissTournament<E> {
    fn name(&self) -> String {
        format!("Swiss ({} rounds)", self.rounds)
    }

    fn run(&mut self) -> Result<()> {
        self.round_results.clear();
        for round in 1..=self.rounds {
            let _span = debug_span!("swiss", round).entered();
            let pairs = self.pair_round();
            let played: Vec<MatchResult> =
                pairs.into_iter().map(|(home, away)| self.ctx.play(home, away, false)).collect();
            self.round_results.push(played);
        }
        info!("swiss complete: {} rounds, {} matches", self.rounds, self.match_count());
        Ok(())
    }

    /// Every team by (points, GD, GF, rating), best first.
    fn rankings(&self) -> Result<Vec<TeamId>> {
        if self.round_results.is_empty() {
            return Err(SimError::NotSimulated("swiss"));
        }
        let roster = &self.ctx.roster;
        let mut ranked: Vec<TeamId> = roster.ids().collect();
        ranked.sort_by(|a, b| {
            let (ta, tb) = (roster.team(*a), roster.team(*b));
            tb.points
                .cmp(&ta.points)
                .then_with(|| tb.goal_difference().cmp(&ta.goal_difference()))
                .then_with(|| tb.goals_for.cmp(&ta.goals_for))
                .then_with(|| tb.rating.total_cmp(&ta.rating))
        });
        Ok(ranked)
    }

    fn roster(&self) -> &Roster {
        &self.ctx.roster
    }

    fn shape(&self) -> TournamentShape<'_> {
        TournamentShape::RoundBased(&self.round_results)
    }
}
