//! Straight single-elimination bracket seeded by rating.

use super::knockout::{play_bracket, BracketRun};
use super::{TournamentFormat, TournamentShape};
use crate::config::PlayoffConfig;
use crate::engine::{MatchEngine, SimContext, SimRng};
use crate::error::{Result, SimError};
use crate::models::{KnockoutRound, Roster, TeamId, TeamRating};
use tracing::info;

pub struct PlayoffTournament<E> {
    ctx: SimContext<E>,
    entrants: Vec<TeamId>,
    run: Option<BracketRun>,
}

impl<E: MatchEngine> PlayoffTournament<E> {
    /// Top `bracket_size` teams by rating; adjacent entries meet in round one.
    pub fn new(
        ratings: &[TeamRating],
        engine: E,
        rng: SimRng,
        config: &PlayoffConfig,
    ) -> Result<Self> {
        let roster = Roster::from_ratings(ratings)?;
        let size = config.bracket_size;
        if size < 2 || !size.is_power_of_two() || size > roster.len() {
            return Err(SimError::InvalidBracketSize { found: size });
        }

        let mut entrants = roster.ids_by_rating();
        entrants.truncate(size);
        Ok(Self { ctx: SimContext::new(roster, engine, rng), entrants, run: None })
    }

    pub fn entrants(&self) -> &[TeamId] {
        &self.entrants
    }

    pub fn champion(&self) -> Option<TeamId> {
        self.run.as_ref()?.champion
    }

    pub fn rounds(&self) -> &[KnockoutRound] {
        self.run.as_ref().map(|r| r.rounds.as_slice()).unwrap_or(&[])
    }

    pub fn match_count(&self) -> usize {
        self.run.as_ref().map(BracketRun::match_count).unwrap_or(0)
    }
}

impl<E: MatchEngine> TournamentFormat for PlayoffTournament<E> {
    fn name(&self) -> String {
        "Playoff".to_string()
    }

    fn run(&mut self) -> Result<()> {
        let run = play_bracket(&mut self.ctx, self.entrants.clone())?;
        info!(
            "playoff complete: {} entrants, {} matches",
            self.entrants.len(),
            run.match_count()
        );
        self.run = Some(run);
        Ok(())
    }

    /// Entrants by (exit size asc, rating desc).
    fn rankings(&self) -> Result<Vec<TeamId>> {
        let run = self.run.as_ref().ok_or(SimError::NotSimulated("playoff"))?;
        let roster = &self.ctx.roster;
        let mut ranked = self.entrants.clone();
        ranked.sort_by(|a, b| {
            let exit_a = run.eliminated.get(a).copied().unwrap_or(u32::MAX);
            let exit_b = run.eliminated.get(b).copied().unwrap_or(u32::MAX);
            exit_a.cmp(&exit_b).then_with(|| roster[*b].rating.total_cmp(&roster[*a].rating))
        });
        Ok(ranked)
    }

    fn roster(&self) -> &Roster {
        &self.ctx.roster
    }

    fn shape(&self) -> TournamentShape<'_> {
        TournamentShape::Unstructured { match_count: self.match_count() }
    }
}
