//! # Tournament Formats
//!
//! Stage engines ([`group_stage`], [`knockout`]) and the complete format
//! drivers built on them ([`fifa2026`], [`playoff`], [`swiss`]).
//!
//! A driver owns a [`SimContext`](crate::engine::SimContext) for one edition
//! and exposes, once run, a final ranking plus a [`TournamentShape`]
//! describing what it kept of its match log.

pub mod bracket;
pub mod fifa2026;
pub mod group_stage;
pub mod knockout;
pub mod playoff;
pub mod swiss;


pub use fifa2026::{Fifa2026GroupStage, Fifa2026Tournament};
pub use group_stage::GroupStage;
pub use knockout::{play_bracket, BracketRun, KnockoutStage};
pub use playoff::PlayoffTournament;
pub use swiss::SwissTournament;

use crate::engine::{MatchEngine, SimContext};
use crate::error::Result;
use crate::models::{MatchResult, Roster, TeamId};
use std::collections::BTreeMap;

/// A group stage that feeds a knockout bracket.
pub trait GroupStageFormat {
    fn simulate<E: MatchEngine>(&mut self, ctx: &mut SimContext<E>) -> Result<()>;

    /// Group label → teams in finishing order.
    fn rankings(&self) -> &BTreeMap<char, Vec<TeamId>>;

    /// Teams advancing to the knockout stage, in bracket-lookup order.
    fn qualified_teams(&self, roster: &Roster) -> Result<Vec<TeamId>>;

    fn display_tables(&self, roster: &Roster) -> String;
}

/// A complete format, playable end to end.
pub trait TournamentFormat {
    fn name(&self) -> String;

    fn run(&mut self) -> Result<()>;

    /// Final order, best first. Only the teams the format actually ranks.
    fn rankings(&self) -> Result<Vec<TeamId>>;

    fn roster(&self) -> &Roster;

    fn shape(&self) -> TournamentShape<'_>;
}

/// What a format can report about its schedule, for incentive analysis.
#[derive(Debug, Clone, Copy)]
pub enum TournamentShape<'a> {
    /// Group round robins with their full match logs.
    GroupBased { group_size: usize, results: &'a BTreeMap<char, Vec<MatchResult>> },
    /// Groups are known but their matches were not kept.
    GroupStructure { group_count: usize, group_size: usize },
    /// Round-by-round log without group context.
    RoundBased(&'a [Vec<MatchResult>]),
    Unstructured { match_count: usize },
}

impl TournamentShape<'_> {
    pub fn match_count(&self) -> usize {
        match self {
            Self::GroupBased { results, .. } => results.values().map(Vec::len).sum(),
            Self::GroupStructure { group_count, group_size } => {
                group_size * group_size.saturating_sub(1) / 2 * group_count
            }
            Self::RoundBased(rounds) => rounds.iter().map(Vec::len).sum(),
            Self::Unstructured { match_count } => *match_count,
        }
    }
}
