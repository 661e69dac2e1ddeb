//! Match outcome types.
//!
//! [`MatchOutcome`] is what a [`MatchEngine`](crate::engine::MatchEngine) returns
//! for two teams; [`MatchResult`] is the immutable log entry a format driver
//! keeps once the outcome has been recorded on the roster.

use super::team::TeamId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

/// Final score produced by a match engine (regulation + extra time + shootout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub home_goals: u32,
    pub away_goals: u32,
    /// Decided by a penalty shootout; the shootout winner carries one extra goal.
    pub penalties: bool,
}

impl MatchOutcome {
    pub fn new(home_goals: u32, away_goals: u32) -> Self {
        Self { home_goals, away_goals, penalties: false }
    }

    pub fn winner(&self) -> Option<Side> {
        match self.home_goals.cmp(&self.away_goals) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home: TeamId,
    pub away: TeamId,
    pub home_goals: u32,
    pub away_goals: u32,
    /// `None` only for a drawn non-knockout match.
    pub winner: Option<TeamId>,
    pub penalties: bool,
}

impl MatchResult {
    pub fn from_outcome(home: TeamId, away: TeamId, outcome: MatchOutcome) -> Self {
        let winner = outcome.winner().map(|side| match side {
            Side::Home => home,
            Side::Away => away,
        });
        Self {
            home,
            away,
            home_goals: outcome.home_goals,
            away_goals: outcome.away_goals,
            winner,
            penalties: outcome.penalties,
        }
    }

    pub fn loser(&self) -> Option<TeamId> {
        self.winner.map(|w| if w == self.home { self.away } else { self.home })
    }
}

/// One knockout round: the bracket size at kickoff and its matches in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnockoutRound {
    pub size: u32,
    pub matches: Vec<MatchResult>,
}

impl KnockoutRound {
    pub fn losers(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.matches.iter().filter_map(|m| m.loser())
    }
}
