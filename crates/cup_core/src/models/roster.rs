//! Roster: the per-edition lookup table from [`TeamId`] to [`Team`].
//!
//! Every structure that refers to a team (group draws, elimination maps, match
//! logs) stores a `TeamId`; the roster is the only owner of the `Team` values.

use super::team::{Team, TeamId, TeamRating};
use crate::error::{Result, SimError};
use std::collections::HashSet;
use std::ops::Index;

#[derive(Debug, Clone, Default)]
pub struct Roster {
    teams: Vec<Team>,
}

impl Roster {
    /// Build fresh teams (zeroed stats) from a rating table.
    pub fn from_ratings(ratings: &[TeamRating]) -> Result<Self> {
        if ratings.is_empty() {
            return Err(SimError::EmptyField);
        }

        let mut seen = HashSet::with_capacity(ratings.len());
        let mut teams = Vec::with_capacity(ratings.len());
        for (idx, entry) in ratings.iter().enumerate() {
            if !seen.insert(entry.name.as_str()) {
                return Err(SimError::DuplicateTeam(entry.name.clone()));
            }
            teams.push(Team::new(TeamId(idx), entry.name.clone(), entry.rating));
        }

        Ok(Self { teams })
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn team(&self, id: TeamId) -> &Team {
        &self.teams[id.0]
    }

    pub fn team_mut(&mut self, id: TeamId) -> &mut Team {
        &mut self.teams[id.0]
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.teams.iter().map(|t| t.id)
    }

    pub fn name(&self, id: TeamId) -> &str {
        &self.teams[id.0].name
    }

    /// Ids sorted by rating, strongest first. Stable for equal ratings.
    pub fn ids_by_rating(&self) -> Vec<TeamId> {
        let mut ids: Vec<TeamId> = self.ids().collect();
        ids.sort_by(|a, b| self.team(*b).rating.total_cmp(&self.team(*a).rating));
        ids
    }

    /// Apply a final score to both sides.
    pub fn record_result(
        &mut self,
        home: TeamId,
        away: TeamId,
        home_goals: u32,
        away_goals: u32,
        fair_play: (u32, u32),
    ) {
        self.team_mut(home).record_match(home_goals, away_goals, fair_play.0);
        self.team_mut(away).record_match(away_goals, home_goals, fair_play.1);
    }
}

impl Index<TeamId> for Roster {
    type Output = Team;

    fn index(&self, id: TeamId) -> &Team {
        self.team(id)
    }
}
