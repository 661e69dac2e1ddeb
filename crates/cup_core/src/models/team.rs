use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a team inside its [`Roster`](super::Roster).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(pub usize);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One row of the rating table a tournament is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRating {
    pub name: String,
    pub rating: f64,
}

impl TeamRating {
    pub fn new(name: impl Into<String>, rating: f64) -> Self {
        Self { name: name.into(), rating }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub rating: f64,

    pub points: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    /// Disciplinary points (cards); lower is better.
    pub fair_play: u32,

    /// Group label, stamped once a group stage has been ranked.
    pub group: Option<char>,
    /// Finishing position inside `group` (1-based).
    pub group_pos: Option<u8>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, rating: f64) -> Self {
        Self {
            id,
            name: name.into(),
            rating,
            points: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            fair_play: 0,
            group: None,
            group_pos: None,
        }
    }

    /// Record one match from this team's point of view.
    pub fn record_match(&mut self, goals_for: u32, goals_against: u32, fair_play_points: u32) {
        self.goals_for += goals_for;
        self.goals_against += goals_against;
        self.fair_play += fair_play_points;

        if goals_for > goals_against {
            self.points += 3;
            self.wins += 1;
        } else if goals_for == goals_against {
            self.points += 1;
            self.draws += 1;
        } else {
            self.losses += 1;
        }
    }

    pub fn goal_difference(&self) -> i32 {
        self.goals_for as i32 - self.goals_against as i32
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.draws + self.losses
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_match_keeps_points_invariant() {
        let mut team = Team::new(TeamId(0), "Alpha", 1800.0);
        team.record_match(2, 0, 1);
        team.record_match(1, 1, 0);
        team.record_match(0, 3, 2);

        assert_eq!(team.points, 3 * team.wins + team.draws);
        assert_eq!((team.wins, team.draws, team.losses), (1, 1, 1));
        assert_eq!(team.goal_difference(), -1);
        assert_eq!(team.fair_play, 3);
        assert_eq!(team.games_played(), 3);
    }
}
