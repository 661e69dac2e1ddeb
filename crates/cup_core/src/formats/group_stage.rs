//! Seeded group draw, round robin, FIFA tie-breaks.
//!
//! Ranking inside a group: points → goal difference → goals scored → fewer
//! fair-play points → drawing of lots.

use crate::config::{FairPlayConfig, GroupStageConfig};
use crate::engine::{MatchEngine, SimContext, SimRng};
use crate::error::{Result, SimError};
use crate::models::{MatchResult, Roster, TeamId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tracing::{debug_span, info};

#[derive(Debug, Clone)]
pub struct GroupStage {
    group_size: usize,
    fair_play: FairPlayConfig,
    groups: BTreeMap<char, Vec<TeamId>>,
    results: BTreeMap<char, Vec<MatchResult>>,
    rankings: BTreeMap<char, Vec<TeamId>>,
}

impl GroupStage {
    /// Pot-based draw: one team from every rating tier per group.
    pub fn draw(roster: &Roster, rng: &mut SimRng, config: &GroupStageConfig) -> Result<Self> {
        let group_count = config.group_count;
        let group_size = config.group_size;
        if group_count > 26 {
            return Err(SimError::TooManyGroups { groups: group_count });
        }
        if group_count == 0 || roster.len() != group_count * group_size {
            return Err(SimError::FieldSize {
                teams: roster.len(),
                groups: group_count,
                group_size,
            });
        }

        let ranked = roster.ids_by_rating();
        let mut pots: Vec<Vec<TeamId>> =
            ranked.chunks(group_count).map(|pot| pot.to_vec()).collect();
        for pot in &mut pots {
            pot.shuffle(rng);
        }

        let mut groups = BTreeMap::new();
        for j in 0..group_count {
            let members: Vec<TeamId> = pots.iter().map(|pot| pot[j]).collect();
            groups.insert(group_label(j), members);
        }

        Ok(Self {
            group_size,
            fair_play: config.fair_play.clone(),
            groups,
            results: BTreeMap::new(),
            rankings: BTreeMap::new(),
        })
    }

    /// Fixed groups, bypassing the draw.
    pub fn with_groups(
        groups: BTreeMap<char, Vec<TeamId>>,
        fair_play: FairPlayConfig,
    ) -> Result<Self> {
        let group_size = groups.values().next().map(Vec::len).unwrap_or(0);
        if groups.is_empty() || group_size == 0 || groups.values().any(|g| g.len() != group_size) {
            let teams = groups.values().map(Vec::len).sum();
            return Err(SimError::FieldSize { teams, groups: groups.len(), group_size });
        }
        Ok(Self {
            group_size,
            fair_play,
            groups,
            results: BTreeMap::new(),
            rankings: BTreeMap::new(),
        })
    }

    /// Round robin in every group, then rank and stamp group/position on the teams.
    pub fn simulate<E: MatchEngine>(&mut self, ctx: &mut SimContext<E>) {
        self.results.clear();
        for (&label, teams) in &self.groups {
            let _span = debug_span!("group", label = %label).entered();
            let mut played = Vec::with_capacity(teams.len() * (teams.len() - 1) / 2);
            for i in 0..teams.len() {
                for j in (i + 1)..teams.len() {
                    played.push(ctx.play_group_match(teams[i], teams[j], &self.fair_play));
                }
            }
            self.results.insert(label, played);
        }

        self.rankings = self
            .groups
            .iter()
            .map(|(&label, teams)| (label, rank_group(teams, &ctx.roster, &mut ctx.rng)))
            .collect();

        for (&label, ranked) in &self.rankings {
            for (pos, id) in ranked.iter().enumerate() {
                let team = ctx.roster.team_mut(*id);
                team.group = Some(label);
                team.group_pos = Some(pos as u8 + 1);
            }
        }
        info!("group stage complete: {} groups, {} matches", self.groups.len(), self.match_count());
    }

    pub fn groups(&self) -> &BTreeMap<char, Vec<TeamId>> {
        &self.groups
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Group label → match results in the order they were played.
    pub fn results(&self) -> &BTreeMap<char, Vec<MatchResult>> {
        &self.results
    }

    /// Group label → teams in finishing order. Empty before `simulate`.
    pub fn group_rankings(&self) -> &BTreeMap<char, Vec<TeamId>> {
        &self.rankings
    }

    pub fn is_simulated(&self) -> bool {
        !self.rankings.is_empty()
    }

    pub fn match_count(&self) -> usize {
        self.results.values().map(Vec::len).sum()
    }

    /// Team finishing `position` (1-based) in every group, in label order.
    pub fn teams_at(&self, position: usize) -> Vec<TeamId> {
        let Some(index) = position.checked_sub(1) else {
            return Vec::new();
        };
        self.rankings.values().filter_map(|ranked| ranked.get(index).copied()).collect()
    }

    /// Plain-text standings, one block per group.
    pub fn standings_table(&self, roster: &Roster) -> String {
        let mut out = String::new();
        for (label, ranked) in &self.rankings {
            let _ = writeln!(out, "\nGroup {label}");
            for id in ranked {
                let t = roster.team(*id);
                let _ = writeln!(
                    out,
                    "{:15} | P {} | Pts {:2} | GD {:+3} | GF {:2} | FP {}",
                    t.name,
                    t.games_played(),
                    t.points,
                    t.goal_difference(),
                    t.goals_for,
                    t.fair_play
                );
            }
        }
        out
    }
}

pub fn group_label(index: usize) -> char {
    (b'A' + index as u8) as char
}

/// Sort one group by (points, GD, GF, -fair play, lot), best first.
/// Lots are drawn once per team, in draw order.
pub fn rank_group(teams: &[TeamId], roster: &Roster, rng: &mut SimRng) -> Vec<TeamId> {
    let mut keyed: Vec<(TeamId, f64)> = teams.iter().map(|&id| (id, rng.gen::<f64>())).collect();
    keyed.sort_by(|(a, lot_a), (b, lot_b)| {
        let (ta, tb) = (roster.team(*a), roster.team(*b));
        tb.points
            .cmp(&ta.points)
            .then_with(|| tb.goal_difference().cmp(&ta.goal_difference()))
            .then_with(|| tb.goals_for.cmp(&ta.goals_for))
            .then_with(|| ta.fair_play.cmp(&tb.fair_play))
            .then_with(|| lot_b.partial_cmp(lot_a).unwrap_or(Ordering::Equal))
    });
    keyed.into_iter().map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PoissonMatchEngine;
    use crate::models::TeamRating;
    use rand::SeedableRng;

    fn field(n: usize) -> Vec<TeamRating> {
        (0..n).map(|i| TeamRating::new(format!("Team{i:02}"), 2000.0 - 10.0 * i as f64)).collect()
    }

    #[test]
    fn test_draw_puts_one_team_per_pot_in_each_group() {
        let roster = Roster::from_ratings(&field(48)).unwrap();
        let mut rng = SimRng::seed_from_u64(1);
        let stage = GroupStage::draw(&roster, &mut rng, &GroupStageConfig::default()).unwrap();

        assert_eq!(stage.groups().len(), 12);
        assert_eq!(stage.groups().keys().next(), Some(&'A'));
        assert_eq!(stage.groups().keys().last(), Some(&'L'));
        for members in stage.groups().values() {
            assert_eq!(members.len(), 4);
            // Team k sits in pot k / 12 because ratings descend with the index.
            let pots: Vec<usize> = members.iter().map(|id| id.0 / 12).collect();
            assert_eq!(pots, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn test_draw_rejects_wrong_field_size() {
        let roster = Roster::from_ratings(&field(47)).unwrap();
        let mut rng = SimRng::seed_from_u64(1);
        let err = GroupStage::draw(&roster, &mut rng, &GroupStageConfig::default()).unwrap_err();
        assert!(matches!(err, SimError::FieldSize { teams: 47, groups: 12, group_size: 4 }));
    }

    #[test]
    fn test_draw_rejects_more_than_26_groups() {
        let roster = Roster::from_ratings(&field(54)).unwrap();
        let mut rng = SimRng::seed_from_u64(1);
        let cfg =
            GroupStageConfig { group_count: 27, group_size: 2, ..GroupStageConfig::default() };
        assert!(matches!(
            GroupStage::draw(&roster, &mut rng, &cfg),
            Err(SimError::TooManyGroups { groups: 27 })
        ));
    }

    #[test]
    fn test_round_robin_match_counts() {
        for group_size in [3usize, 4, 5] {
            let n = group_size * 2;
            let roster = Roster::from_ratings(&field(n)).unwrap();
            let rng = SimRng::seed_from_u64(9);
            let mut ctx = SimContext::new(roster, PoissonMatchEngine::default(), rng);
            let cfg =
                GroupStageConfig { group_count: 2, group_size, ..GroupStageConfig::default() };
            let mut stage = GroupStage::draw(&ctx.roster, &mut ctx.rng, &cfg).unwrap();
            stage.simulate(&mut ctx);

            for matches in stage.results().values() {
                assert_eq!(matches.len(), group_size * (group_size - 1) / 2);
            }
            assert_eq!(stage.match_count(), 2 * group_size * (group_size - 1) / 2);
        }
    }

    #[test]
    fn test_rankings_stamp_positions() {
        let roster = Roster::from_ratings(&field(48)).unwrap();
        let rng = SimRng::seed_from_u64(21);
        let mut ctx = SimContext::new(roster, PoissonMatchEngine::default(), rng);
        let mut stage =
            GroupStage::draw(&ctx.roster, &mut ctx.rng, &GroupStageConfig::default()).unwrap();
        assert!(!stage.is_simulated());
        stage.simulate(&mut ctx);

        for (label, ranked) in stage.group_rankings() {
            let positions: Vec<u8> =
                ranked.iter().filter_map(|id| ctx.roster[*id].group_pos).collect();
            assert_eq!(positions, vec![1, 2, 3, 4]);
            assert!(ranked.iter().all(|id| ctx.roster[*id].group == Some(*label)));

            // Points never increase down the table.
            let points: Vec<u32> = ranked.iter().map(|id| ctx.roster[*id].points).collect();
            assert!(points.windows(2).all(|w| w[0] >= w[1]));
        }
        assert_eq!(stage.teams_at(1).len(), 12);
        assert_eq!(stage.teams_at(4).len(), 12);
        assert!(stage.teams_at(0).is_empty());
        assert!(stage.teams_at(5).is_empty());
        let table = stage.standings_table(&ctx.roster);
        assert!(table.contains("Group L"));
        assert!(table.contains("| P 3 |"));
    }

    #[test]
    fn test_rank_group_tie_breaks() {
        let mut roster = Roster::from_ratings(&field(4)).unwrap();
        // Same points; GD puts 0 first, GF puts 1 second, fair play puts 3
        // ahead of 2.
        roster.team_mut(TeamId(0)).record_match(4, 0, 0);
        roster.team_mut(TeamId(1)).record_match(3, 1, 0);
        roster.team_mut(TeamId(2)).record_match(2, 0, 5);
        roster.team_mut(TeamId(3)).record_match(2, 0, 1);

        let mut rng = SimRng::seed_from_u64(0);
        let ranked = rank_group(&[TeamId(2), TeamId(3), TeamId(1), TeamId(0)], &roster, &mut rng);
        assert_eq!(ranked, vec![TeamId(0), TeamId(1), TeamId(3), TeamId(2)]);
    }

    #[test]
    fn test_rank_group_lots_settle_full_ties() {
        let roster = Roster::from_ratings(&field(4)).unwrap();
        let mut orders = std::collections::HashSet::new();
        for seed in 0..40 {
            let mut rng = SimRng::seed_from_u64(seed);
            let teams = [TeamId(0), TeamId(1), TeamId(2), TeamId(3)];
            let ranked = rank_group(&teams, &roster, &mut rng);
            assert_eq!(ranked.len(), 4);
            orders.insert(ranked);
        }
        assert!(orders.len() > 1, "drawing of lots should vary with the stream");
    }

    #[test]
    fn test_with_groups_rejects_uneven_groups() {
        let mut groups = BTreeMap::new();
        groups.insert('A', vec![TeamId(0), TeamId(1)]);
        groups.insert('B', vec![TeamId(2)]);
        assert!(GroupStage::with_groups(groups, FairPlayConfig::disabled()).is_err());
    }
}
