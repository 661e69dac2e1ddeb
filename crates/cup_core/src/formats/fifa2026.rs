//! FIFA 2026 format: 12 groups of 4, then a 32-team knockout.

use super::group_stage::GroupStage;
use super::knockout::KnockoutStage;
use super::{GroupStageFormat, TournamentFormat, TournamentShape};
use crate::config::GroupStageConfig;
use crate::engine::{MatchEngine, SimContext, SimRng};
use crate::error::{Result, SimError};
use crate::models::{Roster, TeamId, TeamRating};
use std::collections::BTreeMap;
use tracing::info;

/// Third-placed teams that advance alongside the top two of every group.
pub const BEST_THIRDS: usize = 8;

/// Group stage with FIFA 2026 qualification rules.
#[derive(Debug, Clone)]
pub struct Fifa2026GroupStage {
    stage: GroupStage,
}

impl Fifa2026GroupStage {
    pub fn new(stage: GroupStage) -> Self {
        Self { stage }
    }

    pub fn stage(&self) -> &GroupStage {
        &self.stage
    }

    /// Third-placed teams by (points, GD, GF), best first. Stable: equal
    /// records keep group-label order.
    pub fn ranked_thirds(&self, roster: &Roster) -> Vec<TeamId> {
        let mut thirds = self.stage.teams_at(3);
        thirds.sort_by(|a, b| {
            let (ta, tb) = (roster.team(*a), roster.team(*b));
            tb.points
                .cmp(&ta.points)
                .then_with(|| tb.goal_difference().cmp(&ta.goal_difference()))
                .then_with(|| tb.goals_for.cmp(&ta.goals_for))
        });
        thirds
    }
}

impl GroupStageFormat for Fifa2026GroupStage {
    fn simulate<E: MatchEngine>(&mut self, ctx: &mut SimContext<E>) -> Result<()> {
        self.stage.simulate(ctx);
        Ok(())
    }

    fn rankings(&self) -> &BTreeMap<char, Vec<TeamId>> {
        self.stage.group_rankings()
    }

    /// Winners, then runners-up, then the best eight thirds.
    fn qualified_teams(&self, roster: &Roster) -> Result<Vec<TeamId>> {
        if !self.stage.is_simulated() {
            return Err(SimError::NotSimulated("group stage"));
        }
        let mut qualified = self.stage.teams_at(1);
        qualified.extend(self.stage.teams_at(2));
        qualified.extend(self.ranked_thirds(roster).into_iter().take(BEST_THIRDS));
        Ok(qualified)
    }

    fn display_tables(&self, roster: &Roster) -> String {
        self.stage.standings_table(roster)
    }
}

/// The complete 48-team edition.
pub struct Fifa2026Tournament<E> {
    ctx: SimContext<E>,
    groups: Fifa2026GroupStage,
    knockout: Option<KnockoutStage>,
}

impl<E: MatchEngine> Fifa2026Tournament<E> {
    /// Build the roster and make the group draw; the draw is the first use of `rng`.
    pub fn new(
        ratings: &[TeamRating],
        engine: E,
        rng: SimRng,
        config: &GroupStageConfig,
    ) -> Result<Self> {
        let roster = Roster::from_ratings(ratings)?;
        let mut ctx = SimContext::new(roster, engine, rng);
        let stage = GroupStage::draw(&ctx.roster, &mut ctx.rng, config)?;
        Ok(Self { ctx, groups: Fifa2026GroupStage::new(stage), knockout: None })
    }

    pub fn group_stage(&self) -> &Fifa2026GroupStage {
        &self.groups
    }

    pub fn knockout_stage(&self) -> Option<&KnockoutStage> {
        self.knockout.as_ref()
    }

    pub fn context(&self) -> &SimContext<E> {
        &self.ctx
    }

    pub fn champion(&self) -> Option<TeamId> {
        self.knockout.as_ref()?.champion()
    }
}

impl<E: MatchEngine> TournamentFormat for Fifa2026Tournament<E> {
    fn name(&self) -> String {
        "FIFA 2026".to_string()
    }

    fn run(&mut self) -> Result<()> {
        self.groups.simulate(&mut self.ctx)?;
        let qualified = self.groups.qualified_teams(&self.ctx.roster)?;

        let mut knockout = KnockoutStage::new(qualified)?;
        knockout.simulate(&mut self.ctx)?;
        self.knockout = Some(knockout);

        info!("FIFA 2026 edition complete: {} matches", self.ctx.matches_played());
        Ok(())
    }

    /// Knockout placements; the sixteen group-stage exits are not ranked.
    fn rankings(&self) -> Result<Vec<TeamId>> {
        self.knockout.as_ref().ok_or(SimError::NotSimulated("knockout stage"))?.placements()
    }

    fn roster(&self) -> &Roster {
        &self.ctx.roster
    }

    fn shape(&self) -> TournamentShape<'_> {
        let stage = self.groups.stage();
        if stage.is_simulated() {
            TournamentShape::GroupBased {
                group_size: stage.group_size(),
                results: stage.results(),
            }
        } else {
            TournamentShape::GroupStructure {
                group_count: stage.groups().len(),
                group_size: stage.group_size(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::engine::PoissonMatchEngine;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn ratings() -> Vec<TeamRating> {
        (0..48)
            .map(|i| TeamRating::new(format!("Nation{i:02}"), 2100.0 - 12.5 * i as f64))
            .collect()
    }

    fn tournament(seed: u64) -> Fifa2026Tournament<PoissonMatchEngine> {
        let config = SimConfig::default();
        Fifa2026Tournament::new(
            &ratings(),
            PoissonMatchEngine::new(config.match_engine.clone()),
            SimRng::seed_from_u64(seed),
            &config.group_stage,
        )
        .unwrap()
    }

    #[test]
    fn test_qualifiers_are_winners_runners_up_and_best_thirds() {
        let mut t = tournament(5);
        assert!(t.group_stage().qualified_teams(t.roster()).is_err());
        t.groups.simulate(&mut t.ctx).unwrap();

        let roster = t.roster();
        let qualified = t.group_stage().qualified_teams(roster).unwrap();
        assert_eq!(qualified.len(), 32);
        assert_eq!(qualified.iter().collect::<HashSet<_>>().len(), 32);

        let positions: Vec<u8> =
            qualified.iter().map(|id| roster[*id].group_pos.unwrap()).collect();
        assert!(positions[..12].iter().all(|&p| p == 1));
        assert!(positions[12..24].iter().all(|&p| p == 2));
        assert!(positions[24..].iter().all(|&p| p == 3));

        // Every third left out is no better than the worst one taken.
        let taken = &qualified[24..];
        let worst = roster[taken[7]].points;
        for id in t.group_stage().stage().teams_at(3) {
            if !taken.contains(&id) {
                assert!(roster[id].points <= worst);
            }
        }
    }

    #[test]
    fn test_thirds_ignore_fair_play_and_keep_label_order() {
        let mut t = tournament(9);
        t.groups.simulate(&mut t.ctx).unwrap();
        let thirds = t.group_stage().stage().teams_at(3);
        assert_eq!(thirds.len(), 12);

        // (points, goals for, goals against, fair play) per group, A to L.
        let mut records = vec![(3, 1, 4, 0); 12];
        records[0] = (4, 3, 3, 9); // A: level with B, worse fair play
        records[1] = (4, 3, 3, 0); // B
        records[2] = (4, 2, 2, 0); // C: same GD, fewer goals
        records[3] = (4, 1, 0, 7); // D: best GD
        for (id, &(points, gf, ga, fp)) in thirds.iter().zip(&records) {
            let team = t.ctx.roster.team_mut(*id);
            team.points = points;
            team.goals_for = gf;
            team.goals_against = ga;
            team.fair_play = fp;
        }

        let ranked = t.group_stage().ranked_thirds(t.roster());
        let mut expected = vec![thirds[3], thirds[0], thirds[1], thirds[2]];
        expected.extend_from_slice(&thirds[4..]);
        assert_eq!(ranked, expected);

        let qualified = t.group_stage().qualified_teams(t.roster()).unwrap();
        assert_eq!(&qualified[24..], &expected[..BEST_THIRDS]);
    }

    #[test]
    fn test_full_edition_ranks_thirty_two() {
        let mut t = tournament(11);
        assert!(matches!(
            t.shape(),
            TournamentShape::GroupStructure { group_count: 12, group_size: 4 }
        ));
        t.run().unwrap();

        let ranked = t.rankings().unwrap();
        assert_eq!(ranked.len(), 32);
        assert_eq!(Some(ranked[0]), t.champion());
        // 72 group matches + 31 knockout matches.
        assert_eq!(t.context().matches_played(), 103);
        assert_eq!(t.shape().match_count(), 72);
        assert!(t.group_stage().display_tables(t.roster()).contains("Group A"));
    }

    #[test]
    fn test_same_seed_same_edition() {
        let play = |seed| {
            let mut t = tournament(seed);
            t.run().unwrap();
            let ranking = t.rankings().unwrap();
            ranking.iter().map(|id| t.roster().name(*id).to_string()).collect::<Vec<_>>()
        };
        assert_eq!(play(2024), play(2024));
    }

    #[test]
    fn test_wrong_field_size_fails_at_construction() {
        let config = SimConfig::default();
        let short: Vec<TeamRating> = ratings().into_iter().take(40).collect();
        let result = Fifa2026Tournament::new(
            &short,
            PoissonMatchEngine::default(),
            SimRng::seed_from_u64(0),
            &config.group_stage,
        );
        assert!(matches!(result, Err(SimError::FieldSize { teams: 40, .. })));
    }
}
