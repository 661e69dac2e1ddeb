//! Single-elimination stage for 16 or 32 group qualifiers.

use super::bracket::fifa2026_round_of_32;
use crate::engine::{MatchEngine, SimContext};
use crate::error::{Result, SimError};
use crate::models::{KnockoutRound, Roster, TeamId};
use std::collections::HashMap;
use tracing::{debug_span, info};

/// Outcome of walking a bracket to the end.
#[derive(Debug, Clone, Default)]
pub struct BracketRun {
    pub rounds: Vec<KnockoutRound>,
    /// Team → bracket size at which it went out (1 = champion).
    pub eliminated: HashMap<TeamId, u32>,
    pub champion: Option<TeamId>,
}

impl BracketRun {
    pub fn runner_up(&self) -> Option<TeamId> {
        let final_round = self.rounds.last()?;
        final_round.matches.first()?.loser()
    }

    pub fn match_count(&self) -> usize {
        self.rounds.iter().map(|r| r.matches.len()).sum()
    }
}

/// Pair adjacent entries, knockout matches only, until one team is left.
///
/// `order.len()` must be a power of two. Fails if the engine returns a level
/// score for a knockout match.
pub fn play_bracket<E: MatchEngine>(
    ctx: &mut SimContext<E>,
    order: Vec<TeamId>,
) -> Result<BracketRun> {
    let mut run = BracketRun::default();
    let mut current = order;
    let mut size = current.len() as u32;

    while size > 1 {
        let _span = debug_span!("round", size).entered();
        let mut next = Vec::with_capacity(current.len() / 2);
        let mut matches = Vec::with_capacity(current.len() / 2);

        for pair in current.chunks_exact(2) {
            let result = ctx.play(pair[0], pair[1], true);
            let (Some(winner), Some(loser)) = (result.winner, result.loser()) else {
                return Err(SimError::UndecidedKnockout {
                    home: ctx.roster.name(result.home).to_string(),
                    away: ctx.roster.name(result.away).to_string(),
                });
            };
            run.eliminated.insert(loser, size);
            next.push(winner);
            matches.push(result);
        }

        run.rounds.push(KnockoutRound { size, matches });
        current = next;
        size /= 2;
    }

    if let Some(&champion) = current.first() {
        run.eliminated.insert(champion, 1);
        run.champion = Some(champion);
    }
    Ok(run)
}

#[derive(Debug, Clone)]
pub struct KnockoutStage {
    entrants: Vec<TeamId>,
    run: Option<BracketRun>,
}

impl KnockoutStage {
    pub fn new(entrants: Vec<TeamId>) -> Result<Self> {
        if !matches!(entrants.len(), 16 | 32) {
            return Err(SimError::InvalidBracketSize { found: entrants.len() });
        }
        Ok(Self { entrants, run: None })
    }

    /// Opening order: FIFA 2026 template for 32, (group, position) for 16.
    pub fn opening_order(&self, roster: &Roster) -> Result<Vec<TeamId>> {
        if self.entrants.len() == 32 {
            fifa2026_round_of_32(&self.entrants, roster)
        } else {
            let mut order = self.entrants.clone();
            order.sort_by_key(|id| {
                let team = roster.team(*id);
                (team.group, team.group_pos)
            });
            Ok(order)
        }
    }

    pub fn simulate<E: MatchEngine>(&mut self, ctx: &mut SimContext<E>) -> Result<()> {
        let order = self.opening_order(&ctx.roster)?;
        let run = play_bracket(ctx, order)?;
        if let Some(champion) = run.champion {
            info!(
                "knockout complete: {} champion after {} rounds",
                ctx.roster.name(champion),
                run.rounds.len()
            );
        }
        self.run = Some(run);
        Ok(())
    }

    pub fn entrants(&self) -> &[TeamId] {
        &self.entrants
    }

    pub fn is_simulated(&self) -> bool {
        self.run.is_some()
    }

    pub fn champion(&self) -> Option<TeamId> {
        self.run.as_ref()?.champion
    }

    pub fn runner_up(&self) -> Option<TeamId> {
        self.run.as_ref()?.runner_up()
    }

    pub fn rounds(&self) -> &[KnockoutRound] {
        self.run.as_ref().map(|r| r.rounds.as_slice()).unwrap_or(&[])
    }

    /// Team → bracket size at elimination. Empty before `simulate`.
    pub fn eliminated(&self) -> HashMap<TeamId, u32> {
        self.run.as_ref().map(|r| r.eliminated.clone()).unwrap_or_default()
    }

    pub fn elimination_round(&self, team: TeamId) -> Option<u32> {
        self.run.as_ref()?.eliminated.get(&team).copied()
    }

    pub fn match_count(&self) -> usize {
        self.run.as_ref().map(BracketRun::match_count).unwrap_or(0)
    }

    /// Entrants by (exit round asc, goal difference desc, rating desc).
    pub fn rankings(&self, roster: &Roster) -> Vec<TeamId> {
        let mut ranked = self.entrants.clone();
        ranked.sort_by(|a, b| {
            let (ta, tb) = (roster.team(*a), roster.team(*b));
            let exit_a = self.elimination_round(*a).unwrap_or(99);
            let exit_b = self.elimination_round(*b).unwrap_or(99);
            exit_a
                .cmp(&exit_b)
                .then_with(|| tb.goal_difference().cmp(&ta.goal_difference()))
                .then_with(|| tb.rating.total_cmp(&ta.rating))
        });
        ranked
    }

    /// Full placement: champion, runner-up, then the losers of each earlier
    /// round from the semi-finals back, in match order.
    pub fn placements(&self) -> Result<Vec<TeamId>> {
        let run = self.run.as_ref().ok_or(SimError::NotSimulated("knockout stage"))?;
        let mut placements = Vec::with_capacity(self.entrants.len());
        placements.extend(run.champion);
        placements.extend(run.runner_up());
        for round in run.rounds.iter().rev().skip(1) {
            placements.extend(round.losers());
        }
        Ok(placements)
    }

    /// Champion, runner-up and the exit tiers, as printable lines.
    pub fn summary_lines(&self, roster: &Roster) -> Vec<String> {
        let Some(run) = self.run.as_ref() else {
            return vec!["Knock-out stage not yet simulated.".to_string()];
        };
        let mut lines = Vec::new();
        if let Some(champion) = run.champion {
            lines.push(format!("1. {}  (Champion)", roster.name(champion)));
        }
        if let Some(runner_up) = run.runner_up() {
            lines.push(format!("2. {}  (Runner-up)", roster.name(runner_up)));
        }
        for (size, label) in [
            (4, "Semi-finalists    (3-4)"),
            (8, "Quarter-finalists (5-8)"),
            (16, "Round-of-16      (9-16)"),
            (32, "Round-of-32     (17-32)"),
        ] {
            let mut names: Vec<&str> = run
                .eliminated
                .iter()
                .filter(|(_, &exit)| exit == size)
                .map(|(id, _)| roster.name(*id))
                .collect();
            if !names.is_empty() {
                names.sort_unstable();
                lines.push(format!("{label:<22}: {}", names.join(", ")));
            }
        }
        lines
    }
}
