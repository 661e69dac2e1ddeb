//! Share of matches played when neither side had anything left to play for.

use crate::config::IncentiveConfig;
use crate::formats::{TournamentFormat, TournamentShape};
use crate::models::{MatchResult, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// How the low-incentive count was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstimateKind {
    /// Every group match replayed in order.
    Replayed,
    /// Group structure only: one dead match per group assumed.
    Heuristic,
    /// No group context; zero dead matches assumed.
    Assumed,
    /// Nothing usable was reported.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualificationStatus {
    Safe,
    Out,
    Live,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncentiveReport {
    pub format: String,
    pub total_matches: usize,
    pub low_incentive_matches: usize,
    /// 0–100; 0 when no matches were counted.
    pub low_incentive_pct: f64,
    pub estimate: EstimateKind,
}

#[derive(Debug, Clone, Default)]
pub struct IncentiveEvaluator {
    config: IncentiveConfig,
}

impl IncentiveEvaluator {
    pub fn new(config: IncentiveConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, tournament: &dyn TournamentFormat) -> IncentiveReport {
        let (low, total, estimate) = self.count(tournament.shape());
        let report = IncentiveReport {
            format: tournament.name(),
            total_matches: total,
            low_incentive_matches: low,
            low_incentive_pct: if total == 0 { 0.0 } else { 100.0 * low as f64 / total as f64 },
            estimate,
        };
        debug!(
            "{}: {}/{} low-incentive ({:?})",
            report.format, report.low_incentive_matches, report.total_matches, report.estimate
        );
        report
    }

    /// (low, total, kind) for one shape.
    pub fn count(&self, shape: TournamentShape<'_>) -> (usize, usize, EstimateKind) {
        match shape {
            TournamentShape::GroupBased { group_size, results } => {
                let (low, total) = self.replay_groups(group_size, results);
                (low, total, EstimateKind::Replayed)
            }
            TournamentShape::GroupStructure { group_count: 0, .. } => {
                (0, 0, EstimateKind::Unavailable)
            }
            TournamentShape::GroupStructure { group_count, group_size } => {
                let total = group_size * group_size.saturating_sub(1) / 2 * group_count;
                (group_count, total, EstimateKind::Heuristic)
            }
            TournamentShape::RoundBased(rounds) => {
                (0, rounds.iter().map(Vec::len).sum(), EstimateKind::Assumed)
            }
            TournamentShape::Unstructured { match_count } => {
                (0, match_count, EstimateKind::Unavailable)
            }
        }
    }

    fn replay_groups(
        &self,
        group_size: usize,
        results: &BTreeMap<char, Vec<MatchResult>>) -> (usize, usize,
    ) {
        let mut low = 0;
        let mut total = 0;
        for matches in results.values() {
            let mut points: HashMap<TeamId, u32> = HashMap::new();
            let mut played: HashMap<TeamId, usize> = HashMap::new();

            for m in matches {
                total += 1;
                let home = self.status(m.home, group_size, &points, &played);
                let away = self.status(m.away, group_size, &points, &played);
                if home == away && home != QualificationStatus::Live {
                    low += 1;
                }

                let (hp, ap) = match m.home_goals.cmp(&m.away_goals) {
                    std::cmp::Ordering::Greater => (3, 0),
                    std::cmp::Ordering::Less => (0, 3),
                    std::cmp::Ordering::Equal => (1, 1),
                };
                *points.entry(m.home).or_default() += hp;
                *points.entry(m.away).or_default() += ap;
                *played.entry(m.home).or_default() += 1;
                *played.entry(m.away).or_default() += 1;
            }
        }
        (low, total)
    }

    fn status(
        &self,
        team: TeamId,
        group_size: usize,
        points: &HashMap<TeamId, u32>,
        played: &HashMap<TeamId, usize>,
    ) -> QualificationStatus {
        let pts = points.get(&team).copied().unwrap_or(0);
        let played = played.get(&team).copied().unwrap_or(0);
        let left = group_size.saturating_sub(1).saturating_sub(played);
        if pts >= self.config.safe_points {
            QualificationStatus::Safe
        } else if pts + 3 * (left as u32) < self.config.qualify_points {
            QualificationStatus::Out
        } else {
            QualificationStatus::Live
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(home: usize, away: usize, hg: u32, ag: u32) -> MatchResult {
        let winner = match hg.cmp(&ag) {
            std::cmp::Ordering::Greater => Some(TeamId(home)),
            std::cmp::Ordering::Less => Some(TeamId(away)),
            std::cmp::Ordering::Equal => None,
        };
        MatchResult {
            home: TeamId(home),
            away: TeamId(away),
            home_goals: hg,
            away_goals: ag,
            winner,
            penalties: false,
        }
    }

    /// Round robin in draw order where the lower index always wins.
    fn chalk_group(offset: usize) -> Vec<MatchResult> {
        let mut matches = Vec::new();
        for i in 0..4 {
            for j in (i + 1)..4 {
                matches.push(result(offset + i, offset + j, 1, 0));
            }
        }
        matches
    }

    #[test]
    fn test_replay_flags_safe_and_out_pairs() {
        // Order: 0-1, 0-2, 0-3, 1-2, 1-3, 2-3.
        // Before 0-3 team 0 is safe but team 3 is live. Before 2-3 both
        // have 0 points and one match left, 3 < 4, so both are out.
        let mut results = BTreeMap::new();
        results.insert('A', chalk_group(0));
        let eval = IncentiveEvaluator::default();
        let (low, total, kind) =
            eval.count(TournamentShape::GroupBased { group_size: 4, results: &results });
        assert_eq!((low, total, kind), (1, 6, EstimateKind::Replayed));
    }

    #[test]
    fn test_both_safe_counts_as_low() {
        let mut results = BTreeMap::new();
        // Teams 0 and 1 each beat 2 and 3 first, then meet on six points.
        results.insert(
            'A',
            vec![
                result(0, 2, 2, 0),
                result(1, 3, 2, 0),
                result(0, 3, 1, 0),
                result(1, 2, 1, 0),
                result(0, 1, 0, 0),
                result(2, 3, 1, 1),
            ],
        );
        let eval = IncentiveEvaluator::default();
        let (low, total, _) =
            eval.count(TournamentShape::GroupBased { group_size: 4, results: &results });
        // 0-1 is safe/safe; 2-3 is out/out.
        assert_eq!((low, total), (2, 6));
    }

    #[test]
    fn test_heuristic_and_fallbacks() {
        let eval = IncentiveEvaluator::default();
        assert_eq!(
            eval.count(TournamentShape::GroupStructure { group_count: 12, group_size: 4 }),
            (12, 72, EstimateKind::Heuristic)
        );
        assert_eq!(
            eval.count(TournamentShape::GroupStructure { group_count: 0, group_size: 4 }),
            (0, 0, EstimateKind::Unavailable)
        );
        let rounds = vec![chalk_group(0), chalk_group(4)];
        assert_eq!(
            eval.count(TournamentShape::RoundBased(&rounds)),
            (0, 12, EstimateKind::Assumed)
        );
        assert_eq!(
            eval.count(TournamentShape::Unstructured { match_count: 31 }),
            (0, 31, EstimateKind::Unavailable)
        );
    }

    #[test]
    fn test_thresholds_come_from_config() {
        let mut results = BTreeMap::new();
        results.insert('A', chalk_group(0));
        // Nobody is ever safe and nobody is ever out.
        let eval = IncentiveEvaluator::new(IncentiveConfig { safe_points: 100, qualify_points: 0 });
        let (low, _, _) =
            eval.count(TournamentShape::GroupBased { group_size: 4, results: &results });
        assert_eq!(low, 0);
    }
}
