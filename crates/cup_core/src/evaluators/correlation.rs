//! Rating-vs-placement agreement for one finished edition.

use super::stats::{correlation_p_value, mean, spearman_rho, std_dev};
use crate::models::{Roster, TeamId, TeamRating};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One team's final position (1 = best).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub team: String,
    pub position: usize,
}

impl Standing {
    /// Positions 1..=n for a ranking, best first.
    pub fn from_ranking(roster: &Roster, ranking: &[TeamId]) -> Vec<Standing> {
        ranking
            .iter()
            .enumerate()
            .map(|(idx, id)| Standing { team: roster.name(*id).to_string(), position: idx + 1 })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    /// Spearman rho between reversed placement and rating.
    pub correlation: f64,
    pub p_value: f64,
    pub team_count: usize,
    /// Largest |position − rating rank|.
    pub max_abs_diff: usize,
    pub mean_abs_diff: f64,
}

/// Aggregate over every report an evaluator has produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSummary {
    pub evaluations: usize,
    pub mean_correlation: f64,
    pub std_correlation: f64,
    pub min_correlation: f64,
    pub max_correlation: f64,
    pub mean_p_value: f64,
    pub mean_max_diff: f64,
    pub mean_avg_diff: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CorrelationEvaluator {
    history: Vec<CorrelationReport>,
}

impl CorrelationEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join standings with ratings by name; teams missing on either side are
    /// dropped.
    pub fn evaluate(
        &mut self,
        standings: &[Standing],
        ratings: &[TeamRating],
    ) -> CorrelationReport {
        let by_name: HashMap<&str, f64> =
            ratings.iter().map(|r| (r.name.as_str(), r.rating)).collect();
        let mut joined: Vec<(usize, f64)> = standings
            .iter()
            .filter_map(|s| by_name.get(s.team.as_str()).map(|&rating| (s.position, rating)))
            .collect();

        // Rating rank: 1 for the strongest; stable for equal ratings.
        joined.sort_by(|a, b| b.1.total_cmp(&a.1));
        let n = joined.len();

        let diffs: Vec<usize> = joined
            .iter()
            .enumerate()
            .map(|(idx, (position, _))| position.abs_diff(idx + 1))
            .collect();
        let reversed: Vec<f64> =
            joined.iter().map(|(position, _)| n as f64 - *position as f64 + 1.0).collect();
        let rating: Vec<f64> = joined.iter().map(|(_, r)| *r).collect();

        let correlation = spearman_rho(&reversed, &rating);
        let report = CorrelationReport {
            correlation,
            p_value: correlation_p_value(correlation, n),
            team_count: n,
            max_abs_diff: diffs.iter().copied().max().unwrap_or(0),
            mean_abs_diff: if n == 0 {
                f64::NAN
            } else {
                diffs.iter().sum::<usize>() as f64 / n as f64
            },
        };
        self.history.push(report);
        report
    }

    pub fn history(&self) -> &[CorrelationReport] {
        &self.history
    }

    /// `None` before the first evaluation.
    pub fn summary(&self) -> Option<CorrelationSummary> {
        if self.history.is_empty() {
            return None;
        }
        let pick =
            |f: fn(&CorrelationReport) -> f64| self.history.iter().map(f).collect::<Vec<f64>>();
        let correlations = pick(|r| r.correlation);

        Some(CorrelationSummary {
            evaluations: self.history.len(),
            mean_correlation: mean(&correlations),
            std_correlation: std_dev(&correlations, 0),
            min_correlation: correlations.iter().copied().fold(f64::INFINITY, f64::min),
            max_correlation: correlations.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean_p_value: mean(&pick(|r| r.p_value)),
            mean_max_diff: mean(&pick(|r| r.max_abs_diff as f64)),
            mean_avg_diff: mean(&pick(|r| r.mean_abs_diff)),
        })
    }
}
