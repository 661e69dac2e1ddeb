//! # Batch Runs
//!
//! Monte-Carlo comparison of formats: many independent editions per format,
//! each scored by both evaluators, then aggregated per format.
//!
//! Every edition draws from its own ChaCha stream (same seed, stream id from
//! format and edition index), so a batch is reproducible whatever the thread
//! count.

use crate::config::SimConfig;
use crate::engine::{PoissonMatchEngine, SimRng};
use crate::error::{Result, SimError};
use crate::evaluators::stats::{mean, std_dev};
use crate::evaluators::{
    CorrelationEvaluator, CorrelationReport, EstimateKind, IncentiveEvaluator, IncentiveReport,
    Standing,
};
use crate::formats::{Fifa2026Tournament, PlayoffTournament, SwissTournament, TournamentFormat};
use crate::models::TeamRating;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatKind {
    Fifa2026,
    Playoff,
    Swiss,
}

impl FormatKind {
    pub const ALL: [FormatKind; 3] = [FormatKind::Fifa2026, FormatKind::Playoff, FormatKind::Swiss];

    /// Label used in metrics files.
    pub fn label(&self) -> &'static str {
        match self {
            FormatKind::Fifa2026 => "FIFA2026",
            FormatKind::Playoff => "Playoff",
            FormatKind::Swiss => "Swiss8R",
        }
    }

    fn stream_base(&self) -> u64 {
        match self {
            FormatKind::Fifa2026 => 0,
            FormatKind::Playoff => 1,
            FormatKind::Swiss => 2,
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FormatKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fifa2026" | "fifa" => Ok(FormatKind::Fifa2026),
            "playoff" => Ok(FormatKind::Playoff),
            "swiss" | "swiss8r" => Ok(FormatKind::Swiss),
            other => Err(SimError::InvalidConfig(format!("unknown format '{other}'"))),
        }
    }
}

/// Scores of one edition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionMetrics {
    pub format: String,
    pub edition: usize,
    pub correlation: f64,
    pub p_value: f64,
    pub mean_abs_diff: f64,
    pub max_abs_diff: usize,
    pub dead_pct: f64,
    pub dead_estimate: EstimateKind,
}

impl EditionMetrics {
    pub fn from_reports(
        kind: FormatKind,
        edition: usize,
        correlation: &CorrelationReport,
        incentive: &IncentiveReport,
    ) -> Self {
        Self {
            format: kind.label().to_string(),
            edition,
            correlation: correlation.correlation,
            p_value: correlation.p_value,
            mean_abs_diff: correlation.mean_abs_diff,
            max_abs_diff: correlation.max_abs_diff,
            dead_pct: incentive.low_incentive_pct,
            dead_estimate: incentive.estimate,
        }
    }
}

/// Mean and sample standard deviation per metric, for one format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatSummary {
    pub format: String,
    pub editions: usize,
    pub rho_mean: f64,
    pub rho_std: f64,
    pub err_mean: f64,
    pub err_std: f64,
    pub dead_mean: f64,
    pub dead_std: f64,
}

/// A ready-to-run driver for `kind`, using the default match engine.
pub fn build_format(
    kind: FormatKind,
    ratings: &[TeamRating],
    config: &SimConfig,
    rng: SimRng,
) -> Result<Box<dyn TournamentFormat>> {
    let engine = PoissonMatchEngine::new(config.match_engine.clone());
    let tournament: Box<dyn TournamentFormat> = match kind {
        FormatKind::Fifa2026 => {
            Box::new(Fifa2026Tournament::new(ratings, engine, rng, &config.group_stage)?)
        }
        FormatKind::Playoff => {
            Box::new(PlayoffTournament::new(ratings, engine, rng, &config.playoff)?)
        }
        FormatKind::Swiss => Box::new(SwissTournament::new(ratings, engine, rng, &config.swiss)?),
    };
    Ok(tournament)
}

/// Score an already-run tournament.
pub fn score(
    tournament: &dyn TournamentFormat,
    ratings: &[TeamRating],
    config: &SimConfig,
) -> Result<(CorrelationReport, IncentiveReport)> {
    let ranking = tournament.rankings()?;
    let standings = Standing::from_ranking(tournament.roster(), &ranking);
    let correlation = CorrelationEvaluator::new().evaluate(&standings, ratings);
    let incentive = IncentiveEvaluator::new(config.incentive.clone()).evaluate(tournament);
    Ok((correlation, incentive))
}

/// Play and score one edition.
pub fn run_edition(
    kind: FormatKind,
    ratings: &[TeamRating],
    config: &SimConfig,
    edition: usize,
    rng: SimRng,
) -> Result<EditionMetrics> {
    let mut tournament = build_format(kind, ratings, config, rng)?;
    tournament.run()?;
    let (correlation, incentive) = score(tournament.as_ref(), ratings, config)?;
    Ok(EditionMetrics::from_reports(kind, edition, &correlation, &incentive))
}

/// Random stream for one edition of one format.
pub fn edition_rng(seed: u64, kind: FormatKind, edition: usize) -> SimRng {
    let mut rng = SimRng::seed_from_u64(seed);
    rng.set_stream((kind.stream_base() << 32) | edition as u64);
    rng
}

/// `editions` runs of every format in `kinds`, in parallel. Results come back
/// grouped by format, then by edition index.
pub fn run_batch(
    kinds: &[FormatKind],
    ratings: &[TeamRating],
    config: &SimConfig,
    editions: usize,
    seed: u64,
) -> Result<Vec<EditionMetrics>> {
    config.validate()?;
    let mut all = Vec::with_capacity(kinds.len() * editions);
    for &kind in kinds {
        info!("running {editions} editions of {kind}");
        let metrics: Vec<EditionMetrics> = (0..editions)
            .into_par_iter()
            .map(|edition| {
                let rng = edition_rng(seed, kind, edition);
                run_edition(kind, ratings, config, edition, rng)
            })
            .collect::<Result<_>>()?;
        all.extend(metrics);
    }
    Ok(all)
}

/// Per-format aggregates, in first-seen order. NaN metrics are skipped.
pub fn summarize(metrics: &[EditionMetrics]) -> Vec<FormatSummary> {
    let mut order: Vec<&str> = Vec::new();
    for m in metrics {
        if !order.contains(&m.format.as_str()) {
            order.push(&m.format);
        }
    }

    order
        .into_iter()
        .map(|format| {
            let rows: Vec<&EditionMetrics> =
                metrics.iter().filter(|m| m.format == format).collect();
            let column = |f: fn(&EditionMetrics) -> f64| {
                rows.iter().map(|&m| f(m)).filter(|v| !v.is_nan()).collect::<Vec<f64>>()
            };
            let (rho, err, dead) =
                (column(|m| m.correlation), column(|m| m.mean_abs_diff), column(|m| m.dead_pct));
            FormatSummary {
                format: format.to_string(),
                editions: rows.len(),
                rho_mean: mean(&rho),
                rho_std: std_dev(&rho, 1),
                err_mean: mean(&err),
                err_std: std_dev(&err, 1),
                dead_mean: mean(&dead),
                dead_std: std_dev(&dead, 1),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings() -> Vec<TeamRating> {
        (0..48).map(|i| TeamRating::new(format!("R{i:02}"), 2050.0 - 11.0 * i as f64)).collect()
    }

    #[test]
    fn test_format_kind_parsing() {
        assert_eq!("FIFA2026".parse::<FormatKind>().unwrap(), FormatKind::Fifa2026);
        assert_eq!("swiss".parse::<FormatKind>().unwrap(), FormatKind::Swiss);
        assert_eq!("Playoff".parse::<FormatKind>().unwrap(), FormatKind::Playoff);
        assert!("league".parse::<FormatKind>().is_err());
        assert_eq!(FormatKind::Swiss.to_string(), "Swiss8R");
    }

    #[test]
    fn test_edition_streams_differ() {
        use rand::Rng;
        let mut a = edition_rng(7, FormatKind::Playoff, 0);
        let mut b = edition_rng(7, FormatKind::Playoff, 1);
        let mut c = edition_rng(7, FormatKind::Swiss, 0);
        let (x, y, z): (u64, u64, u64) = (a.gen(), b.gen(), c.gen());
        assert_ne!(x, y);
        assert_ne!(x, z);
    }

    #[test]
    fn test_run_edition_scores_every_format() {
        let config = SimConfig::default();
        for kind in FormatKind::ALL {
            let m = run_edition(kind, &ratings(), &config, 0, edition_rng(1, kind, 0)).unwrap();
            assert_eq!(m.format, kind.label());
            assert!(m.correlation > 0.0, "{kind}: rho {}", m.correlation);
            match kind {
                FormatKind::Fifa2026 => assert_eq!(m.dead_estimate, EstimateKind::Replayed),
                FormatKind::Playoff => {
                    assert_eq!(m.dead_estimate, EstimateKind::Unavailable);
                    assert_eq!(m.dead_pct, 0.0);
                }
                FormatKind::Swiss => assert_eq!(m.dead_estimate, EstimateKind::Assumed),
            }
        }
    }

    #[test]
    fn test_batch_is_reproducible() {
        let config = SimConfig::default();
        let kinds = [FormatKind::Playoff, FormatKind::Swiss];
        let first = run_batch(&kinds, &ratings(), &config, 4, 99).unwrap();
        let second = run_batch(&kinds, &ratings(), &config, 4, 99).unwrap();
        assert_eq!(first.len(), 8);
        assert_eq!(first, second);
        assert_eq!(first[0].format, "Playoff");
        assert_eq!(first[4].format, "Swiss8R");
        assert_eq!(first[3].edition, 3);
    }

    #[test]
    fn test_batch_rejects_invalid_config() {
        let mut config = SimConfig::default();
        config.swiss.rounds = 0;
        assert!(run_batch(&[FormatKind::Swiss], &ratings(), &config, 1, 0).is_err());
    }

    #[test]
    fn test_summarize_uses_sample_std() {
        let row = |format: &str, rho: f64, err: f64, dead: f64| EditionMetrics {
            format: format.to_string(),
            edition: 0,
            correlation: rho,
            p_value: 0.0,
            mean_abs_diff: err,
            max_abs_diff: 0,
            dead_pct: dead,
            dead_estimate: EstimateKind::Replayed,
        };
        let metrics = vec![
            row("A", 0.5, 2.0, 10.0),
            row("B", 0.9, 1.0, 0.0),
            row("A", 0.7, 4.0, 20.0),
            row("A", f64::NAN, 3.0, 30.0),
        ];
        let summary = summarize(&metrics);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].format, "A");
        assert_eq!(summary[0].editions, 3);
        assert!((summary[0].rho_mean - 0.6).abs() < 1e-12);
        assert!((summary[0].rho_std - 0.02f64.sqrt()).abs() < 1e-12);
        assert!((summary[0].err_mean - 3.0).abs() < 1e-12);
        assert!((summary[0].dead_std - 10.0).abs() < 1e-12);
        assert!(summary[1].rho_std.is_nan());
    }
}
