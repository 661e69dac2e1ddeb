//! cupsim support library
//!
//! Ratings CSV → `TeamRating` table, and the batch report writers
//! (per-edition metrics CSV, JSON summary, plain-text table).

use anyhow::{bail, Context, Result};
use cup_core::{EditionMetrics, FormatSummary, SimConfig, SimError, TeamRating};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::warn;

/// One row of the ratings table (`Country,Rating`).
#[derive(Debug, Clone, Deserialize)]
struct RatingRow {
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Rating")]
    rating: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub failed: u32,
}

/// Ratings from a CSV with `Country` and `Rating` columns; other columns are
/// ignored.
pub fn load_ratings(csv_path: &Path) -> Result<Vec<TeamRating>> {
    load_ratings_with_stats(csv_path).map(|(ratings, _)| ratings)
}

/// Like [`load_ratings`], also reporting skipped rows. Malformed rows are
/// skipped with a warning; an empty result is an error.
pub fn load_ratings_with_stats(csv_path: &Path) -> Result<(Vec<TeamRating>, LoadStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open ratings CSV: {}", csv_path.display()))?;

    let mut ratings = Vec::new();
    let mut stats = LoadStats::default();
    for (line, row) in reader.deserialize::<RatingRow>().enumerate() {
        stats.total_rows += 1;
        match row {
            Ok(row) if row.rating.is_finite() && !row.country.is_empty() => {
                ratings.push(TeamRating::new(row.country, row.rating));
                stats.parsed += 1;
            }
            Ok(row) => {
                stats.failed += 1;
                warn!("Line {} - invalid rating row for '{}'", line + 2, row.country);
            }
            Err(e) => {
                stats.failed += 1;
                warn!("Line {} - {}", line + 2, e);
            }
        }
    }

    if ratings.is_empty() {
        bail!("No usable ratings in {}", csv_path.display());
    }
    Ok((ratings, stats))
}

/// Wrap a simulation error for the CLI. Recoverable errors (bad input or
/// configuration) get a hint pointing back at the inputs.
pub fn simulation_error(err: SimError) -> anyhow::Error {
    if err.is_recoverable() {
        anyhow::Error::new(err)
            .context("Simulation input rejected; check the ratings file and --config")
    } else {
        anyhow::Error::new(err).context("Simulation failed")
    }
}

/// One row per edition.
pub fn write_metrics_csv(path: &Path, metrics: &[EditionMetrics]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create metrics CSV: {}", path.display()))?;
    for row in metrics {
        writer.serialize(row).context("Failed to write metrics row")?;
    }
    writer.flush().with_context(|| format!("Failed to flush metrics CSV: {}", path.display()))?;
    Ok(())
}

/// Summary of a whole batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummaryFile {
    /// Creation time (RFC3339)
    pub created_at: String,
    pub seed: u64,
    pub editions: usize,
    pub teams: usize,
    pub formats: Vec<FormatSummary>,
    pub config: SimConfig,
}

impl BatchSummaryFile {
    pub fn new(
        seed: u64,
        editions: usize,
        teams: usize,
        formats: Vec<FormatSummary>,
        config: SimConfig,
    ) -> Self {
        Self {
            created_at: chrono::Utc::now().to_rfc3339(),
            seed,
            editions,
            teams,
            formats,
            config,
        }
    }
}

pub fn write_summary_json(path: &Path, summary: &BatchSummaryFile) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize batch summary")?;
    fs::write(path, json).with_context(|| format!("Failed to write summary: {}", path.display()))?;
    Ok(())
}

/// Markdown-style table: mean ± sample SD per metric and format.
pub fn render_summary_table(summaries: &[FormatSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "| {:<10} | {:>8} | {:>7} | {:>7} | {:>7} | {:>7} | {:>8} | {:>8} |",
        "format", "editions", "rho", "rho sd", "err", "err sd", "dead %", "dead sd"
    );
    let _ = writeln!(
        out,
        "|{:-<12}|{:->10}|{:->9}|{:->9}|{:->9}|{:->9}|{:->10}|{:->10}|",
        "", "", "", "", "", "", "", ""
    );
    for s in summaries {
        let _ = writeln!(
            out,
            "| {:<10} | {:>8} | {:>7.3} | {:>7.3} | {:>7.3} | {:>7.3} | {:>8.3} | {:>8.3} |",
            s.format,
            s.editions,
            s.rho_mean,
            s.rho_std,
            s.err_mean,
            s.err_std,
            s.dead_mean,
            s.dead_std
        );
    }
    out
}

/// One-line report for a single edition.
pub fn render_edition_line(m: &EditionMetrics) -> String {
    format!(
        "{:<10} rho {:>6.3} (p {:.2e}) | mean |Δrank| {:>5.2} | max {:>2} | dead {:>5.1}% ({:?})",
        m.format,
        m.correlation,
        m.p_value,
        m.mean_abs_diff,
        m.max_abs_diff,
        m.dead_pct,
        m.dead_estimate
    )
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    Ok(())
}
