//! cupsim CLI
//!
//! Plays single editions of each format, or runs the Monte-Carlo comparison
//! and writes its reports.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "cupsim")]
#[command(about = "Compare tournament formats by simulation", long_about = None)]
struct Cli {
    /// Log every match (debug level)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Play one edition of every format and print tables and metrics
    Run {
        /// Ratings CSV (columns: Country, Rating)
        #[arg(long)]
        ratings: PathBuf,

        /// Seed for the edition streams
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// YAML configuration overriding the defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run many editions per format and write metrics and a summary
    Batch {
        /// Ratings CSV (columns: Country, Rating)
        #[arg(long)]
        ratings: PathBuf,

        /// Editions per format
        #[arg(long, default_value_t = 1000)]
        n: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output directory
        #[arg(long, default_value = "results")]
        out: PathBuf,

        /// YAML configuration overriding the defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Formats to run (default: all)
        #[arg(long = "format", value_parser = clap::value_parser!(cup_core::FormatKind))]
        formats: Vec<cup_core::FormatKind>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { ratings, seed, config } => {
            let ratings = cup_cli::load_ratings(&ratings)?;
            let config = load_config(config.as_deref())?;
            run_single(&ratings, &config, seed)?;
        }

        Commands::Batch { ratings, n, seed, out, config, formats } => {
            let table = cup_cli::load_ratings(&ratings)?;
            let config = load_config(config.as_deref())?;
            let kinds = if formats.is_empty() {
                cup_core::FormatKind::ALL.to_vec()
            } else {
                formats
            };

            println!(
                "Running {} editions of {} format(s) over {} teams...",
                n,
                kinds.len(),
                table.len()
            );
            let metrics = cup_core::run_batch(&kinds, &table, &config, n, seed)
                .map_err(cup_cli::simulation_error)?;
            let summaries = cup_core::summarize(&metrics);

            let metrics_path = out.join("batch_metrics.csv");
            cup_cli::write_metrics_csv(&metrics_path, &metrics)?;
            let summary_path = out.join("batch_summary.json");
            let summary =
                cup_cli::BatchSummaryFile::new(seed, n, table.len(), summaries.clone(), config);
            cup_cli::write_summary_json(&summary_path, &summary)?;

            println!("\n=== Monte-Carlo summary (mean ± SD) ===");
            print!("{}", cup_cli::render_summary_table(&summaries));
            println!("\nRaw data saved → {}", metrics_path.display());
            println!("Summary saved  → {}", summary_path.display());
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&Path>) -> Result<cup_core::SimConfig> {
    match path {
        Some(p) => cup_core::SimConfig::load(p)
            .with_context(|| format!("Failed to load config: {}", p.display())),
        None => Ok(cup_core::SimConfig::realistic()),
    }
}

#[cfg(feature = "cli")]
fn run_single(
    ratings: &[cup_core::TeamRating],
    config: &cup_core::SimConfig,
    seed: u64,
) -> Result<()> {
    use cup_core::batch::{build_format, edition_rng, score};
    use cup_core::{
        EditionMetrics, Fifa2026Tournament, FormatKind, GroupStageFormat, PoissonMatchEngine,
        TournamentFormat,
    };

    // The FIFA edition is built concretely so its tables can be printed.
    let mut fifa = Fifa2026Tournament::new(
        ratings,
        PoissonMatchEngine::new(config.match_engine.clone()),
        edition_rng(seed, FormatKind::Fifa2026, 0),
        &config.group_stage,
    )
    .map_err(cup_cli::simulation_error)?;
    fifa.run().map_err(cup_cli::simulation_error)?;
    tracing::debug!("{} scores nudged into their category", fifa.context().engine.nudged_matches());

    println!("=== FIFA 2026 group stage ===");
    print!("{}", fifa.group_stage().display_tables(fifa.roster()));
    if let Some(knockout) = fifa.knockout_stage() {
        println!("\n=== Final rankings (knock-out) ===");
        for line in knockout.summary_lines(fifa.roster()) {
            println!("{line}");
        }
    }

    println!("\n=== Metrics ===");
    let report = |kind: FormatKind, tournament: &dyn TournamentFormat| -> Result<()> {
        let (correlation, incentive) =
            score(tournament, ratings, config).map_err(cup_cli::simulation_error)?;
        let metrics = EditionMetrics::from_reports(kind, 0, &correlation, &incentive);
        println!("{}", cup_cli::render_edition_line(&metrics));
        Ok(())
    };

    report(FormatKind::Fifa2026, &fifa)?;
    for kind in [FormatKind::Playoff, FormatKind::Swiss] {
        let mut tournament = build_format(kind, ratings, config, edition_rng(seed, kind, 0))
            .map_err(cup_cli::simulation_error)?;
        tournament.run().map_err(cup_cli::simulation_error)?;
        report(kind, tournament.as_ref())?;
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("cupsim CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
