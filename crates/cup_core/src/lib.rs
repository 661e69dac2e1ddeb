//! # cup_core - Tournament Format Simulation
//!
//! Plays whole editions of a 48-team competition under a stochastic match
//! model and scores each edition, so that formats can be compared.
//!
//! ## Features
//! - Deterministic editions (same rng state = same edition)
//! - FIFA 2026 group stage + round-of-32 bracket, straight playoff, Swiss system
//! - Rating correlation and dead-rubber (low-incentive) evaluators
//! - Parallel Monte-Carlo batches with independent random streams

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluators;
pub mod formats;
pub mod models;

pub use batch::{run_batch, run_edition, summarize, EditionMetrics, FormatKind, FormatSummary};
pub use config::SimConfig;
pub use engine::{MatchEngine, PoissonMatchEngine, SimContext, SimRng};
pub use error::{Result, SimError};
pub use evaluators::{
    CorrelationEvaluator, CorrelationReport, EstimateKind, IncentiveEvaluator, IncentiveReport,
    Standing,
};
pub use formats::{
    Fifa2026GroupStage, Fifa2026Tournament, GroupStage, GroupStageFormat, KnockoutStage,
    PlayoffTournament,
    SwissTournament, TournamentFormat, TournamentShape,
};
pub use models::{MatchOutcome, MatchResult, Roster, Team, TeamId, TeamRating};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
