//! # Evaluators
//!
//! Scores for a finished edition: how closely placement follows rating
//! ([`correlation`]) and how many group matches were dead rubbers
//! ([`incentive`]).

pub mod correlation;
pub mod incentive;
pub mod stats;

pub use correlation::{CorrelationEvaluator, CorrelationReport, CorrelationSummary, Standing};
pub use incentive::{EstimateKind, IncentiveEvaluator, IncentiveReport, QualificationStatus};
