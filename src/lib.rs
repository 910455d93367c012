//! Candidate Intel - Scoring pipeline for assessment responses and interaction telemetry
//!
//! A submission is a response set plus the telemetry captured while it was
//! answered. Intel turns it into a combined record through four deterministic
//! stages: telemetry summary → consistency check → multi-dimensional score
//! → cohort benchmark.
//!
//! ## Modules
//!
//! - **Telemetry**: Replay interaction events into behavioral signals
//! - **Consistency**: Detect contradictory or idealized answer combinations
//! - **Scoring**: Weighted dimensions, behavioral multiplier and tier assignment
//! - **Benchmark**: Percentile, distribution and top-performer similarity

pub mod benchmark;
pub mod consistency;
pub mod error;
pub mod pipeline;
pub mod scoring;
pub mod telemetry;
pub mod types;

pub use benchmark::{BenchmarkConfig, BenchmarkEngine, BenchmarkResult, CohortRecord};
pub use consistency::{ConsistencyChecker, ConsistencyReport, Integrity};
pub use error::ScoringError;
pub use pipeline::{evaluate_json, AssessmentPipeline, AssessmentRecord, PipelineConfig};
pub use scoring::{ScoreResult, Scorer, ScoringConfig, Tier, TierTable};
pub use telemetry::{SessionSummary, TelemetryAdapter, TelemetryEvent, TelemetrySession};
pub use types::{ResponseSet, Severity};

/// Crate version, reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Summarize a telemetry session with default thresholds.
///
/// Never fails; an empty session yields the neutral summary.
pub fn summarize_session(session: &TelemetrySession) -> SessionSummary {
    session.summarize()
}

/// Check a response set against the built-in consistency rules
pub fn check_consistency(responses: &ResponseSet) -> ConsistencyReport {
    ConsistencyChecker::new().check(responses)
}

/// Score a submission.
///
/// # Arguments
/// * `responses` - The candidate's answers
/// * `summary` - Output of `summarize_session`
/// * `config` - Algorithm, weight overrides and tier table
///
/// # Returns
/// The score, or a configuration error when `config` is invalid
///
/// # Example
/// ```ignore
/// let summary = summarize_session(&session);
/// let result = score(&responses, &summary, &ScoringConfig::default())?;
/// println!("{} ({})", result.total_score, result.tier.name);
/// ```
pub fn score(
    responses: &ResponseSet,
    summary: &SessionSummary,
    config: &ScoringConfig,
) -> Result<ScoreResult, ScoringError> {
    Ok(Scorer::new(config.clone())?.score(responses, summary))
}

/// Benchmark a final score against a cohort snapshot with default settings
pub fn benchmark(
    total_score: u8,
    responses: &ResponseSet,
    cohort: &[CohortRecord],
) -> BenchmarkResult {
    BenchmarkEngine::default().benchmark(total_score, responses, cohort)
}
