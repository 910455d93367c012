//! Error types for Candidate Intel
//!
//! Data-quality problems (unknown events, sparse responses, empty cohorts) are
//! absorbed by neutral defaults and never reach this type. What remains are
//! configuration mistakes and malformed JSON at the outer entry points.

use thiserror::Error;

/// Errors that can occur while configuring or feeding the pipeline
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Unknown scoring algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Invalid tier table: {0}")]
    InvalidTierTable(String),

    #[error("Invalid dimension weight: {0}")]
    InvalidWeight(String),

    #[error("Invalid benchmark configuration: {0}")]
    InvalidBenchmarkConfig(String),

    #[error("Invalid telemetry configuration: {0}")]
    InvalidTelemetryConfig(String),

    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ScoringError {
    /// True for errors that indicate a deployment or configuration bug
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ScoringError::UnknownAlgorithm(_)
                | ScoringError::InvalidTierTable(_)
                | ScoringError::InvalidWeight(_)
                | ScoringError::InvalidBenchmarkConfig(_)
                | ScoringError::InvalidTelemetryConfig(_)
        )
    }
}
