//! Pipeline orchestration
//!
//! This module composes the four entry points into one evaluation:
//! telemetry summary, consistency check, score and benchmark. The combined
//! record is returned to the caller for persistence and notification.

use crate::benchmark::{BenchmarkConfig, BenchmarkEngine, BenchmarkResult, CohortRecord};
use crate::consistency::{ConsistencyChecker, ConsistencyReport};
use crate::error::ScoringError;
use crate::scoring::{ScoreResult, Scorer, ScoringConfig};
use crate::telemetry::{
    SessionSummarizer, SessionSummary, TelemetryAdapter, TelemetryConfig, TelemetrySession,
};
use crate::types::ResponseSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Configuration for every pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
    pub benchmark: BenchmarkConfig,
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, ScoringError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ScoringError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Combined result of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub session_id: String,
    pub evaluated_at: DateTime<Utc>,
    pub responses: ResponseSet,
    pub summary: SessionSummary,
    pub consistency: ConsistencyReport,
    pub score: ScoreResult,
    pub benchmark: BenchmarkResult,
}

/// One-shot evaluation request
#[derive(Debug, Deserialize)]
struct EvaluationRequest {
    #[serde(default)]
    config: PipelineConfig,
    #[serde(default)]
    responses: ResponseSet,
    /// Raw session envelope, see `TelemetryAdapter::parse_session`
    #[serde(default)]
    session: Option<Value>,
    #[serde(default)]
    cohort: Vec<CohortRecord>,
}

/// Configured pipeline. Construction validates all configuration; evaluation
/// never fails.
#[derive(Debug, Clone)]
pub struct AssessmentPipeline {
    summarizer: SessionSummarizer,
    checker: ConsistencyChecker,
    scorer: Scorer,
    benchmark: BenchmarkEngine,
}

impl AssessmentPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, ScoringError> {
        Ok(Self {
            summarizer: SessionSummarizer::new(config.telemetry)?,
            checker: ConsistencyChecker::new(),
            scorer: Scorer::new(config.scoring)?,
            benchmark: BenchmarkEngine::new(config.benchmark)?,
        })
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn summarizer(&self) -> &SessionSummarizer {
        &self.summarizer
    }

    /// Evaluate one submission.
    ///
    /// # Arguments
    /// * `responses` - The candidate's answer sheet
    /// * `session` - Telemetry recorded during the attempt (may be empty)
    /// * `cohort` - Snapshot of prior records for the same population segment
    pub fn evaluate(
        &self,
        responses: &ResponseSet,
        session: &TelemetrySession,
        cohort: &[CohortRecord],
    ) -> AssessmentRecord {
        // Stage 1: replay telemetry
        let summary = self.summarizer.summarize(session);
        self.evaluate_with_summary(responses, summary, cohort)
    }

    /// Evaluate with an already computed session summary
    pub fn evaluate_with_summary(
        &self,
        responses: &ResponseSet,
        summary: SessionSummary,
        cohort: &[CohortRecord],
    ) -> AssessmentRecord {
        // Stage 2: consistency and score, both from the same inputs
        let consistency = self.checker.check(responses);
        let score = self.scorer.score(responses, &summary);

        // Stage 3: place the final score in the cohort
        let benchmark = self.benchmark.benchmark(score.total_score, responses, cohort);

        debug!(
            session_id = %summary.session_id,
            total_score = score.total_score,
            consistency = consistency.score,
            percentile = benchmark.percentile,
            "evaluated submission"
        );

        AssessmentRecord {
            session_id: summary.session_id.clone(),
            evaluated_at: Utc::now(),
            responses: responses.clone(),
            summary,
            consistency,
            score,
            benchmark,
        }
    }
}

/// Evaluate a JSON request and return the record as JSON.
///
/// # Arguments
/// * `request_json` - `{ "config"?, "responses", "session"?, "cohort"? }`
///
/// # Returns
/// The serialized `AssessmentRecord`
///
/// # Example
/// ```ignore
/// let record_json = evaluate_json(r#"{"responses": {"work_style": "coach"}}"#)?;
/// ```
pub fn evaluate_json(request_json: &str) -> Result<String, ScoringError> {
    let request: EvaluationRequest = serde_json::from_str(request_json)
        .map_err(|e| ScoringError::ParseError(format!("Failed to parse request: {}", e)))?;

    let pipeline = AssessmentPipeline::new(request.config)?;
    let session = match request.session {
        Some(raw) => TelemetryAdapter::session_from_value(raw)?,
        None => TelemetrySession::new(),
    };

    let record = pipeline.evaluate(&request.responses, &session, &request.cohort);
    Ok(serde_json::to_string(&record)?)
}
