//! Multi-dimensional scorer
//!
//! Configuration is resolved once in `Scorer::new`; after that `score` is a
//! total, pure function of its inputs.

use crate::error::ScoringError;
use crate::scoring::algorithms::{self, Algorithm, ScoringInput};
use crate::scoring::config::{ScoringConfig, Tier, TierTable};
use crate::scoring::insights::{generate_insights, Insight, Recommendation};
use crate::telemetry::SessionSummary;
use crate::types::ResponseSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound of the behavioral multiplier
pub const MAX_BEHAVIORAL_MULTIPLIER: f64 = 1.2;
/// Bonus per satisfied engagement condition
pub const MULTIPLIER_STEP: f64 = 0.05;
/// Starting pipeline confidence
pub const BASE_CONFIDENCE: u8 = 70;

/// Score for one dimension and the weight it carried
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: String,
    /// 0-100
    pub score: f64,
    pub weight: f64,
}

/// Result of scoring one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub algorithm: String,
    /// 0-100
    pub total_score: u8,
    /// Weighted sum before the behavioral multiplier
    pub weighted_score: f64,
    /// In algorithm order
    pub dimension_scores: Vec<DimensionScore>,
    /// 1.0-1.2
    pub behavioral_multiplier: f64,
    /// Pipeline confidence in this result (0-100)
    pub confidence: u8,
    pub tier: Tier,
    /// 0 for the lowest tier of the table
    pub tier_rank: usize,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
}

impl ScoreResult {
    pub fn dimension(&self, name: &str) -> Option<f64> {
        self.dimension_scores
            .iter()
            .find(|d| d.dimension == name)
            .map(|d| d.score)
    }
}

/// Scorer bound to one resolved configuration
#[derive(Debug, Clone)]
pub struct Scorer {
    config: ScoringConfig,
    algorithm: &'static Algorithm,
    /// Aligned with `algorithm.dimensions`
    weights: Vec<f64>,
    tiers: TierTable,
}

impl Scorer {
    /// Resolve and validate a configuration
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        let algorithm = algorithms::lookup(&config.algorithm)?;

        for (name, weight) in &config.weights {
            if algorithm.dimension(name).is_none() {
                return Err(ScoringError::InvalidWeight(format!(
                    "{} does not define dimension {}",
                    algorithm.name, name
                )));
            }
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ScoringError::InvalidWeight(format!(
                    "{} has weight {}",
                    name, weight
                )));
            }
        }

        let weights = algorithm
            .dimensions
            .iter()
            .map(|d| config.weights.get(d.name).copied().unwrap_or(d.default_weight))
            .collect();
        let tiers = config.tier_table()?;

        debug!(
            algorithm = algorithm.name,
            overrides = config.weights.len(),
            tiers = tiers.tiers().len(),
            "scorer configured"
        );

        Ok(Self {
            config,
            algorithm,
            weights,
            tiers,
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn algorithm(&self) -> &'static Algorithm {
        self.algorithm
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// Score one submission. Sparse responses and empty telemetry still
    /// produce a best-effort result.
    pub fn score(&self, responses: &ResponseSet, summary: &SessionSummary) -> ScoreResult {
        let input = ScoringInput {
            responses,
            summary,
            config: &self.config,
        };

        let dimension_scores: Vec<DimensionScore> = self
            .algorithm
            .dimensions
            .iter()
            .zip(&self.weights)
            .map(|(dimension, weight)| DimensionScore {
                dimension: dimension.name.to_string(),
                score: algorithms::bounded((dimension.calculate)(&input)),
                weight: *weight,
            })
            .collect();

        let weighted_score: f64 = dimension_scores.iter().map(|d| d.score * d.weight).sum();
        let behavioral_multiplier = behavioral_multiplier(summary);
        let total_score = (weighted_score * behavioral_multiplier)
            .round()
            .clamp(0.0, 100.0) as u8;

        let confidence = pipeline_confidence(summary);
        let tier = self.tiers.select(total_score).clone();
        let tier_rank = self.tiers.rank(total_score);

        let insights = generate_insights(total_score, &dimension_scores, summary);
        let recommendations = (self.algorithm.recommend)(total_score, &dimension_scores);

        debug!(
            algorithm = self.algorithm.name,
            total_score,
            multiplier = behavioral_multiplier,
            tier = %tier.name,
            "scored submission"
        );

        ScoreResult {
            algorithm: self.algorithm.name.to_string(),
            total_score,
            weighted_score,
            dimension_scores,
            behavioral_multiplier,
            confidence,
            tier,
            tier_rank,
            insights,
            recommendations,
        }
    }
}

/// Behavioral multiplier
///
/// One step per satisfied condition, capped at 1.2:
/// - mean response time between 3 s and 15 s (engaged, not rushed)
/// - fewer than 2 hesitations
/// - completion above 90%
/// - no rapid-click episodes
///
/// Hesitation and rapid-click credit requires recorded telemetry.
pub fn behavioral_multiplier(summary: &SessionSummary) -> f64 {
    let telemetry = summary.has_telemetry();
    let conditions = [
        summary.average_response_time_ms > 3_000.0 && summary.average_response_time_ms < 15_000.0,
        telemetry && summary.hesitation_count < 2,
        summary.completion_rate > 90.0,
        telemetry && summary.anomalies.rapid_clicking == 0,
    ];
    let satisfied = conditions.iter().filter(|c| **c).count();
    (1.0 + MULTIPLIER_STEP * satisfied as f64).min(MAX_BEHAVIORAL_MULTIPLIER)
}

/// Pipeline confidence: data completeness, answer stability and engagement
pub fn pipeline_confidence(summary: &SessionSummary) -> u8 {
    let mut confidence = BASE_CONFIDENCE;
    if summary.completion_rate > 95.0 {
        confidence += 10;
    } else if summary.completion_rate > 80.0 {
        confidence += 5;
    }
    if summary.has_telemetry() && summary.correction_count < 2 {
        confidence += 10;
    }
    if summary.engagement_score > 80.0 {
        confidence += 10;
    }
    confidence.min(100)
}
