//! Cohort benchmarking
//!
//! Places a score within a cohort of prior records: percentile rank, score
//! histogram, and similarity to the cohort's top performers. The cohort is a
//! point-in-time snapshot handed in by the caller; nothing here reads storage.

use crate::error::ScoringError;
use crate::types::{display_value, ResponseSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One prior scored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortRecord {
    pub score: f64,
    #[serde(default)]
    pub responses: ResponseSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

impl CohortRecord {
    pub fn new(score: f64, responses: ResponseSet) -> Self {
        Self {
            score,
            responses,
            tier: None,
        }
    }
}

/// Largest accepted bucket count: one bucket per score point
pub const MAX_BUCKETS: usize = 100;

/// Benchmark configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Number of equal-width histogram buckets over [0, 100]
    pub buckets: usize,
    /// Cohort quantile at or above which a record is a top performer
    pub top_quantile: f64,
    /// Share of top performers that must share a value for it to be a trait
    pub common_trait_share: f64,
    /// Best-match similarity above which the candidate is "very similar"
    pub strong_match: f64,
    /// Best-match similarity above which the candidate is "moderately similar"
    pub moderate_match: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            buckets: 10,
            top_quantile: 0.9,
            common_trait_share: 0.6,
            strong_match: 80.0,
            moderate_match: 60.0,
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.buckets == 0 || self.buckets > MAX_BUCKETS {
            return Err(ScoringError::InvalidBenchmarkConfig(format!(
                "bucket count {} outside 1-{}",
                self.buckets, MAX_BUCKETS
            )));
        }
        if !(0.0..=1.0).contains(&self.top_quantile) {
            return Err(ScoringError::InvalidBenchmarkConfig(format!(
                "top quantile {} outside 0-1",
                self.top_quantile
            )));
        }
        if !(0.0..=1.0).contains(&self.common_trait_share) {
            return Err(ScoringError::InvalidBenchmarkConfig(format!(
                "common trait share {} outside 0-1",
                self.common_trait_share
            )));
        }
        Ok(())
    }
}

/// One histogram bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// 1-based bucket index
    pub bucket: usize,
    pub range_start: f64,
    pub range_end: f64,
    pub count: usize,
    pub avg_score: f64,
}

/// Best-matching top performer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosestMatch {
    /// 0-100
    pub similarity: f64,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformerSimilarity {
    pub closest_match: Option<ClosestMatch>,
    pub average_similarity: f64,
    pub insights: Vec<String>,
}

impl TopPerformerSimilarity {
    fn none() -> Self {
        Self {
            closest_match: None,
            average_similarity: 0.0,
            insights: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Share of the cohort strictly below the score (0-100)
    pub percentile: u8,
    /// Non-empty buckets in ascending order
    pub distribution: Vec<Bucket>,
    pub top_performer_similarity: TopPerformerSimilarity,
}

/// Cohort benchmark engine
#[derive(Debug, Clone, Default)]
pub struct BenchmarkEngine {
    config: BenchmarkConfig,
}

impl BenchmarkEngine {
    pub fn new(config: BenchmarkConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Benchmark a score against a cohort. An empty cohort yields percentile
    /// 0, no buckets and no match.
    pub fn benchmark(
        &self,
        total_score: u8,
        responses: &ResponseSet,
        cohort: &[CohortRecord],
    ) -> BenchmarkResult {
        let valid: Vec<&CohortRecord> = cohort.iter().filter(|r| r.score.is_finite()).collect();
        if valid.len() < cohort.len() {
            debug!(
                dropped = cohort.len() - valid.len(),
                "ignoring cohort records without a finite score"
            );
        }

        let result = BenchmarkResult {
            percentile: percentile(total_score as f64, &valid),
            distribution: self.distribution(&valid),
            top_performer_similarity: self.top_performer_similarity(responses, &valid),
        };

        debug!(
            cohort = valid.len(),
            percentile = result.percentile,
            buckets = result.distribution.len(),
            "benchmarked score"
        );
        result
    }

    fn distribution(&self, cohort: &[&CohortRecord]) -> Vec<Bucket> {
        let buckets = self.config.buckets;
        let width = 100.0 / buckets as f64;
        let mut sums = vec![(0usize, 0.0f64); buckets];

        for record in cohort {
            let clamped = record.score.clamp(0.0, 100.0);
            let index = ((clamped / width).floor() as usize).min(buckets - 1);
            sums[index].0 += 1;
            sums[index].1 += record.score;
        }

        sums.into_iter()
            .enumerate()
            .filter(|(_, (count, _))| *count > 0)
            .map(|(i, (count, sum))| Bucket {
                bucket: i + 1,
                range_start: i as f64 * width,
                range_end: (i + 1) as f64 * width,
                count,
                avg_score: sum / count as f64,
            })
            .collect()
    }

    fn top_performer_similarity(
        &self,
        responses: &ResponseSet,
        cohort: &[&CohortRecord],
    ) -> TopPerformerSimilarity {
        let scores: Vec<f64> = cohort.iter().map(|r| r.score).collect();
        let threshold = match quantile(&scores, self.config.top_quantile) {
            Some(t) => t,
            None => return TopPerformerSimilarity::none(),
        };
        let top: Vec<&CohortRecord> = cohort
            .iter()
            .copied()
            .filter(|r| r.score >= threshold)
            .collect();
        if top.is_empty() {
            return TopPerformerSimilarity::none();
        }

        let mut ranked: Vec<(f64, &CohortRecord)> = top
            .iter()
            .map(|r| (similarity(responses, &r.responses), *r))
            .collect();
        // stable: equal similarities keep cohort order
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        let average_similarity = ranked.iter().map(|(s, _)| s).sum::<f64>() / ranked.len() as f64;
        let closest_match = ranked.first().map(|(similarity, record)| ClosestMatch {
            similarity: *similarity,
            score: record.score,
            tier: record.tier.clone(),
        });

        let mut insights = Vec::new();
        if let Some(best) = &closest_match {
            if best.similarity > self.config.strong_match {
                insights.push(format!(
                    "Very similar to top performer ({}% match)",
                    best.similarity.round()
                ));
            } else if best.similarity > self.config.moderate_match {
                insights.push("Moderate similarity to top performers".to_string());
            } else {
                insights.push("Unique profile - different from typical top performers".to_string());
            }
        }

        let traits = common_traits(&top, self.config.common_trait_share);
        if !traits.is_empty() {
            insights.push(format!(
                "Shares key traits with top performers: {}",
                traits.join(", ")
            ));
        }

        TopPerformerSimilarity {
            closest_match,
            average_similarity,
            insights,
        }
    }
}

/// Share of the cohort strictly below `score`, rounded to a whole percent
fn percentile(score: f64, cohort: &[&CohortRecord]) -> u8 {
    if cohort.is_empty() {
        return 0;
    }
    let below = cohort.iter().filter(|r| r.score < score).count();
    (100.0 * below as f64 / cohort.len() as f64).round() as u8
}

/// Continuous quantile with linear interpolation between closest ranks
fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Field-overlap similarity of `candidate` against `other` (0-100).
///
/// Only the candidate's keys that `other` also answered are compared; 0 when
/// there is nothing to compare.
pub fn similarity(candidate: &ResponseSet, other: &ResponseSet) -> f64 {
    let mut compared = 0usize;
    let mut equal = 0usize;
    for (key, entry) in candidate.iter() {
        if let Some(value) = other.value(key) {
            compared += 1;
            if *value == entry.value {
                equal += 1;
            }
        }
    }
    if compared == 0 {
        0.0
    } else {
        equal as f64 / compared as f64 * 100.0
    }
}

/// Answer values held by more than `share` of the top performers, ordered by
/// question id then value.
fn common_traits(top: &[&CohortRecord], share: f64) -> Vec<String> {
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for record in top {
        for (key, entry) in record.responses.iter() {
            *counts
                .entry((key.clone(), display_value(&entry.value)))
                .or_insert(0) += 1;
        }
    }

    let total = top.len() as f64;
    counts
        .into_iter()
        .filter(|(_, count)| *count as f64 / total > share)
        .map(|((_, value), _)| value)
        .collect()
}
