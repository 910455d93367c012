//! Algorithm registry
//!
//! An algorithm is a fixed, ordered table of `{name, default_weight,
//! calculator}` rows plus a recommendation template. Calculators are plain
//! functions: they see the responses, the session summary and the config,
//! never each other's output.

use crate::error::ScoringError;
use crate::scoring::config::ScoringConfig;
use crate::scoring::insights::{self, Recommendation};
use crate::scoring::scorer::DimensionScore;
use crate::scoring::{behavioral, candidate, lead};
use crate::telemetry::SessionSummary;
use crate::types::ResponseSet;

/// Neutral score returned when a dimension cannot be computed
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Everything a dimension calculator may look at
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub responses: &'a ResponseSet,
    pub summary: &'a SessionSummary,
    pub config: &'a ScoringConfig,
}

pub type Calculator = fn(&ScoringInput<'_>) -> f64;
pub type Recommender = fn(u8, &[DimensionScore]) -> Vec<Recommendation>;

/// One scored facet of a profile
#[derive(Clone, Copy)]
pub struct Dimension {
    pub name: &'static str,
    pub default_weight: f64,
    pub calculate: Calculator,
}

impl std::fmt::Debug for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dimension")
            .field("name", &self.name)
            .field("default_weight", &self.default_weight)
            .finish()
    }
}

/// A named scoring algorithm
pub struct Algorithm {
    pub name: &'static str,
    pub title: &'static str,
    pub dimensions: &'static [Dimension],
    pub recommend: Recommender,
}

impl std::fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Algorithm")
            .field("name", &self.name)
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl Algorithm {
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }
}

/// Registered algorithms
pub static ALGORITHMS: [Algorithm; 3] = [
    Algorithm {
        name: "12-dimensional",
        title: "12-Dimensional Intelligence Algorithm",
        dimensions: lead::DIMENSIONS,
        recommend: insights::lead_recommendations,
    },
    Algorithm {
        name: "candidate-assessment",
        title: "Candidate Assessment",
        dimensions: candidate::DIMENSIONS,
        recommend: insights::candidate_recommendations,
    },
    Algorithm {
        name: "behavioral",
        title: "Deep Behavioral Analysis",
        dimensions: behavioral::DIMENSIONS,
        recommend: insights::behavioral_recommendations,
    },
];

/// Look up an algorithm by name
pub fn lookup(name: &str) -> Result<&'static Algorithm, ScoringError> {
    ALGORITHMS
        .iter()
        .find(|a| a.name == name)
        .ok_or_else(|| ScoringError::UnknownAlgorithm(name.to_string()))
}

pub fn names() -> impl Iterator<Item = &'static str> {
    ALGORITHMS.iter().map(|a| a.name)
}

/// Clamp a calculator result to [0, 100]; non-finite results become neutral
pub(crate) fn bounded(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        NEUTRAL_SCORE
    }
}
