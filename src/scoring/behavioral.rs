//! Behavior-only scoring (`behavioral`)
//!
//! Scores how the candidate answered rather than what they answered. Every
//! dimension reads the session summary alone and is neutral when no
//! telemetry was recorded.

use crate::scoring::algorithms::{bounded, Dimension, ScoringInput, NEUTRAL_SCORE};
use crate::telemetry::{CognitiveLoad, SessionSummary};

pub const DIMENSIONS: &[Dimension] = &[
    Dimension {
        name: "behavioral_score",
        default_weight: 0.40,
        calculate: behavioral_score,
    },
    Dimension {
        name: "engagement",
        default_weight: 0.20,
        calculate: engagement,
    },
    Dimension {
        name: "trust",
        default_weight: 0.20,
        calculate: trust,
    },
    Dimension {
        name: "cognitive_load",
        default_weight: 0.20,
        calculate: cognitive_load,
    },
];

/// Points per trust or risk signal
const SIGNAL_STEP: f64 = 5.0;

fn observed(summary: &SessionSummary, score: impl FnOnce(&SessionSummary) -> f64) -> f64 {
    if summary.has_telemetry() {
        bounded(score(summary))
    } else {
        NEUTRAL_SCORE
    }
}

/// Composite behavior score
///
/// `50 + 0.3 × engagement + 5 × trust signals − 5 × risk signals`, plus 10
/// for low cognitive load or minus 10 for high.
fn behavioral_score(input: &ScoringInput<'_>) -> f64 {
    observed(input.summary, |s| {
        let load = match s.cognitive_load {
            CognitiveLoad::Low => 10.0,
            CognitiveLoad::Moderate => 0.0,
            CognitiveLoad::High => -10.0,
        };
        50.0 + s.engagement_score * 0.3 + s.trust_balance() as f64 * SIGNAL_STEP + load
    })
}

fn engagement(input: &ScoringInput<'_>) -> f64 {
    observed(input.summary, |s| s.engagement_score)
}

fn trust(input: &ScoringInput<'_>) -> f64 {
    observed(input.summary, |s| 50.0 + s.trust_balance() as f64 * 10.0)
}

fn cognitive_load(input: &ScoringInput<'_>) -> f64 {
    observed(input.summary, |s| match s.cognitive_load {
        CognitiveLoad::Low => 100.0,
        CognitiveLoad::Moderate => 65.0,
        CognitiveLoad::High => 30.0,
    })
}
