//! Multi-dimensional scoring
//!
//! Turns a response set and session summary into a bounded total score with
//! a tier, a confidence figure, insights and recommendations. Which
//! dimensions are scored is decided by the configured algorithm.

pub mod algorithms;
pub mod behavioral;
pub mod candidate;
pub mod config;
pub mod insights;
pub mod lead;
pub mod scorer;

pub use algorithms::{Algorithm, Dimension, ScoringInput, ALGORITHMS, NEUTRAL_SCORE};
pub use config::{ScoringConfig, Tier, TierTable, DEFAULT_ALGORITHM};
pub use insights::{Insight, InsightKind, Recommendation};
pub use scorer::{
    behavioral_multiplier, pipeline_confidence, DimensionScore, ScoreResult, Scorer,
    MAX_BEHAVIORAL_MULTIPLIER,
};
