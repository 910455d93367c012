//! Behavioral telemetry
//!
//! Records interaction events during one assessment attempt and derives a
//! `SessionSummary` from them:
//!
//! - `types`: event, timing and summary types
//! - `session`: the per-attempt event log and question timing
//! - `adapter`: permissive conversion of raw client JSON events
//! - `summary`: replay of a session into derived metrics

pub mod adapter;
pub mod session;
pub mod summary;
pub mod types;

pub use adapter::TelemetryAdapter;
pub use session::TelemetrySession;
pub use summary::{SessionSummarizer, TelemetryConfig};
pub use types::{
    AnomalyCounts, CognitiveLoad, DecisionStyle, EnergyPattern, QuestionTiming, RiskSignal,
    SessionSummary, StressLevel, TelemetryEvent, TelemetryEventKind, TrustSignal,
};
