//! Telemetry data types
//!
//! This module defines the interaction events recorded during one assessment
//! attempt and the summary derived from replaying them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Interaction event kinds captured by the assessment client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEventKind {
    PointerMove {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    PointerClick {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    KeyDown {
        #[serde(default)]
        key: Option<String>,
    },
    Paste {
        #[serde(default)]
        field: Option<String>,
    },
    /// `hidden = true` when the page lost visibility (tab switch)
    VisibilityChange { hidden: bool },
    QuestionStart { question_id: String },
    QuestionEnd {
        question_id: String,
        #[serde(default)]
        answer: Option<Value>,
    },
    AnswerChange { question_id: String },
    /// Right-click / context menu attempt
    ContextMenu,
    DevToolsOpened,
    QuestionTimeout {
        #[serde(default)]
        question_id: Option<String>,
    },
}

impl TelemetryEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TelemetryEventKind::PointerMove { .. } => "pointer_move",
            TelemetryEventKind::PointerClick { .. } => "pointer_click",
            TelemetryEventKind::KeyDown { .. } => "key_down",
            TelemetryEventKind::Paste { .. } => "paste",
            TelemetryEventKind::VisibilityChange { .. } => "visibility_change",
            TelemetryEventKind::QuestionStart { .. } => "question_start",
            TelemetryEventKind::QuestionEnd { .. } => "question_end",
            TelemetryEventKind::AnswerChange { .. } => "answer_change",
            TelemetryEventKind::ContextMenu => "context_menu",
            TelemetryEventKind::DevToolsOpened => "dev_tools_opened",
            TelemetryEventKind::QuestionTimeout { .. } => "question_timeout",
        }
    }

    /// Direct user input, as opposed to lifecycle or detector events
    pub fn is_interaction(&self) -> bool {
        matches!(
            self,
            TelemetryEventKind::PointerMove { .. }
                | TelemetryEventKind::PointerClick { .. }
                | TelemetryEventKind::KeyDown { .. }
                | TelemetryEventKind::Paste { .. }
                | TelemetryEventKind::AnswerChange { .. }
        )
    }
}

/// One recorded event, stamped with its millisecond offset from session start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub offset_ms: u64,
    #[serde(flatten)]
    pub kind: TelemetryEventKind,
}

impl TelemetryEvent {
    pub fn new(offset_ms: u64, kind: TelemetryEventKind) -> Self {
        Self { offset_ms, kind }
    }

    pub fn pointer_move(offset_ms: u64, x: f64, y: f64) -> Self {
        Self::new(
            offset_ms,
            TelemetryEventKind::PointerMove {
                x: Some(x),
                y: Some(y),
            },
        )
    }

    pub fn pointer_click(offset_ms: u64, x: f64, y: f64) -> Self {
        Self::new(
            offset_ms,
            TelemetryEventKind::PointerClick {
                x: Some(x),
                y: Some(y),
            },
        )
    }

    pub fn key_down(offset_ms: u64, key: &str) -> Self {
        Self::new(
            offset_ms,
            TelemetryEventKind::KeyDown {
                key: Some(key.to_string()),
            },
        )
    }

    pub fn paste(offset_ms: u64) -> Self {
        Self::new(offset_ms, TelemetryEventKind::Paste { field: None })
    }

    pub fn visibility(offset_ms: u64, hidden: bool) -> Self {
        Self::new(offset_ms, TelemetryEventKind::VisibilityChange { hidden })
    }
}

/// Timing for a single question.
///
/// `duration_ms` is only set once the question has been closed after a start;
/// an unterminated question has `end_offset_ms = None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionTiming {
    pub question_id: String,
    pub start_offset_ms: Option<u64>,
    pub end_offset_ms: Option<u64>,
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Value>,
    #[serde(default)]
    pub answer_changes: u32,
}

impl QuestionTiming {
    pub(crate) fn started(question_id: &str, offset_ms: u64) -> Self {
        Self {
            question_id: question_id.to_string(),
            start_offset_ms: Some(offset_ms),
            end_offset_ms: None,
            duration_ms: None,
            answer: None,
            answer_changes: 0,
        }
    }

    pub(crate) fn unstarted(question_id: &str) -> Self {
        Self {
            question_id: question_id.to_string(),
            start_offset_ms: None,
            end_offset_ms: None,
            duration_ms: None,
            answer: None,
            answer_changes: 0,
        }
    }

    /// Started and not yet closed
    pub fn is_open(&self) -> bool {
        self.start_offset_ms.is_some() && self.end_offset_ms.is_none()
    }

    /// Closed with a duration or carrying a recorded answer
    pub fn is_answered(&self) -> bool {
        self.duration_ms.is_some() || self.answer.is_some()
    }
}

/// Discretized stress level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    Low,
    Medium,
    High,
}

/// Response-speed trend across the assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyPattern {
    SustainedHigh,
    GradualDecline,
    ModerateFatigue,
    SignificantFatigue,
    InsufficientData,
}

impl EnergyPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyPattern::SustainedHigh => "sustained_high",
            EnergyPattern::GradualDecline => "gradual_decline",
            EnergyPattern::ModerateFatigue => "moderate_fatigue",
            EnergyPattern::SignificantFatigue => "significant_fatigue",
            EnergyPattern::InsufficientData => "insufficient_data",
        }
    }
}

/// Decision style inferred from response speed and hesitation rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStyle {
    Decisive,
    Balanced,
    Deliberative,
    Cautious,
}

impl DecisionStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStyle::Decisive => "decisive",
            DecisionStyle::Balanced => "balanced",
            DecisionStyle::Deliberative => "deliberative",
            DecisionStyle::Cautious => "cautious",
        }
    }
}

/// Behavior that supports taking the answers at face value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustSignal {
    LowCorrections,
    ThoughtfulResponses,
    SmoothInteraction,
    HighFocus,
    HighCompletion,
}

/// Behavior that calls the answers into question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSignal {
    RushingThrough,
    HighUncertainty,
    FrustrationDetected,
    HighDistraction,
    HighHesitation,
    PotentialAutomation,
}

/// Cognitive load inferred from long pauses, heavy correction and timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveLoad {
    Low,
    Moderate,
    High,
}

/// Discrete anomaly counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyCounts {
    pub rapid_clicking: u32,
    pub unusual_pauses: u32,
    pub right_click_attempts: u32,
    pub dev_tools_opened: u32,
    pub timeouts: u32,
}

/// Per-session metrics derived by replaying a `TelemetrySession`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,

    /// Candidate self-confidence proxy (0-100)
    pub confidence_score: f64,
    /// Engagement proxy (0-100)
    pub engagement_score: f64,
    pub stress_level: StressLevel,
    /// Weighted stress-indicator points behind `stress_level`
    pub stress_points: u32,
    pub energy_pattern: EnergyPattern,
    /// `None` until at least one question has been timed
    pub decision_style: Option<DecisionStyle>,

    pub average_response_time_ms: f64,
    pub tab_switch_count: u32,
    pub copy_paste_count: u32,
    pub hesitation_count: u32,
    /// Backspace/delete keystrokes plus answer changes
    pub correction_count: u32,
    pub answer_change_count: u32,
    pub rapid_pointer_bursts: u32,
    pub anomalies: AnomalyCounts,
    /// Raw weighted anomaly magnitude, not normalized
    pub anomaly_score: f64,
    /// Longest idle gap between two interactions
    pub longest_pause_ms: u64,
    pub cognitive_load: CognitiveLoad,
    pub trust_signals: Vec<TrustSignal>,
    pub risk_signals: Vec<RiskSignal>,

    pub event_count: u32,
    pub interaction_count: u32,
    pub pointer_move_count: u32,
    pub total_time_ms: u64,
    pub hidden_time_ms: u64,
    /// Visible fraction of the session (0-1)
    pub focus_ratio: f64,

    pub timed_question_count: u32,
    pub answered_question_count: u32,
    pub skipped_questions: u32,
    /// Answered share of the questions seen (0-100)
    pub completion_rate: f64,

    pub red_flags: Vec<String>,
    pub insights: Vec<String>,
}

impl SessionSummary {
    /// Neutral summary for a session with no telemetry
    pub fn neutral(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            confidence_score: 100.0,
            engagement_score: 50.0,
            stress_level: StressLevel::Low,
            stress_points: 0,
            energy_pattern: EnergyPattern::InsufficientData,
            decision_style: None,
            average_response_time_ms: 0.0,
            tab_switch_count: 0,
            copy_paste_count: 0,
            hesitation_count: 0,
            correction_count: 0,
            answer_change_count: 0,
            rapid_pointer_bursts: 0,
            anomalies: AnomalyCounts::default(),
            anomaly_score: 0.0,
            longest_pause_ms: 0,
            cognitive_load: CognitiveLoad::Low,
            trust_signals: Vec::new(),
            risk_signals: Vec::new(),
            event_count: 0,
            interaction_count: 0,
            pointer_move_count: 0,
            total_time_ms: 0,
            hidden_time_ms: 0,
            focus_ratio: 1.0,
            timed_question_count: 0,
            answered_question_count: 0,
            skipped_questions: 0,
            completion_rate: 0.0,
            red_flags: Vec::new(),
            insights: Vec::new(),
        }
    }

    /// True when at least one event was replayed into this summary
    pub fn has_telemetry(&self) -> bool {
        self.event_count > 0
    }

    /// Trust signals minus risk signals
    pub fn trust_balance(&self) -> i32 {
        self.trust_signals.len() as i32 - self.risk_signals.len() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_shape() {
        let event = TelemetryEvent::visibility(1200, true);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({ "offset_ms": 1200, "type": "visibility_change", "hidden": true })
        );

        let parsed: TelemetryEvent = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_interaction_classification() {
        assert!(TelemetryEventKind::PointerMove { x: None, y: None }.is_interaction());
        assert!(!TelemetryEventKind::DevToolsOpened.is_interaction());
        assert!(!TelemetryEventKind::VisibilityChange { hidden: true }.is_interaction());
    }

    #[test]
    fn test_question_timing_states() {
        let mut timing = QuestionTiming::started("q1", 100);
        assert!(timing.is_open());
        assert!(!timing.is_answered());

        timing.end_offset_ms = Some(400);
        timing.duration_ms = Some(300);
        assert!(!timing.is_open());
        assert!(timing.is_answered());

        let unstarted = QuestionTiming::unstarted("q2");
        assert!(!unstarted.is_open());
    }

    #[test]
    fn test_neutral_summary_defaults() {
        let summary = SessionSummary::neutral("s1");
        assert_eq!(summary.confidence_score, 100.0);
        assert_eq!(summary.stress_level, StressLevel::Low);
        assert_eq!(summary.energy_pattern, EnergyPattern::InsufficientData);
        assert_eq!(summary.cognitive_load, CognitiveLoad::Low);
        assert_eq!(summary.trust_balance(), 0);
        assert!(!summary.has_telemetry());
    }
}
