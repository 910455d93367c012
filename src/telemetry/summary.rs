//! Session summarization
//!
//! Replays a `TelemetrySession` into a `SessionSummary`. Summarizing is pure and
//! idempotent: the summary depends only on the recorded events and question
//! timing, never on wall-clock time.

use crate::error::ScoringError;
use crate::telemetry::session::TelemetrySession;
use crate::telemetry::types::{
    AnomalyCounts, CognitiveLoad, DecisionStyle, EnergyPattern, RiskSignal, SessionSummary,
    StressLevel, TelemetryEventKind, TrustSignal,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Largest accepted rapid-click window
pub const MAX_RAPID_CLICK_WINDOW: usize = 64;
/// Largest accepted stress weight per indicator
pub const MAX_STRESS_WEIGHT: u32 = 1_000;

/// Thresholds and weights used when summarizing a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Starting confidence before penalties and bonuses
    pub confidence_base: f64,
    pub hesitation_penalty: f64,
    pub correction_penalty: f64,
    pub tab_switch_penalty: f64,
    pub paste_penalty: f64,
    /// Bonus per answer faster than the median answer
    pub quick_answer_bonus: f64,
    pub quick_answer_bonus_cap: f64,

    /// Idle gap between interactions counted as a hesitation: [min, max)
    pub hesitation_min_gap_ms: u64,
    pub hesitation_max_gap_ms: u64,
    /// Idle gap at or above which the pause is an anomaly
    pub unusual_pause_ms: u64,

    /// Pointer speed (px/ms) above which a move counts as a rapid burst
    pub rapid_pointer_velocity: f64,
    /// Click intervals below this are "rapid"
    pub rapid_click_interval_ms: u64,
    pub rapid_click_window: usize,
    pub rapid_click_min_intervals: usize,

    pub stress_weight_pointer_burst: u32,
    pub stress_weight_rapid_click: u32,
    pub stress_weight_tab_switch: u32,
    pub stress_medium_threshold: u32,
    pub stress_high_threshold: u32,

    pub anomaly_weight_rapid_clicking: f64,
    pub anomaly_weight_unusual_pause: f64,
    pub anomaly_weight_right_click: f64,
    pub anomaly_weight_dev_tools: f64,
    pub anomaly_weight_timeout: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            confidence_base: 80.0,
            hesitation_penalty: 5.0,
            correction_penalty: 3.0,
            tab_switch_penalty: 10.0,
            paste_penalty: 15.0,
            quick_answer_bonus: 2.0,
            quick_answer_bonus_cap: 10.0,
            hesitation_min_gap_ms: 2_000,
            hesitation_max_gap_ms: 10_000,
            unusual_pause_ms: 10_000,
            rapid_pointer_velocity: 5.0,
            rapid_click_interval_ms: 500,
            rapid_click_window: 5,
            rapid_click_min_intervals: 3,
            stress_weight_pointer_burst: 1,
            stress_weight_rapid_click: 3,
            stress_weight_tab_switch: 2,
            stress_medium_threshold: 5,
            stress_high_threshold: 15,
            anomaly_weight_rapid_clicking: 3.0,
            anomaly_weight_unusual_pause: 1.0,
            anomaly_weight_right_click: 2.0,
            anomaly_weight_dev_tools: 10.0,
            anomaly_weight_timeout: 2.0,
        }
    }
}

impl TelemetryConfig {
    pub fn from_json(json: &str) -> Result<Self, ScoringError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ScoringError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject thresholds the replay cannot honor
    pub fn validate(&self) -> Result<(), ScoringError> {
        let amounts = [
            ("confidence_base", self.confidence_base),
            ("hesitation_penalty", self.hesitation_penalty),
            ("correction_penalty", self.correction_penalty),
            ("tab_switch_penalty", self.tab_switch_penalty),
            ("paste_penalty", self.paste_penalty),
            ("quick_answer_bonus", self.quick_answer_bonus),
            ("quick_answer_bonus_cap", self.quick_answer_bonus_cap),
            ("rapid_pointer_velocity", self.rapid_pointer_velocity),
            ("anomaly_weight_rapid_clicking", self.anomaly_weight_rapid_clicking),
            ("anomaly_weight_unusual_pause", self.anomaly_weight_unusual_pause),
            ("anomaly_weight_right_click", self.anomaly_weight_right_click),
            ("anomaly_weight_dev_tools", self.anomaly_weight_dev_tools),
            ("anomaly_weight_timeout", self.anomaly_weight_timeout),
        ];
        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{} is {}", name, value)));
            }
        }
        if self.confidence_base > 100.0 {
            return Err(invalid(format!(
                "confidence_base {} above 100",
                self.confidence_base
            )));
        }

        if self.hesitation_min_gap_ms >= self.hesitation_max_gap_ms {
            return Err(invalid(format!(
                "hesitation gap band [{}, {}) is empty",
                self.hesitation_min_gap_ms, self.hesitation_max_gap_ms
            )));
        }
        if self.rapid_click_window == 0 || self.rapid_click_window > MAX_RAPID_CLICK_WINDOW {
            return Err(invalid(format!(
                "rapid_click_window {} outside 1-{}",
                self.rapid_click_window, MAX_RAPID_CLICK_WINDOW
            )));
        }
        if self.rapid_click_min_intervals == 0
            || self.rapid_click_min_intervals > self.rapid_click_window
        {
            return Err(invalid(format!(
                "rapid_click_min_intervals {} outside 1-{}",
                self.rapid_click_min_intervals, self.rapid_click_window
            )));
        }

        let stress_weights = [
            ("stress_weight_pointer_burst", self.stress_weight_pointer_burst),
            ("stress_weight_rapid_click", self.stress_weight_rapid_click),
            ("stress_weight_tab_switch", self.stress_weight_tab_switch),
        ];
        for (name, weight) in stress_weights {
            if weight > MAX_STRESS_WEIGHT {
                return Err(invalid(format!(
                    "{} {} above {}",
                    name, weight, MAX_STRESS_WEIGHT
                )));
            }
        }
        if self.stress_medium_threshold > self.stress_high_threshold {
            return Err(invalid(format!(
                "stress thresholds out of order: medium {} > high {}",
                self.stress_medium_threshold, self.stress_high_threshold
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ScoringError {
    ScoringError::InvalidTelemetryConfig(message)
}

/// Counters accumulated during one replay
#[derive(Debug, Default)]
struct Replay {
    interactions: u32,
    pointer_moves: u32,
    rapid_pointer_bursts: u32,
    rapid_click_episodes: u32,
    key_corrections: u32,
    answer_changes: u32,
    pastes: u32,
    tab_switches: u32,
    hesitations: u32,
    unusual_pauses: u32,
    right_clicks: u32,
    dev_tools: u32,
    timeouts: u32,
    hidden_ms: u64,
    longest_pause_ms: u64,
    last_offset_ms: u64,
}

/// Summarizer for telemetry sessions
#[derive(Debug, Clone, Default)]
pub struct SessionSummarizer {
    config: TelemetryConfig,
}

impl SessionSummarizer {
    pub fn new(config: TelemetryConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// Derive the summary for a session. Never fails; an empty session yields
    /// `SessionSummary::neutral`.
    pub fn summarize(&self, session: &TelemetrySession) -> SessionSummary {
        if session.is_empty() {
            return SessionSummary::neutral(session.session_id());
        }

        let replay = self.replay(session);
        let cfg = &self.config;

        let timings = session.question_timings();
        let durations: Vec<f64> = timings
            .iter()
            .filter_map(|t| t.duration_ms)
            .map(|d| d as f64)
            .collect();
        let answered = timings.iter().filter(|t| t.is_answered()).count() as u32;
        let skipped = timings
            .iter()
            .filter(|t| t.start_offset_ms.is_some() && !t.is_answered())
            .count() as u32;
        let completion_rate = if timings.is_empty() {
            0.0
        } else {
            answered as f64 / timings.len() as f64 * 100.0
        };

        let total_time_ms = timings
            .iter()
            .filter_map(|t| t.end_offset_ms)
            .fold(replay.last_offset_ms, u64::max);
        let focus_ratio = if total_time_ms > 0 {
            (1.0 - replay.hidden_ms as f64 / total_time_ms as f64).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let average_response_time_ms = mean(&durations).unwrap_or(0.0);
        let correction_count = replay.key_corrections.saturating_add(replay.answer_changes);

        let confidence_score = self.confidence_score(&replay, correction_count, &durations);

        let stress_points = replay
            .rapid_pointer_bursts
            .saturating_mul(cfg.stress_weight_pointer_burst)
            .saturating_add(
                replay
                    .rapid_click_episodes
                    .saturating_mul(cfg.stress_weight_rapid_click),
            )
            .saturating_add(replay.tab_switches.saturating_mul(cfg.stress_weight_tab_switch));
        let stress_level = self.stress_level(stress_points);

        let energy_pattern = energy_pattern(&durations);

        let decision_style = if durations.is_empty() {
            None
        } else {
            Some(decision_style(
                average_response_time_ms,
                replay.hesitations as f64 / durations.len() as f64,
            ))
        };

        let anomalies = AnomalyCounts {
            rapid_clicking: replay.rapid_click_episodes,
            unusual_pauses: replay.unusual_pauses,
            right_click_attempts: replay.right_clicks,
            dev_tools_opened: replay.dev_tools,
            timeouts: replay.timeouts,
        };
        let anomaly_score = self.anomaly_score(&anomalies);

        let engagement_score = engagement_score(
            total_time_ms,
            replay.interactions,
            focus_ratio,
            replay.pointer_moves,
            completion_rate,
        );

        let mut summary = SessionSummary {
            session_id: session.session_id().to_string(),
            confidence_score,
            engagement_score,
            stress_level,
            stress_points,
            energy_pattern,
            decision_style,
            average_response_time_ms,
            tab_switch_count: replay.tab_switches,
            copy_paste_count: replay.pastes,
            hesitation_count: replay.hesitations,
            correction_count,
            answer_change_count: replay.answer_changes,
            rapid_pointer_bursts: replay.rapid_pointer_bursts,
            anomalies,
            anomaly_score,
            longest_pause_ms: replay.longest_pause_ms,
            cognitive_load: CognitiveLoad::Low,
            trust_signals: Vec::new(),
            risk_signals: Vec::new(),
            event_count: session.events().len() as u32,
            interaction_count: replay.interactions,
            pointer_move_count: replay.pointer_moves,
            total_time_ms,
            hidden_time_ms: replay.hidden_ms,
            focus_ratio,
            timed_question_count: durations.len() as u32,
            answered_question_count: answered,
            skipped_questions: skipped,
            completion_rate,
            red_flags: Vec::new(),
            insights: Vec::new(),
        };
        summary.cognitive_load = cognitive_load(&summary);
        summary.trust_signals = trust_signals(&summary);
        summary.risk_signals = risk_signals(&summary);
        summary.red_flags = red_flags(&summary);
        summary.insights = behavioral_insights(&summary);

        debug!(
            session_id = %summary.session_id,
            events = summary.event_count,
            confidence = summary.confidence_score,
            stress = ?summary.stress_level,
            energy = summary.energy_pattern.as_str(),
            trust_balance = summary.trust_balance(),
            "summarized telemetry session"
        );

        summary
    }

    fn replay(&self, session: &TelemetrySession) -> Replay {
        let cfg = &self.config;
        let mut replay = Replay::default();

        let mut last_interaction: Option<u64> = None;
        let mut last_pointer: Option<(f64, f64, u64)> = None;
        let mut last_click: Option<u64> = None;
        let mut click_intervals: VecDeque<u64> = VecDeque::with_capacity(cfg.rapid_click_window);
        let mut hidden_since: Option<u64> = None;

        for event in session.events() {
            let offset = event.offset_ms;
            replay.last_offset_ms = replay.last_offset_ms.max(offset);

            if event.kind.is_interaction() {
                replay.interactions += 1;
                if let Some(previous) = last_interaction {
                    let gap = offset.saturating_sub(previous);
                    replay.longest_pause_ms = replay.longest_pause_ms.max(gap);
                    if gap >= cfg.unusual_pause_ms {
                        replay.unusual_pauses += 1;
                    }
                    if gap >= cfg.hesitation_min_gap_ms && gap < cfg.hesitation_max_gap_ms {
                        replay.hesitations += 1;
                    }
                }
                last_interaction = Some(offset);
            }

            match &event.kind {
                TelemetryEventKind::PointerMove { x, y } => {
                    replay.pointer_moves += 1;
                    if let (Some(x), Some(y)) = (*x, *y) {
                        if let Some((px, py, pt)) = last_pointer {
                            let dt = offset.saturating_sub(pt);
                            if dt > 0 {
                                let velocity = ((x - px).powi(2) + (y - py).powi(2)).sqrt() / dt as f64;
                                if velocity > cfg.rapid_pointer_velocity {
                                    replay.rapid_pointer_bursts += 1;
                                }
                            }
                        }
                        last_pointer = Some((x, y, offset));
                    }
                }
                TelemetryEventKind::PointerClick { .. } => {
                    if let Some(previous) = last_click {
                        click_intervals.push_back(offset.saturating_sub(previous));
                        while click_intervals.len() > cfg.rapid_click_window {
                            click_intervals.pop_front();
                        }
                        if click_intervals.len() >= cfg.rapid_click_min_intervals
                            && click_intervals
                                .iter()
                                .all(|i| *i < cfg.rapid_click_interval_ms)
                        {
                            replay.rapid_click_episodes += 1;
                        }
                    }
                    last_click = Some(offset);
                }
                TelemetryEventKind::KeyDown { key } => {
                    if matches!(key.as_deref(), Some("Backspace") | Some("Delete")) {
                        replay.key_corrections += 1;
                    }
                }
                TelemetryEventKind::Paste { .. } => replay.pastes += 1,
                TelemetryEventKind::VisibilityChange { hidden: true } => {
                    if hidden_since.is_none() {
                        replay.tab_switches += 1;
                        hidden_since = Some(offset);
                    }
                }
                TelemetryEventKind::VisibilityChange { hidden: false } => {
                    if let Some(since) = hidden_since.take() {
                        replay.hidden_ms += offset.saturating_sub(since);
                    }
                }
                TelemetryEventKind::AnswerChange { .. } => replay.answer_changes += 1,
                TelemetryEventKind::ContextMenu => replay.right_clicks += 1,
                TelemetryEventKind::DevToolsOpened => replay.dev_tools += 1,
                TelemetryEventKind::QuestionTimeout { .. } => replay.timeouts += 1,
                TelemetryEventKind::QuestionStart { .. } | TelemetryEventKind::QuestionEnd { .. } => {}
            }
        }

        // Still hidden when the log ends
        if let Some(since) = hidden_since {
            replay.hidden_ms += replay.last_offset_ms.saturating_sub(since);
        }

        replay
    }

    /// Confidence score
    ///
    /// Formula: `base - Σ(count × penalty) + min(quick × bonus, cap)`, clamped
    /// to [0, 100]. "Quick" answers are those strictly faster than the median.
    fn confidence_score(&self, replay: &Replay, corrections: u32, durations: &[f64]) -> f64 {
        let cfg = &self.config;
        let quick = median(durations)
            .map(|m| durations.iter().filter(|d| **d < m).count())
            .unwrap_or(0);

        let score = cfg.confidence_base
            - replay.hesitations as f64 * cfg.hesitation_penalty
            - corrections as f64 * cfg.correction_penalty
            - replay.tab_switches as f64 * cfg.tab_switch_penalty
            - replay.pastes as f64 * cfg.paste_penalty
            + (quick as f64 * cfg.quick_answer_bonus).min(cfg.quick_answer_bonus_cap);
        score.clamp(0.0, 100.0)
    }

    fn stress_level(&self, points: u32) -> StressLevel {
        if points >= self.config.stress_high_threshold {
            StressLevel::High
        } else if points >= self.config.stress_medium_threshold {
            StressLevel::Medium
        } else {
            StressLevel::Low
        }
    }

    fn anomaly_score(&self, anomalies: &AnomalyCounts) -> f64 {
        let cfg = &self.config;
        anomalies.rapid_clicking as f64 * cfg.anomaly_weight_rapid_clicking
            + anomalies.unusual_pauses as f64 * cfg.anomaly_weight_unusual_pause
            + anomalies.right_click_attempts as f64 * cfg.anomaly_weight_right_click
            + anomalies.dev_tools_opened as f64 * cfg.anomaly_weight_dev_tools
            + anomalies.timeouts as f64 * cfg.anomaly_weight_timeout
    }
}

/// Energy pattern from the ordered response-time sequence.
///
/// Compares the mean of the first third with the mean of the last third as a
/// speed ratio `first / last`: slower answers later push the ratio down.
/// Ratios above 1.0 (answering faster over time) are `SustainedHigh`.
fn energy_pattern(durations: &[f64]) -> EnergyPattern {
    if durations.len() < 3 {
        return EnergyPattern::InsufficientData;
    }
    let third = durations.len() / 3;
    let first = mean(&durations[..third]).unwrap_or(0.0);
    let last = mean(&durations[durations.len() - third..]).unwrap_or(0.0);

    if last <= 0.0 {
        return EnergyPattern::SustainedHigh;
    }
    let ratio = first / last;
    if ratio >= 0.9 {
        EnergyPattern::SustainedHigh
    } else if ratio >= 0.7 {
        EnergyPattern::GradualDecline
    } else if ratio >= 0.5 {
        EnergyPattern::ModerateFatigue
    } else {
        EnergyPattern::SignificantFatigue
    }
}

fn decision_style(average_response_time_ms: f64, hesitation_rate: f64) -> DecisionStyle {
    if average_response_time_ms < 5_000.0 && hesitation_rate < 0.1 {
        DecisionStyle::Decisive
    } else if average_response_time_ms < 10_000.0 && hesitation_rate < 0.3 {
        DecisionStyle::Balanced
    } else if average_response_time_ms < 20_000.0 && hesitation_rate < 0.5 {
        DecisionStyle::Deliberative
    } else {
        DecisionStyle::Cautious
    }
}

/// Engagement score: five equally weighted saturating factors
///
/// ```text
/// time on task      min(total_time / 60s, 1)
/// interactions      min(interactions / 20, 1)
/// focus             visible fraction of the session
/// pointer activity  min(pointer_moves / 100, 1)
/// completion        completion_rate / 100
/// ```
fn engagement_score(
    total_time_ms: u64,
    interactions: u32,
    focus_ratio: f64,
    pointer_moves: u32,
    completion_rate: f64,
) -> f64 {
    let factors = [
        (total_time_ms as f64 / 60_000.0).min(1.0),
        (interactions as f64 / 20.0).min(1.0),
        focus_ratio,
        (pointer_moves as f64 / 100.0).min(1.0),
        completion_rate / 100.0,
    ];
    let score = factors.iter().map(|f| f.clamp(0.0, 1.0) * 0.2).sum::<f64>() * 100.0;
    score.clamp(0.0, 100.0)
}

/// Cognitive load: no indicator is low, one or two moderate, three or more high
///
/// ```text
/// long pause        longest idle gap above 30 s
/// heavy correction  more than 4 corrections
/// repeated pauses   more than 3 unusual pauses
/// timeouts          any question timed out
/// ```
fn cognitive_load(summary: &SessionSummary) -> CognitiveLoad {
    let indicators = [
        summary.longest_pause_ms > 30_000,
        summary.correction_count > 4,
        summary.anomalies.unusual_pauses > 3,
        summary.anomalies.timeouts > 0,
    ];
    match indicators.iter().filter(|i| **i).count() {
        0 => CognitiveLoad::Low,
        1 | 2 => CognitiveLoad::Moderate,
        _ => CognitiveLoad::High,
    }
}

fn trust_signals(summary: &SessionSummary) -> Vec<TrustSignal> {
    let timed = summary.timed_question_count > 0;
    let avg = summary.average_response_time_ms;
    [
        (summary.correction_count < 3, TrustSignal::LowCorrections),
        (
            timed && avg > 3_000.0 && avg < 30_000.0,
            TrustSignal::ThoughtfulResponses,
        ),
        (
            summary.anomalies.rapid_clicking == 0,
            TrustSignal::SmoothInteraction,
        ),
        (summary.focus_ratio > 0.8, TrustSignal::HighFocus),
        (summary.completion_rate > 90.0, TrustSignal::HighCompletion),
    ]
    .into_iter()
    .filter_map(|(present, signal)| present.then_some(signal))
    .collect()
}

fn risk_signals(summary: &SessionSummary) -> Vec<RiskSignal> {
    let timed = summary.timed_question_count > 0;
    [
        (
            timed && summary.average_response_time_ms < 2_000.0,
            RiskSignal::RushingThrough,
        ),
        (summary.correction_count > 5, RiskSignal::HighUncertainty),
        (
            summary.anomalies.rapid_clicking > 0,
            RiskSignal::FrustrationDetected,
        ),
        (summary.tab_switch_count > 5, RiskSignal::HighDistraction),
        (summary.hesitation_count > 3, RiskSignal::HighHesitation),
        (summary.copy_paste_count > 2, RiskSignal::PotentialAutomation),
    ]
    .into_iter()
    .filter_map(|(present, signal)| present.then_some(signal))
    .collect()
}

fn red_flags(summary: &SessionSummary) -> Vec<String> {
    let mut flags = Vec::new();
    if summary.tab_switch_count > 5 {
        flags.push("Excessive tab switching - possible external assistance".to_string());
    }
    if summary.copy_paste_count > 2 {
        flags.push("Multiple paste events - possible prepared answers".to_string());
    }
    if summary.hesitation_count > 10 {
        flags.push("High hesitation count - uncertainty or difficulty".to_string());
    }
    if summary.timed_question_count > 0 && summary.average_response_time_ms < 2_000.0 {
        flags.push("Extremely fast responses - possible lack of consideration".to_string());
    }
    if summary.rapid_pointer_bursts > 10 {
        flags.push("Erratic pointer movement - frustration or confusion".to_string());
    }
    if summary.anomalies.dev_tools_opened > 0 {
        flags.push("Developer tools opened during assessment".to_string());
    }
    flags
}

fn behavioral_insights(summary: &SessionSummary) -> Vec<String> {
    let mut insights = Vec::new();
    if summary.confidence_score > 80.0 {
        insights.push("High confidence - decisive and sure of responses".to_string());
    } else if summary.confidence_score < 50.0 {
        insights.push("Low confidence - significant uncertainty detected".to_string());
    }
    if summary.engagement_score > 80.0 {
        insights.push("Highly engaged throughout assessment".to_string());
    } else if summary.engagement_score < 50.0 {
        insights.push("Low engagement - possible disinterest or fatigue".to_string());
    }
    match summary.energy_pattern {
        EnergyPattern::SustainedHigh => {
            insights.push("Maintained high energy - strong focus and stamina".to_string())
        }
        EnergyPattern::SignificantFatigue => {
            insights.push("Significant fatigue detected - may impact later responses".to_string())
        }
        _ => {}
    }
    if let Some(style) = summary.decision_style {
        insights.push(format!("Decision style: {}", style.as_str()));
    }
    if summary.cognitive_load == CognitiveLoad::High {
        insights.push("High cognitive load - questions may be overly demanding".to_string());
    }
    insights
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::types::TelemetryEvent;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn session() -> TelemetrySession {
        TelemetrySession::with_id("test", Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap())
    }

    fn timed_session(durations: &[u64]) -> TelemetrySession {
        let mut s = session();
        let mut offset = 0;
        for (i, duration) in durations.iter().enumerate() {
            let id = format!("q{}", i + 1);
            s.start_question(&id, offset);
            offset += duration;
            s.end_question(&id, offset, Some(json!("a")));
        }
        s
    }

    #[test]
    fn test_empty_session_is_neutral() {
        let s = session();
        assert_eq!(s.summarize(), SessionSummary::neutral("test"));
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let s = timed_session(&[4000, 6000, 5000]);
        assert_eq!(s.summarize(), s.summarize());
    }

    #[test]
    fn test_energy_pattern_slower_later_is_fatigue() {
        let summary = timed_session(&[3000, 9000, 27000]).summarize();
        assert_eq!(summary.energy_pattern, EnergyPattern::SignificantFatigue);
    }

    #[test]
    fn test_energy_pattern_bands() {
        assert_eq!(energy_pattern(&[1000.0, 1000.0]), EnergyPattern::InsufficientData);
        assert_eq!(
            energy_pattern(&[5000.0, 5000.0, 5000.0]),
            EnergyPattern::SustainedHigh
        );
        // faster later: ratio 2.0
        assert_eq!(
            energy_pattern(&[8000.0, 6000.0, 4000.0]),
            EnergyPattern::SustainedHigh
        );
        // ratio 0.8
        assert_eq!(
            energy_pattern(&[4000.0, 4500.0, 5000.0]),
            EnergyPattern::GradualDecline
        );
        // ratio 0.6
        assert_eq!(
            energy_pattern(&[3000.0, 4000.0, 5000.0]),
            EnergyPattern::ModerateFatigue
        );
        assert_eq!(energy_pattern(&[0.0, 0.0, 0.0]), EnergyPattern::SustainedHigh);
    }

    #[test]
    fn test_energy_uses_thirds_of_longer_sequences() {
        // thirds of 6 = 2: first mean 2000, last mean 5000 -> ratio 0.4
        let durations = [2000.0, 2000.0, 9000.0, 9000.0, 5000.0, 5000.0];
        assert_eq!(energy_pattern(&durations), EnergyPattern::SignificantFatigue);
    }

    #[test]
    fn test_confidence_penalties_and_bonus() {
        let mut s = timed_session(&[2000, 4000, 6000]);
        s.record(TelemetryEvent::visibility(12_100, true));
        s.record(TelemetryEvent::visibility(12_200, false));
        s.record(TelemetryEvent::paste(12_300));
        s.record(TelemetryEvent::key_down(12_400, "Backspace"));

        let summary = s.summarize();
        // 80 - 10 (tab) - 15 (paste) - 3 (correction) + 2 (one answer below median)
        assert_eq!(summary.confidence_score, 54.0);
        assert_eq!(summary.tab_switch_count, 1);
        assert_eq!(summary.copy_paste_count, 1);
        assert_eq!(summary.correction_count, 1);
    }

    #[test]
    fn test_confidence_clamps_at_zero() {
        let mut s = session();
        for i in 0..10 {
            s.record(TelemetryEvent::paste(i * 10));
        }
        assert_eq!(s.summarize().confidence_score, 0.0);
    }

    #[test]
    fn test_quick_answer_bonus_is_capped() {
        let durations: Vec<u64> = (0..21).map(|i| 1000 + i * 100).collect();
        let summary = timed_session(&durations).summarize();
        // 10 answers below the median, bonus capped at 10
        assert_eq!(summary.confidence_score, 90.0);
    }

    #[test]
    fn test_hesitations_and_unusual_pauses() {
        let mut s = session();
        s.record(TelemetryEvent::pointer_move(0, 0.0, 0.0));
        s.record(TelemetryEvent::pointer_move(3_000, 1.0, 1.0)); // 3s gap -> hesitation
        s.record(TelemetryEvent::pointer_move(4_000, 2.0, 2.0));
        s.record(TelemetryEvent::pointer_move(20_000, 3.0, 3.0)); // 16s gap -> unusual pause

        let summary = s.summarize();
        assert_eq!(summary.hesitation_count, 1);
        assert_eq!(summary.anomalies.unusual_pauses, 1);
        assert_eq!(summary.anomaly_score, 1.0);
    }

    #[test]
    fn test_rapid_clicking_episodes() {
        let mut s = session();
        for i in 0..5 {
            s.record(TelemetryEvent::pointer_click(i * 100, 10.0, 10.0));
        }
        let summary = s.summarize();
        // intervals accumulate: episodes fire on the 4th and 5th click
        assert_eq!(summary.anomalies.rapid_clicking, 2);
        assert_eq!(summary.stress_points, 6);
        assert_eq!(summary.stress_level, StressLevel::Medium);
        assert_eq!(summary.anomaly_score, 6.0);
    }

    #[test]
    fn test_stress_levels_from_points() {
        let summarizer = SessionSummarizer::default();
        assert_eq!(summarizer.stress_level(0), StressLevel::Low);
        assert_eq!(summarizer.stress_level(4), StressLevel::Low);
        assert_eq!(summarizer.stress_level(5), StressLevel::Medium);
        assert_eq!(summarizer.stress_level(14), StressLevel::Medium);
        assert_eq!(summarizer.stress_level(15), StressLevel::High);
    }

    #[test]
    fn test_rapid_pointer_bursts_raise_stress() {
        let mut s = session();
        for i in 0..20u64 {
            // 1000px per 100ms = 10 px/ms
            s.record(TelemetryEvent::pointer_move(i * 100, (i % 2) as f64 * 1000.0, 0.0));
        }
        let summary = s.summarize();
        assert_eq!(summary.rapid_pointer_bursts, 19);
        assert_eq!(summary.stress_level, StressLevel::High);
        assert!(summary
            .red_flags
            .iter()
            .any(|f| f.contains("Erratic pointer movement")));
    }

    #[test]
    fn test_hidden_time_and_focus_ratio() {
        let mut s = session();
        s.record(TelemetryEvent::pointer_move(0, 0.0, 0.0));
        s.record(TelemetryEvent::visibility(2_000, true));
        s.record(TelemetryEvent::visibility(2_000, true)); // duplicate hide
        s.record(TelemetryEvent::visibility(4_000, false));
        s.record(TelemetryEvent::pointer_move(10_000, 0.0, 0.0));

        let summary = s.summarize();
        assert_eq!(summary.tab_switch_count, 1);
        assert_eq!(summary.hidden_time_ms, 2_000);
        assert!((summary.focus_ratio - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_anomaly_weights() {
        let mut s = session();
        s.record(TelemetryEvent::new(0, TelemetryEventKind::DevToolsOpened));
        s.record(TelemetryEvent::new(10, TelemetryEventKind::ContextMenu));
        s.record(TelemetryEvent::new(
            20,
            TelemetryEventKind::QuestionTimeout { question_id: None },
        ));
        let summary = s.summarize();
        assert_eq!(summary.anomaly_score, 14.0);
        assert!(summary
            .red_flags
            .iter()
            .any(|f| f.contains("Developer tools")));
    }

    #[test]
    fn test_completion_and_skips() {
        let mut s = timed_session(&[4000, 5000]);
        s.start_question("q3", 10_000);
        let summary = s.summarize();
        assert_eq!(summary.answered_question_count, 2);
        assert_eq!(summary.skipped_questions, 1);
        assert!((summary.completion_rate - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.decision_style, Some(DecisionStyle::Decisive));
    }

    #[test]
    fn test_engagement_factors() {
        // 60s, full focus, full completion, no interactions or pointer moves
        assert!((engagement_score(60_000, 0, 1.0, 0, 100.0) - 60.0).abs() < 1e-9);
        assert!((engagement_score(120_000, 40, 1.0, 500, 100.0) - 100.0).abs() < 1e-9);
        assert_eq!(engagement_score(0, 0, 0.0, 0, 0.0), 0.0);
    }

    #[test]
    fn test_decision_styles() {
        assert_eq!(decision_style(3000.0, 0.0), DecisionStyle::Decisive);
        assert_eq!(decision_style(8000.0, 0.2), DecisionStyle::Balanced);
        assert_eq!(decision_style(15000.0, 0.4), DecisionStyle::Deliberative);
        assert_eq!(decision_style(30000.0, 0.0), DecisionStyle::Cautious);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
    }

    #[test]
    fn test_config_validation() {
        assert!(TelemetryConfig::default().validate().is_ok());

        let overflowing = TelemetryConfig::from_json(r#"{"stress_weight_tab_switch": 4000000000}"#)
            .unwrap();
        let err = SessionSummarizer::new(overflowing).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidTelemetryConfig(_)));
        assert!(err.is_configuration());

        let huge_window =
            TelemetryConfig::from_json(r#"{"rapid_click_window": 18446744073709551615}"#).unwrap();
        assert!(SessionSummarizer::new(huge_window).is_err());

        let rejected = [
            TelemetryConfig {
                rapid_click_window: 0,
                ..TelemetryConfig::default()
            },
            TelemetryConfig {
                rapid_click_min_intervals: 6,
                ..TelemetryConfig::default()
            },
            TelemetryConfig {
                hesitation_min_gap_ms: 10_000,
                ..TelemetryConfig::default()
            },
            TelemetryConfig {
                paste_penalty: -1.0,
                ..TelemetryConfig::default()
            },
            TelemetryConfig {
                anomaly_weight_timeout: f64::NAN,
                ..TelemetryConfig::default()
            },
            TelemetryConfig {
                stress_medium_threshold: 20,
                ..TelemetryConfig::default()
            },
            TelemetryConfig {
                confidence_base: 120.0,
                ..TelemetryConfig::default()
            },
        ];
        for config in rejected {
            assert!(config.validate().is_err(), "{:?}", config);
        }
    }

    #[test]
    fn test_max_stress_weights_summarize() {
        let config = TelemetryConfig {
            stress_weight_pointer_burst: MAX_STRESS_WEIGHT,
            stress_weight_rapid_click: MAX_STRESS_WEIGHT,
            stress_weight_tab_switch: MAX_STRESS_WEIGHT,
            ..TelemetryConfig::default()
        };
        let summarizer = SessionSummarizer::new(config).unwrap();
        let mut s = session();
        s.record(TelemetryEvent::visibility(0, true));
        s.record(TelemetryEvent::visibility(100, false));
        s.record(TelemetryEvent::visibility(200, true));

        let summary = summarizer.summarize(&s);
        assert_eq!(summary.stress_points, 2 * MAX_STRESS_WEIGHT);
        assert_eq!(summary.stress_level, StressLevel::High);
    }

    #[test]
    fn test_trust_and_risk_signals() {
        let summary = timed_session(&[4000, 6000, 5000]).summarize();
        assert_eq!(
            summary.trust_signals,
            vec![
                TrustSignal::LowCorrections,
                TrustSignal::ThoughtfulResponses,
                TrustSignal::SmoothInteraction,
                TrustSignal::HighFocus,
                TrustSignal::HighCompletion,
            ]
        );
        assert!(summary.risk_signals.is_empty());
        assert_eq!(summary.trust_balance(), 5);

        let mut s = timed_session(&[500, 600, 700]);
        for i in 0..3 {
            s.record(TelemetryEvent::paste(2_000 + i * 10));
        }
        for i in 0..5 {
            s.record(TelemetryEvent::pointer_click(3_000 + i * 100, 1.0, 1.0));
        }
        let summary = s.summarize();
        assert_eq!(
            summary.risk_signals,
            vec![
                RiskSignal::RushingThrough,
                RiskSignal::FrustrationDetected,
                RiskSignal::PotentialAutomation,
            ]
        );
        assert!(!summary.trust_signals.contains(&TrustSignal::SmoothInteraction));
        assert!(!summary.trust_signals.contains(&TrustSignal::ThoughtfulResponses));
    }

    #[test]
    fn test_cognitive_load_levels() {
        assert_eq!(timed_session(&[4000]).summarize().cognitive_load, CognitiveLoad::Low);

        let mut s = session();
        s.record(TelemetryEvent::pointer_move(0, 0.0, 0.0));
        s.record(TelemetryEvent::pointer_move(40_000, 0.0, 0.0));
        let summary = s.summarize();
        assert_eq!(summary.longest_pause_ms, 40_000);
        assert_eq!(summary.cognitive_load, CognitiveLoad::Moderate);

        let mut s = session();
        for i in 0..5u64 {
            s.record(TelemetryEvent::pointer_move(i * 31_000, 0.0, 0.0));
        }
        for i in 0..5u64 {
            s.record(TelemetryEvent::key_down(124_100 + i, "Delete"));
        }
        let summary = s.summarize();
        assert_eq!(summary.anomalies.unusual_pauses, 4);
        assert_eq!(summary.correction_count, 5);
        assert_eq!(summary.cognitive_load, CognitiveLoad::High);
        assert!(summary
            .insights
            .iter()
            .any(|i| i.starts_with("High cognitive load")));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = TelemetryConfig {
            confidence_base: 100.0,
            ..TelemetryConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(TelemetryConfig::from_json(&json).unwrap(), config);

        let partial = TelemetryConfig::from_json(r#"{"paste_penalty": 20.0}"#).unwrap();
        assert_eq!(partial.paste_penalty, 20.0);
        assert_eq!(partial.confidence_base, 80.0);
    }
}
