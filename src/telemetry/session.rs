//! Telemetry session accumulator
//!
//! A `TelemetrySession` is owned by whoever runs one assessment attempt. It is
//! a single-writer, append-only log of events plus per-question timing; all
//! derived metrics come from replaying it in `SessionSummarizer`.

use crate::telemetry::adapter::TelemetryAdapter;
use crate::telemetry::summary::SessionSummarizer;
use crate::telemetry::types::{QuestionTiming, SessionSummary, TelemetryEvent, TelemetryEventKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

/// Event log and question timing for one assessment attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySession {
    session_id: String,
    started_at: DateTime<Utc>,
    events: Vec<TelemetryEvent>,
    /// In first-seen order; a question id appears at most once
    timings: Vec<QuestionTiming>,
}

impl Default for TelemetrySession {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySession {
    /// Start a new session with a generated id, starting now
    pub fn new() -> Self {
        Self::with_id(format!("sess_{}", Uuid::new_v4().simple()), Utc::now())
    }

    /// Start a session with a caller-supplied id and start time
    pub fn with_id(session_id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            started_at,
            events: Vec::new(),
            timings: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn events(&self) -> &[TelemetryEvent] {
        &self.events
    }

    pub fn question_timings(&self) -> &[QuestionTiming] {
        &self.timings
    }

    pub fn question_timing(&self, question_id: &str) -> Option<&QuestionTiming> {
        self.timings.iter().find(|t| t.question_id == question_id)
    }

    /// True when nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.timings.is_empty()
    }

    /// Milliseconds between session start and `at`, floored at zero
    pub fn offset_at(&self, at: DateTime<Utc>) -> u64 {
        (at - self.started_at).num_milliseconds().max(0) as u64
    }

    /// Append one event. Question lifecycle events also update timing.
    pub fn record(&mut self, event: TelemetryEvent) {
        match &event.kind {
            TelemetryEventKind::QuestionStart { question_id } => {
                self.open_question(question_id, event.offset_ms);
            }
            TelemetryEventKind::QuestionEnd {
                question_id,
                answer,
            } => {
                self.close_question(question_id, event.offset_ms, answer.clone());
            }
            TelemetryEventKind::AnswerChange { question_id } => {
                if let Some(timing) = self.timing_mut(question_id) {
                    timing.answer_changes += 1;
                }
            }
            _ => {}
        }
        self.events.push(event);
    }

    /// Record a raw client event. Unknown or malformed events are dropped.
    ///
    /// Returns whether the event was accepted.
    pub fn record_raw(&mut self, raw: &Value) -> bool {
        let fallback = self.last_offset();
        match TelemetryAdapter::parse_event(raw, fallback) {
            Some(event) => {
                self.record(event);
                true
            }
            None => false,
        }
    }

    /// Begin timing a question
    pub fn start_question(&mut self, question_id: &str, offset_ms: u64) {
        self.record(TelemetryEvent::new(
            offset_ms,
            TelemetryEventKind::QuestionStart {
                question_id: question_id.to_string(),
            },
        ));
    }

    /// Close timing for a question and record its answer
    pub fn end_question(&mut self, question_id: &str, offset_ms: u64, answer: Option<Value>) {
        self.record(TelemetryEvent::new(
            offset_ms,
            TelemetryEventKind::QuestionEnd {
                question_id: question_id.to_string(),
                answer,
            },
        ));
    }

    /// Derive the session summary with default thresholds
    pub fn summarize(&self) -> SessionSummary {
        SessionSummarizer::default().summarize(self)
    }

    fn last_offset(&self) -> u64 {
        self.events.last().map(|e| e.offset_ms).unwrap_or(0)
    }

    fn timing_mut(&mut self, question_id: &str) -> Option<&mut QuestionTiming> {
        self.timings.iter_mut().find(|t| t.question_id == question_id)
    }

    fn open_question(&mut self, question_id: &str, offset_ms: u64) {
        match self.timing_mut(question_id) {
            // Restart while still open: the latest start wins
            Some(timing) if timing.is_open() => timing.start_offset_ms = Some(offset_ms),
            Some(timing) if timing.start_offset_ms.is_none() => {
                timing.start_offset_ms = Some(offset_ms);
            }
            // Re-entry after close keeps the original start
            Some(timing) => timing.end_offset_ms = None,
            None => self
                .timings
                .push(QuestionTiming::started(question_id, offset_ms)),
        }
    }

    fn close_question(&mut self, question_id: &str, offset_ms: u64, answer: Option<Value>) {
        match self.timing_mut(question_id) {
            Some(timing) if timing.is_open() => {
                let start = timing.start_offset_ms.unwrap_or(offset_ms);
                timing.end_offset_ms = Some(offset_ms);
                timing.duration_ms = Some(offset_ms.saturating_sub(start));
                if answer.is_some() {
                    timing.answer = answer;
                }
            }
            Some(timing) => {
                debug!(question_id, "question end without open start");
                if answer.is_some() {
                    timing.answer = answer;
                }
            }
            None => {
                debug!(question_id, "question end without any start");
                let mut timing = QuestionTiming::unstarted(question_id);
                timing.answer = answer;
                self.timings.push(timing);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn session() -> TelemetrySession {
        TelemetrySession::with_id("test", Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap())
    }

    #[test]
    fn test_question_timing_lifecycle() {
        let mut s = session();
        s.start_question("q1", 1000);
        s.end_question("q1", 4500, Some(json!("coach")));

        let timing = s.question_timing("q1").unwrap();
        assert_eq!(timing.start_offset_ms, Some(1000));
        assert_eq!(timing.end_offset_ms, Some(4500));
        assert_eq!(timing.duration_ms, Some(3500));
        assert_eq!(timing.answer, Some(json!("coach")));
        assert_eq!(s.events().len(), 2);
    }

    #[test]
    fn test_restart_while_open_overwrites_start() {
        let mut s = session();
        s.start_question("q1", 1000);
        s.start_question("q1", 2000);
        s.end_question("q1", 2500, None);

        let timing = s.question_timing("q1").unwrap();
        assert_eq!(timing.start_offset_ms, Some(2000));
        assert_eq!(timing.duration_ms, Some(500));
        assert_eq!(s.question_timings().len(), 1);
    }

    #[test]
    fn test_reentry_keeps_original_start() {
        let mut s = session();
        s.start_question("q1", 1000);
        s.end_question("q1", 2000, Some(json!("a")));
        s.start_question("q1", 5000);
        assert!(s.question_timing("q1").unwrap().end_offset_ms.is_none());

        s.end_question("q1", 6000, Some(json!("b")));
        let timing = s.question_timing("q1").unwrap();
        assert_eq!(timing.start_offset_ms, Some(1000));
        assert_eq!(timing.end_offset_ms, Some(6000));
        assert_eq!(timing.duration_ms, Some(5000));
        assert_eq!(timing.answer, Some(json!("b")));
    }

    #[test]
    fn test_end_without_start_records_answer_only() {
        let mut s = session();
        s.end_question("q9", 3000, Some(json!(42)));

        let timing = s.question_timing("q9").unwrap();
        assert_eq!(timing.start_offset_ms, None);
        assert_eq!(timing.end_offset_ms, None);
        assert_eq!(timing.duration_ms, None);
        assert_eq!(timing.answer, Some(json!(42)));
    }

    #[test]
    fn test_out_of_order_end_never_negative() {
        let mut s = session();
        s.start_question("q1", 5000);
        s.end_question("q1", 1000, None);
        assert_eq!(s.question_timing("q1").unwrap().duration_ms, Some(0));
    }

    #[test]
    fn test_answer_change_counts_on_timing() {
        let mut s = session();
        s.start_question("q1", 0);
        s.record(TelemetryEvent::new(
            500,
            TelemetryEventKind::AnswerChange {
                question_id: "q1".to_string(),
            },
        ));
        assert_eq!(s.question_timing("q1").unwrap().answer_changes, 1);
    }

    #[test]
    fn test_record_raw_ignores_unknown_types() {
        let mut s = session();
        assert!(!s.record_raw(&json!({ "type": "hologram", "offset_ms": 10 })));
        assert!(s.record_raw(&json!({ "type": "paste", "offset_ms": 10 })));
        assert_eq!(s.events().len(), 1);
    }

    #[test]
    fn test_offset_at_floors_at_zero() {
        let s = session();
        let before = Utc.with_ymd_and_hms(2024, 1, 15, 13, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 5).unwrap();
        assert_eq!(s.offset_at(before), 0);
        assert_eq!(s.offset_at(after), 5000);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = TelemetrySession::new();
        let b = TelemetrySession::new();
        assert_ne!(a.session_id(), b.session_id());
        assert!(a.is_empty());
    }
}
