//! Raw telemetry adapter
//!
//! Converts client-submitted JSON events into typed `TelemetryEvent`s. The
//! client endpoint is untrusted, so this is a permissive consumer: unknown event
//! types and events missing a required field are dropped (logged at debug),
//! and malformed optional fields fall back to `None`.

use crate::error::ScoringError;
use crate::telemetry::session::TelemetrySession;
use crate::telemetry::types::{TelemetryEvent, TelemetryEventKind};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Envelope for a whole session submitted as JSON
#[derive(Debug, Deserialize)]
struct RawSession {
    #[serde(default, alias = "sessionId")]
    session_id: Option<String>,
    #[serde(default, alias = "startedAt")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    events: Vec<Value>,
}

/// Adapter for converting raw client events into typed events
pub struct TelemetryAdapter;

impl TelemetryAdapter {
    /// Parse a session envelope `{ session_id, started_at, events: [...] }`.
    ///
    /// Only a structurally invalid envelope is an error; individual events are
    /// filtered permissively.
    pub fn parse_session(json: &str) -> Result<TelemetrySession, ScoringError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ScoringError::ParseError(format!("Failed to parse session: {}", e)))?;
        Self::session_from_value(value)
    }

    /// Build a session from an already-parsed envelope
    pub fn session_from_value(value: Value) -> Result<TelemetrySession, ScoringError> {
        let raw: RawSession = serde_json::from_value(value)
            .map_err(|e| ScoringError::ParseError(format!("Invalid session envelope: {}", e)))?;

        let mut session = match raw.session_id {
            Some(id) => TelemetrySession::with_id(id, raw.started_at.unwrap_or_else(Utc::now)),
            None => {
                let generated = TelemetrySession::new();
                match raw.started_at {
                    Some(started_at) => {
                        TelemetrySession::with_id(generated.session_id(), started_at)
                    }
                    None => generated,
                }
            }
        };

        let total = raw.events.len();
        let mut accepted = 0usize;
        for event in &raw.events {
            if session.record_raw(event) {
                accepted += 1;
            }
        }
        debug!(
            session_id = session.session_id(),
            total,
            accepted,
            "ingested raw telemetry"
        );

        Ok(session)
    }

    /// Convert one raw event.
    ///
    /// `fallback_offset_ms` is used when the event carries no usable offset.
    pub fn parse_event(raw: &Value, fallback_offset_ms: u64) -> Option<TelemetryEvent> {
        let obj = match raw.as_object() {
            Some(obj) => obj,
            None => {
                debug!("dropping non-object telemetry event");
                return None;
            }
        };

        let event_type = match obj
            .get("type")
            .or_else(|| obj.get("event_type"))
            .and_then(Value::as_str)
        {
            Some(t) => normalize_type(t),
            None => {
                debug!("dropping telemetry event without a type");
                return None;
            }
        };

        let offset_ms = ["offset_ms", "offsetMs", "t", "time"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_f64))
            .filter(|v| v.is_finite())
            .map(|v| v.max(0.0) as u64)
            .unwrap_or(fallback_offset_ms);

        let number = |key: &str| number_field(obj, key);
        let question_id = || text_field(obj, &["question_id", "questionId"]);

        let kind = match event_type.as_str() {
            "pointermove" | "mousemove" => TelemetryEventKind::PointerMove {
                x: number("x"),
                y: number("y"),
            },
            "pointerclick" | "click" => TelemetryEventKind::PointerClick {
                x: number("x"),
                y: number("y"),
            },
            "keydown" => TelemetryEventKind::KeyDown {
                key: text_field(obj, &["key"]),
            },
            "paste" => TelemetryEventKind::Paste {
                field: text_field(obj, &["field"]),
            },
            "visibilitychange" => match obj.get("hidden").and_then(Value::as_bool) {
                Some(hidden) => TelemetryEventKind::VisibilityChange { hidden },
                None => {
                    debug!("dropping visibility change without hidden flag");
                    return None;
                }
            },
            "questionstart" => TelemetryEventKind::QuestionStart {
                question_id: required(question_id(), "question_start")?,
            },
            "questionend" => TelemetryEventKind::QuestionEnd {
                question_id: required(question_id(), "question_end")?,
                answer: obj.get("answer").cloned(),
            },
            "answerchange" => TelemetryEventKind::AnswerChange {
                question_id: required(question_id(), "answer_change")?,
            },
            "contextmenu" | "rightclick" => TelemetryEventKind::ContextMenu,
            "devtoolsopened" | "devtools" => TelemetryEventKind::DevToolsOpened,
            "questiontimeout" | "timeout" => TelemetryEventKind::QuestionTimeout {
                question_id: question_id(),
            },
            other => {
                debug!(event_type = other, "ignoring unknown telemetry event type");
                return None;
            }
        };

        Some(TelemetryEvent::new(offset_ms, kind))
    }
}

/// Lowercase and strip separators so `pointer_move`, `pointerMove` and
/// `pointer-move` all match.
fn normalize_type(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

fn required(value: Option<String>, event_type: &str) -> Option<String> {
    if value.is_none() {
        debug!(event_type, "dropping event without question id");
    }
    value
}
