//! Shared response types
//!
//! A `ResponseSet` is the candidate's answer sheet keyed by question id. Question
//! ids and option vocabularies belong to the question catalog; nothing here
//! validates them, and an unknown id is simply never looked up.

use crate::error::ScoringError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Finding severity shared by consistency findings and recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Points deducted from the consistency score for one finding
    pub fn penalty(&self) -> u8 {
        match self {
            Severity::High => 20,
            Severity::Medium => 10,
            Severity::Low => 5,
        }
    }
}

/// Optional per-answer metadata captured by the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
    /// Any other client-supplied keys, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One recorded answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EntryRepr")]
pub struct ResponseEntry {
    /// Any JSON-compatible scalar or array
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

impl ResponseEntry {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            recorded_at: None,
            metadata: None,
        }
    }
}

/// Wire shape: either `{ "value": ..., "recorded_at": ..., "metadata": ... }`
/// or the bare answer value.
#[derive(Deserialize)]
#[serde(untagged)]
enum EntryRepr {
    Full {
        value: Value,
        #[serde(default)]
        recorded_at: Option<DateTime<Utc>>,
        #[serde(default)]
        metadata: Option<ResponseMetadata>,
    },
    Bare(Value),
}

impl From<EntryRepr> for ResponseEntry {
    fn from(repr: EntryRepr) -> Self {
        match repr {
            EntryRepr::Full {
                value,
                recorded_at,
                metadata,
            } => ResponseEntry {
                value,
                recorded_at,
                metadata,
            },
            EntryRepr::Bare(value) => ResponseEntry::new(value),
        }
    }
}

/// Mapping from question id to recorded answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet(BTreeMap<String, ResponseEntry>);

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `question_id -> answer`
    pub fn from_json(json: &str) -> Result<Self, ScoringError> {
        serde_json::from_str(json)
            .map_err(|e| ScoringError::ParseError(format!("Failed to parse responses: {}", e)))
    }

    /// Builder-style insert of a bare answer value
    pub fn with(mut self, question_id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(question_id, value);
        self
    }

    /// Record an answer, replacing any previous answer for the same id
    pub fn insert(&mut self, question_id: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(question_id.into(), ResponseEntry::new(value));
    }

    pub fn insert_entry(&mut self, question_id: impl Into<String>, entry: ResponseEntry) {
        self.0.insert(question_id.into(), entry);
    }

    pub fn get(&self, question_id: &str) -> Option<&ResponseEntry> {
        self.0.get(question_id)
    }

    pub fn value(&self, question_id: &str) -> Option<&Value> {
        self.0.get(question_id).map(|e| &e.value)
    }

    pub fn contains_key(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    /// String answer, if the answer is a JSON string
    pub fn text(&self, question_id: &str) -> Option<&str> {
        self.value(question_id).and_then(Value::as_str)
    }

    /// True when the answer is exactly the given option
    pub fn is(&self, question_id: &str, option: &str) -> bool {
        self.text(question_id) == Some(option)
    }

    /// String selections of a multi-select answer.
    ///
    /// A plain string answer counts as a single selection; non-string array
    /// members are skipped.
    pub fn list(&self, question_id: &str) -> Vec<&str> {
        match self.value(question_id) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(s)) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }

    /// Number of array members (of any type), zero for non-arrays
    pub fn list_len(&self, question_id: &str) -> usize {
        match self.value(question_id) {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    /// True when a multi-select answer includes the given option
    pub fn selects(&self, question_id: &str, option: &str) -> bool {
        self.list(question_id).contains(&option)
    }

    /// Numeric answer. Numeric strings such as `"250000"` or `"1,500"` are
    /// accepted; anything else is absent.
    pub fn number(&self, question_id: &str) -> Option<f64> {
        let parsed = match self.value(question_id)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|n| n.is_finite())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResponseEntry)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ResponseSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ResponseSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// Render an answer value as a short human-readable token
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
