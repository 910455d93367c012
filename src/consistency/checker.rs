//! Consistency checker
//!
//! Evaluates the rule registry against one `ResponseSet`, then the
//! selection-pattern pass, and folds the findings into a `ConsistencyReport`.

use crate::consistency::rules::{default_rules, selection_pattern, ConsistencyRule, FindingKind};
use crate::types::{ResponseSet, Severity};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rule id reported for selection-pattern findings
pub const SELECTION_PATTERN_RULE: &str = "selection_pattern";

/// Integrity band derived from the consistency score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrity {
    High,
    Moderate,
    Questionable,
    Low,
}

impl Integrity {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Integrity::High,
            70..=89 => Integrity::Moderate,
            50..=69 => Integrity::Questionable,
            _ => Integrity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Integrity::High => "high",
            Integrity::Moderate => "moderate",
            Integrity::Questionable => "questionable",
            Integrity::Low => "low",
        }
    }
}

/// One triggered rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    pub rule_id: String,
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub severity: Severity,
    pub message: String,
}

/// Result of a consistency check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// 0-100, starts at 100 and only decreases
    pub score: u8,
    /// In rule registration order, selection pattern last
    pub contradictions: Vec<Contradiction>,
    pub integrity: Integrity,
    pub recommendations: Vec<String>,
}

impl ConsistencyReport {
    pub fn has_severity(&self, severity: Severity) -> bool {
        self.contradictions.iter().any(|c| c.severity == severity)
    }

    pub fn has_kind(&self, kind: FindingKind) -> bool {
        self.contradictions.iter().any(|c| c.kind == kind)
    }
}

/// Rule-based contradiction detector
#[derive(Debug, Clone)]
pub struct ConsistencyChecker {
    rules: Vec<ConsistencyRule>,
}

impl Default for ConsistencyChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsistencyChecker {
    /// Checker with the default rule set
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    /// Checker with a caller-supplied rule set, evaluated in the given order
    pub fn with_rules(rules: Vec<ConsistencyRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ConsistencyRule] {
        &self.rules
    }

    pub fn check(&self, responses: &ResponseSet) -> ConsistencyReport {
        let mut contradictions: Vec<Contradiction> = self
            .rules
            .iter()
            .filter_map(|rule| {
                rule.evaluate(responses).map(|finding| Contradiction {
                    rule_id: rule.id.to_string(),
                    kind: finding.kind,
                    severity: finding.severity,
                    message: finding.message,
                })
            })
            .collect();

        if let Some(finding) = selection_pattern(responses) {
            contradictions.push(Contradiction {
                rule_id: SELECTION_PATTERN_RULE.to_string(),
                kind: finding.kind,
                severity: finding.severity,
                message: finding.message,
            });
        }

        let penalty: u32 = contradictions
            .iter()
            .map(|c| c.severity.penalty() as u32)
            .sum();
        let score = 100u32.saturating_sub(penalty) as u8;

        let integrity = Integrity::from_score(score);
        let recommendations = recommendations(score, &contradictions);

        debug!(
            responses = responses.len(),
            findings = contradictions.len(),
            score,
            integrity = integrity.as_str(),
            "checked response consistency"
        );

        ConsistencyReport {
            score,
            contradictions,
            integrity,
            recommendations,
        }
    }
}

fn recommendations(score: u8, contradictions: &[Contradiction]) -> Vec<String> {
    let mut out = Vec::new();
    if score < 70 {
        out.push("Schedule follow-up interview to clarify contradictions".to_string());
    }
    if contradictions.iter().any(|c| c.severity == Severity::High) {
        out.push("Red flags detected - flag for manual review".to_string());
    }
    if contradictions
        .iter()
        .any(|c| c.kind == FindingKind::GamingSuspected)
    {
        out.push("Possible gaming detected - verify responses in interview".to_string());
    }
    out
}
