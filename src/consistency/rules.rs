//! Consistency rule registry
//!
//! Each rule is an `{id, check}` pair: a pure predicate over the whole
//! `ResponseSet` that returns a finding or nothing. Rules never see each
//! other's verdicts, so any one of them can be evaluated in isolation.

use crate::types::{display_value, ResponseSet, Severity};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Answers that read as the "ideal" option on their question
pub const IDEALIZED_ANSWERS: [&str; 4] = ["achievement", "leadership", "strategic", "aggressive"];

/// Share of idealized answers above which gaming is suspected
pub const GAMING_THRESHOLD: f64 = 0.8;

/// Kind of a consistency finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    Contradiction,
    Unlikely,
    Concern,
    PotentialConflict,
    GamingSuspected,
    PatternDetected,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::Contradiction => "contradiction",
            FindingKind::Unlikely => "unlikely",
            FindingKind::Concern => "concern",
            FindingKind::PotentialConflict => "potential_conflict",
            FindingKind::GamingSuspected => "gaming_suspected",
            FindingKind::PatternDetected => "pattern_detected",
        }
    }
}

/// Verdict of one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn new(kind: FindingKind, severity: Severity, message: &str) -> Self {
        Self {
            kind,
            severity,
            message: message.to_string(),
        }
    }
}

/// A registered rule
#[derive(Clone, Copy)]
pub struct ConsistencyRule {
    pub id: &'static str,
    pub check: fn(&ResponseSet) -> Option<Finding>,
}

impl std::fmt::Debug for ConsistencyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsistencyRule").field("id", &self.id).finish()
    }
}

impl ConsistencyRule {
    pub fn evaluate(&self, responses: &ResponseSet) -> Option<Finding> {
        (self.check)(responses)
    }
}

/// The default rules, in evaluation order
pub fn default_rules() -> Vec<ConsistencyRule> {
    vec![
        ConsistencyRule {
            id: "leadership_consistency",
            check: leadership_consistency,
        },
        ConsistencyRule {
            id: "experience_skills_match",
            check: experience_skills_match,
        },
        ConsistencyRule {
            id: "motivation_values_alignment",
            check: motivation_values_alignment,
        },
        ConsistencyRule {
            id: "decision_style_consistency",
            check: decision_style_consistency,
        },
        ConsistencyRule {
            id: "client_approach_personality",
            check: client_approach_personality,
        },
        ConsistencyRule {
            id: "values_ranking_consistency",
            check: values_ranking_consistency,
        },
        ConsistencyRule {
            id: "gaming_detection",
            check: gaming_detection,
        },
    ]
}

fn leadership_consistency(r: &ResponseSet) -> Option<Finding> {
    (r.is("work_style", "coach") && !r.selects("strengths", "Leadership")).then(|| {
        Finding::new(
            FindingKind::Contradiction,
            Severity::Medium,
            "Selected coach work style but not leadership as strength",
        )
    })
}

fn experience_skills_match(r: &ResponseSet) -> Option<Finding> {
    (r.is("experience", "0-2") && r.selects("strengths", "Strategic Thinking")).then(|| {
        Finding::new(
            FindingKind::Unlikely,
            Severity::Low,
            "Entry level with strategic thinking is uncommon",
        )
    })
}

fn motivation_values_alignment(r: &ResponseSet) -> Option<Finding> {
    (r.is("motivation", "stability") && r.is("risk_tolerance", "aggressive")).then(|| {
        Finding::new(
            FindingKind::Contradiction,
            Severity::High,
            "Seeks stability but has aggressive risk tolerance",
        )
    })
}

fn decision_style_consistency(r: &ResponseSet) -> Option<Finding> {
    (r.is("decision_style", "analytical") && r.is("challenge_response", "act")).then(|| {
        Finding::new(
            FindingKind::Contradiction,
            Severity::Medium,
            "Analytical style but acts immediately on challenges",
        )
    })
}

fn client_approach_personality(r: &ResponseSet) -> Option<Finding> {
    (r.is("client_approach", "educator") && !r.selects("strengths", "Communication")).then(|| {
        Finding::new(
            FindingKind::Concern,
            Severity::Low,
            "Educator approach without communication strength",
        )
    })
}

fn values_ranking_consistency(r: &ResponseSet) -> Option<Finding> {
    let top_value = r.list("values_rank").first().copied();
    (top_value == Some("Work-Life Balance") && r.is("motivation", "achievement")).then(|| {
        Finding::new(
            FindingKind::PotentialConflict,
            Severity::Medium,
            "Top value is work-life balance but driven by achievement",
        )
    })
}

/// Fires when more than 80% of all answers are idealized options.
/// Only scalar string answers count toward the idealized total.
fn gaming_detection(r: &ResponseSet) -> Option<Finding> {
    let idealized = r
        .iter()
        .filter(|(_, entry)| {
            entry
                .value
                .as_str()
                .map(|v| IDEALIZED_ANSWERS.contains(&v))
                .unwrap_or(false)
        })
        .count();

    (idealized as f64 > r.len() as f64 * GAMING_THRESHOLD).then(|| {
        Finding::new(
            FindingKind::GamingSuspected,
            Severity::High,
            "Possible gaming - too many \"perfect\" answers",
        )
    })
}

/// Multi-select questions inspected by the selection-pattern pass
pub const PATTERN_QUESTIONS: [&str; 3] = ["strengths", "goals", "skills"];

/// Selection-pattern pass: a non-empty multi-select answer where every
/// selection carries the "Leadership" tag. Emits at most one finding.
pub fn selection_pattern(r: &ResponseSet) -> Option<Finding> {
    let detected = PATTERN_QUESTIONS.iter().any(|question| match r.value(question) {
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .all(|item| display_value(item).contains("Leadership")),
        _ => false,
    });

    detected.then(|| {
        Finding::new(
            FindingKind::PatternDetected,
            Severity::Medium,
            "Suspicious selection pattern detected",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(id: &str) -> ConsistencyRule {
        default_rules()
            .into_iter()
            .find(|r| r.id == id)
            .unwrap()
    }

    #[test]
    fn test_rule_order_is_stable() {
        let ids: Vec<_> = default_rules().iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![
                "leadership_consistency",
                "experience_skills_match",
                "motivation_values_alignment",
                "decision_style_consistency",
                "client_approach_personality",
                "values_ranking_consistency",
                "gaming_detection",
            ]
        );
    }

    #[test]
    fn test_leadership_consistency() {
        let rule = rule("leadership_consistency");
        let coach = ResponseSet::new().with("work_style", "coach");
        assert_eq!(rule.evaluate(&coach).unwrap().severity, Severity::Medium);

        let with_leadership = coach.clone().with("strengths", json!(["Leadership"]));
        assert!(rule.evaluate(&with_leadership).is_none());

        let other = ResponseSet::new().with("work_style", "solo");
        assert!(rule.evaluate(&other).is_none());
    }

    #[test]
    fn test_motivation_values_alignment_is_high() {
        let r = ResponseSet::new()
            .with("motivation", "stability")
            .with("risk_tolerance", "aggressive");
        let finding = rule("motivation_values_alignment").evaluate(&r).unwrap();
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.kind, FindingKind::Contradiction);
    }

    #[test]
    fn test_experience_and_client_approach() {
        let r = ResponseSet::new()
            .with("experience", "0-2")
            .with("strengths", json!(["Strategic Thinking"]))
            .with("client_approach", "educator");
        assert_eq!(
            rule("experience_skills_match").evaluate(&r).unwrap().kind,
            FindingKind::Unlikely
        );
        assert_eq!(
            rule("client_approach_personality").evaluate(&r).unwrap().kind,
            FindingKind::Concern
        );
    }

    #[test]
    fn test_values_ranking_uses_first_choice() {
        let r = ResponseSet::new()
            .with("values_rank", json!(["Work-Life Balance", "Growth"]))
            .with("motivation", "achievement");
        assert!(rule("values_ranking_consistency").evaluate(&r).is_some());

        let r = ResponseSet::new()
            .with("values_rank", json!(["Growth", "Work-Life Balance"]))
            .with("motivation", "achievement");
        assert!(rule("values_ranking_consistency").evaluate(&r).is_none());
    }

    #[test]
    fn test_gaming_detection_threshold() {
        let mut r: ResponseSet = (0..9).map(|i| (format!("q{i}"), "achievement")).collect();
        r.insert("q9", "balanced");
        let finding = rule("gaming_detection").evaluate(&r).unwrap();
        assert_eq!(finding.kind, FindingKind::GamingSuspected);
        assert_eq!(finding.severity, Severity::High);

        // exactly 80% does not fire
        let mut r: ResponseSet = (0..8).map(|i| (format!("q{i}"), "strategic")).collect();
        r.insert("q8", "x");
        r.insert("q9", "y");
        assert!(rule("gaming_detection").evaluate(&r).is_none());

        assert!(rule("gaming_detection").evaluate(&ResponseSet::new()).is_none());
    }

    #[test]
    fn test_selection_pattern() {
        let r = ResponseSet::new().with("goals", json!(["Leadership role", "Team Leadership"]));
        assert!(selection_pattern(&r).is_some());

        let mixed = ResponseSet::new().with("strengths", json!(["Leadership", "Analytics"]));
        assert!(selection_pattern(&mixed).is_none());

        let empty = ResponseSet::new().with("skills", json!([]));
        assert!(selection_pattern(&empty).is_none());
    }
}
