//! Hiring assessment dimensions (`candidate-assessment`)
//!
//! Five behavioral dimensions read the session summary (40% of the default
//! weight) and five response dimensions read specific scenario questions
//! (60%). Response dimensions start from a base and only move when their
//! question was answered.

use crate::scoring::algorithms::{bounded, Dimension, ScoringInput};
use crate::telemetry::StressLevel;
use serde_json::Value;

pub const DIMENSIONS: &[Dimension] = &[
    Dimension {
        name: "confidence",
        default_weight: 0.10,
        calculate: confidence,
    },
    Dimension {
        name: "stress_management",
        default_weight: 0.10,
        calculate: stress_management,
    },
    Dimension {
        name: "attention",
        default_weight: 0.08,
        calculate: attention,
    },
    Dimension {
        name: "honesty",
        default_weight: 0.08,
        calculate: honesty,
    },
    Dimension {
        name: "engagement",
        default_weight: 0.04,
        calculate: engagement,
    },
    Dimension {
        name: "ethical",
        default_weight: 0.18,
        calculate: ethical,
    },
    Dimension {
        name: "decision_making",
        default_weight: 0.15,
        calculate: decision_making,
    },
    Dimension {
        name: "communication",
        default_weight: 0.12,
        calculate: communication,
    },
    Dimension {
        name: "problem_solving",
        default_weight: 0.09,
        calculate: problem_solving,
    },
    Dimension {
        name: "teamwork",
        default_weight: 0.06,
        calculate: teamwork,
    },
];

const ETHICAL_QUESTIONS: [&str; 2] = ["ethical_boundary", "confidence_under_ignorance"];
const DECISION_QUESTIONS: [&str; 3] = [
    "pressure_response",
    "risk_young_conservative",
    "risk_old_aggressive",
];

fn confidence(input: &ScoringInput<'_>) -> f64 {
    bounded(input.summary.confidence_score)
}

/// Penalize elevated stress, but credit candidates who stayed confident under it
fn stress_management(input: &ScoringInput<'_>) -> f64 {
    let summary = input.summary;
    let mut score = match summary.stress_level {
        StressLevel::High => 60.0,
        StressLevel::Medium => 80.0,
        StressLevel::Low => 100.0,
    };
    if summary.stress_level == StressLevel::High && summary.confidence_score > 70.0 {
        score += 25.0;
    }
    bounded(score)
}

fn attention(input: &ScoringInput<'_>) -> f64 {
    let summary = input.summary;
    let tabs = summary.tab_switch_count as f64;
    let mut score = 100.0 - (tabs * 5.0).min(30.0) - (summary.anomaly_score * 2.0).min(25.0);
    if summary.tab_switch_count == 0 && summary.anomaly_score < 5.0 {
        score += 15.0;
    }
    bounded(score)
}

fn honesty(input: &ScoringInput<'_>) -> f64 {
    let anomalies = &input.summary.anomalies;
    let mut score = 100.0;
    if anomalies.dev_tools_opened > 0 {
        score -= 50.0;
    }
    if anomalies.right_click_attempts > 0 {
        score -= 20.0;
    }
    if anomalies.rapid_clicking > 5 {
        score -= 15.0;
    }
    bounded(score)
}

fn engagement(input: &ScoringInput<'_>) -> f64 {
    let summary = input.summary;
    let skipped = summary.skipped_questions;
    let timeouts = summary.anomalies.timeouts;
    let mut score =
        100.0 - (skipped as f64 * 10.0).min(30.0) - (timeouts as f64 * 15.0).min(25.0);
    if skipped == 0 && timeouts == 0 {
        score += 20.0;
    }
    bounded(score)
}

fn ethical(input: &ScoringInput<'_>) -> f64 {
    let r = input.responses;
    let score = ETHICAL_QUESTIONS
        .iter()
        .fold(100.0, |score, question| match r.text(question) {
            Some("consider_terms") | Some("explore_legal") => score - 60.0,
            Some("fake_knowledge") => score - 40.0,
            Some("general_response") => score - 20.0,
            _ => score,
        });
    bounded(score)
}

fn decision_making(input: &ScoringInput<'_>) -> f64 {
    let r = input.responses;
    let score = DECISION_QUESTIONS
        .iter()
        .fold(70.0, |score, question| match r.text(question) {
            Some("prepare_first") | Some("educate") => score + 10.0,
            Some("immediate_answer") | Some("support") => score + 5.0,
            _ => score,
        });
    bounded(score)
}

/// Written panic-email response: length and a professional greeting
fn communication(input: &ScoringInput<'_>) -> f64 {
    let mut score = 70.0;
    if let Some(email) = input.responses.text("email_response_panic") {
        if email.chars().count() > 50 {
            score += 15.0;
        }
        let opening = email.trim_start().to_lowercase();
        if opening.starts_with("dear") || opening.starts_with("hello") {
            score += 10.0;
        }
    }
    bounded(score)
}

/// Priority matrix: credit for putting the nervous client or compliance first
fn problem_solving(input: &ScoringInput<'_>) -> f64 {
    let mut score = 70.0;
    let first = match input.responses.value("priority_matrix") {
        Some(Value::Array(items)) => items.first(),
        _ => None,
    };
    let first_id = first.and_then(|item| match item {
        Value::String(s) => Some(s.as_str()),
        other => other.get("id").and_then(Value::as_str),
    });
    if matches!(first_id, Some("nervous_client") | Some("compliance")) {
        score += 15.0;
    }
    bounded(score)
}

/// Day simulation: credit any decision that brings in the team or a colleague
fn teamwork(input: &ScoringInput<'_>) -> f64 {
    let mut score = 70.0;
    if let Some(Value::Array(decisions)) = input.responses.value("day_simulation") {
        let team_oriented = decisions.iter().any(|d| {
            d.get("decision")
                .and_then(Value::as_str)
                .map(|text| text.contains("team") || text.contains("colleague"))
                .unwrap_or(false)
        });
        if team_oriented {
            score += 15.0;
        }
    }
    bounded(score)
}
