//! Insight and recommendation templates
//!
//! Pure functions of the finished score; nothing here feeds back into the
//! numbers.

use crate::scoring::scorer::DimensionScore;
use crate::telemetry::{EnergyPattern, SessionSummary};
use crate::types::Severity;
use serde::{Deserialize, Serialize};

/// Insight category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Priority,
    Strength,
    Concern,
    Behavioral,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            dimension: None,
            message: message.into(),
        }
    }

    fn for_dimension(kind: InsightKind, dimension: &str, message: String) -> Self {
        Self {
            kind,
            dimension: Some(dimension.to_string()),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Severity,
    pub message: String,
}

impl Recommendation {
    fn new(priority: Severity, message: &str) -> Self {
        Self {
            priority,
            message: message.to_string(),
        }
    }
}

/// Insights for a finished score, in a fixed order: overall priority,
/// per-dimension strengths and concerns in algorithm order, then behavior.
pub fn generate_insights(
    total_score: u8,
    dimensions: &[DimensionScore],
    summary: &SessionSummary,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if total_score > 85 {
        insights.push(Insight::new(
            InsightKind::Priority,
            "Scores in the top band - immediate action recommended",
        ));
    }

    for d in dimensions {
        if d.score > 80.0 {
            insights.push(Insight::for_dimension(
                InsightKind::Strength,
                &d.dimension,
                format!("Strong {} indicator ({:.0}/100)", d.dimension, d.score),
            ));
        } else if d.score < 40.0 {
            insights.push(Insight::for_dimension(
                InsightKind::Concern,
                &d.dimension,
                format!("Low {} score ({:.0}/100) may need follow-up", d.dimension, d.score),
            ));
        }
    }

    if summary.has_telemetry() && summary.engagement_score > 80.0 {
        insights.push(Insight::new(
            InsightKind::Behavioral,
            "Strong interest shown through interaction patterns",
        ));
    }
    if summary.energy_pattern == EnergyPattern::SignificantFatigue {
        insights.push(Insight::new(
            InsightKind::Warning,
            "Significant fatigue over the session; later answers may be less reliable",
        ));
    }

    insights
}

/// Lead qualification follow-up by score band
pub fn lead_recommendations(total_score: u8, _dimensions: &[DimensionScore]) -> Vec<Recommendation> {
    if total_score > 80 {
        vec![
            Recommendation::new(Severity::High, "Assign to senior sales representative"),
            Recommendation::new(Severity::High, "Schedule follow-up within 2 hours"),
            Recommendation::new(
                Severity::High,
                "Prepare custom demo focused on identified needs",
            ),
        ]
    } else if total_score > 60 {
        vec![
            Recommendation::new(Severity::Medium, "Add to nurture campaign"),
            Recommendation::new(Severity::Medium, "Send relevant case studies"),
            Recommendation::new(Severity::Medium, "Schedule follow-up within 24 hours"),
        ]
    } else {
        vec![
            Recommendation::new(Severity::Low, "Add to long-term nurture sequence"),
            Recommendation::new(Severity::Low, "Monitor for engagement signals"),
        ]
    }
}

/// Hiring follow-up: performance band, then stress and integrity follow-ups
pub fn candidate_recommendations(
    total_score: u8,
    dimensions: &[DimensionScore],
) -> Vec<Recommendation> {
    let mut out = vec![match total_score {
        90..=u8::MAX => Recommendation::new(
            Severity::High,
            "Excellent candidate with outstanding performance across all dimensions",
        ),
        80..=89 => Recommendation::new(
            Severity::Medium,
            "Strong candidate with solid performance and minor areas for development",
        ),
        70..=79 => Recommendation::new(
            Severity::Medium,
            "Good candidate with potential, requires focused development in key areas",
        ),
        _ => Recommendation::new(
            Severity::Low,
            "Candidate requires significant development before consideration",
        ),
    }];

    let score_of = |name: &str| {
        dimensions
            .iter()
            .find(|d| d.dimension == name)
            .map(|d| d.score)
    };
    if score_of("stress_management").map(|s| s < 70.0).unwrap_or(false) {
        out.push(Recommendation::new(
            Severity::Medium,
            "Consider stress management training and support systems",
        ));
    }
    if score_of("honesty").map(|s| s < 80.0).unwrap_or(false) {
        out.push(Recommendation::new(
            Severity::High,
            "Integrity concerns require immediate attention and investigation",
        ));
    }
    out
}

/// Behavior-only follow-up: overall band, then engagement, trust and load
pub fn behavioral_recommendations(
    total_score: u8,
    dimensions: &[DimensionScore],
) -> Vec<Recommendation> {
    let mut out = vec![if total_score > 70 {
        Recommendation::new(
            Severity::Medium,
            "Interaction behavior supports the responses - proceed with standard follow-up",
        )
    } else {
        Recommendation::new(Severity::Low, "Monitor for engagement signals")
    }];

    let score_of = |name: &str| {
        dimensions
            .iter()
            .find(|d| d.dimension == name)
            .map(|d| d.score)
    };
    if score_of("engagement").map(|s| s > 80.0).unwrap_or(false) {
        out.push(Recommendation::new(
            Severity::High,
            "Highly engaged - prioritize for immediate follow-up",
        ));
    }
    if score_of("trust").map(|s| s < 40.0).unwrap_or(false) {
        out.push(Recommendation::new(
            Severity::High,
            "Risk signals outweigh trust signals - verify responses before acting",
        ));
    }
    if score_of("cognitive_load").map(|s| s < 50.0).unwrap_or(false) {
        out.push(Recommendation::new(
            Severity::Medium,
            "High cognitive load - keep follow-up material short and concrete",
        ));
    }
    out
}
