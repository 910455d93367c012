//! Lead qualification dimensions (`12-dimensional`)
//!
//! Each calculator starts from a fixed base, adds points for the answers and
//! telemetry signals it recognizes, and clamps through `bounded`. Unknown or
//! missing answers fall back to the value listed on each calculator.

use crate::scoring::algorithms::{bounded, Dimension, ScoringInput};
use crate::types::ResponseSet;

pub const DIMENSIONS: &[Dimension] = &[
    Dimension {
        name: "financial_capacity",
        default_weight: 0.10,
        calculate: financial_capacity,
    },
    Dimension {
        name: "urgency",
        default_weight: 0.10,
        calculate: urgency,
    },
    Dimension {
        name: "sophistication",
        default_weight: 0.08,
        calculate: sophistication,
    },
    Dimension {
        name: "engagement",
        default_weight: 0.08,
        calculate: engagement,
    },
    Dimension {
        name: "authority",
        default_weight: 0.09,
        calculate: authority,
    },
    Dimension {
        name: "budget",
        default_weight: 0.09,
        calculate: budget,
    },
    Dimension {
        name: "need",
        default_weight: 0.09,
        calculate: need,
    },
    Dimension {
        name: "timeline",
        default_weight: 0.08,
        calculate: timeline,
    },
    Dimension {
        name: "decision_process",
        default_weight: 0.08,
        calculate: decision_process,
    },
    Dimension {
        name: "champion_strength",
        default_weight: 0.07,
        calculate: champion_strength,
    },
    Dimension {
        name: "technical_fit",
        default_weight: 0.07,
        calculate: technical_fit,
    },
    Dimension {
        name: "cultural_fit",
        default_weight: 0.07,
        calculate: cultural_fit,
    },
];

/// Score for an answer from a fixed option table
fn lookup(table: &[(&str, f64)], answer: Option<&str>) -> Option<f64> {
    let answer = answer?;
    table.iter().find(|(k, _)| *k == answer).map(|(_, v)| *v)
}

/// Non-negative amount, zero when missing or unparsable
fn amount(r: &ResponseSet, question_id: &str) -> f64 {
    r.number(question_id).map(|n| n.max(0.0)).unwrap_or(0.0)
}

/// Share of `selected` found in `accepted`, 0 when nothing is selected
fn overlap(selected: &[&str], accepted: &[String]) -> f64 {
    if selected.is_empty() {
        return 0.0;
    }
    let matched = selected
        .iter()
        .filter(|s| accepted.iter().any(|a| a.as_str() == **s))
        .count();
    matched as f64 / selected.len() as f64
}

/// Portfolio, income and assets, each capped. Missing amounts count as 0.
fn financial_capacity(input: &ScoringInput<'_>) -> f64 {
    let r = input.responses;
    let score = (amount(r, "portfolio") / 100_000.0).min(40.0)
        + (amount(r, "income") / 10_000.0).min(30.0)
        + (amount(r, "assets") / 200_000.0).min(30.0);
    bounded(score)
}

/// Timeline answer (missing: exploring = 25, unknown: 50) plus quick,
/// focused sessions.
fn urgency(input: &ScoringInput<'_>) -> f64 {
    const TIMELINE: &[(&str, f64)] = &[
        ("immediate", 100.0),
        ("this_month", 90.0),
        ("quarter", 75.0),
        ("year", 50.0),
        ("exploring", 25.0),
    ];
    let answer = input.responses.text("timeline").unwrap_or("exploring");
    let mut score = lookup(TIMELINE, Some(answer)).unwrap_or(50.0);

    let summary = input.summary;
    if summary.timed_question_count > 0 && summary.average_response_time_ms < 5_000.0 {
        score += 10.0;
    }
    if summary.has_telemetry() && summary.focus_ratio > 0.9 {
        score += 10.0;
    }
    bounded(score)
}

/// Self-reported experience plus pointer activity
fn sophistication(input: &ScoringInput<'_>) -> f64 {
    let mut score = 40.0;
    score += match input.responses.text("experience") {
        Some("expert") => 30.0,
        Some("advanced") => 20.0,
        Some("intermediate") => 10.0,
        _ => 0.0,
    };
    if input.summary.pointer_move_count > 100 {
        score += 10.0;
    }
    bounded(score)
}

fn engagement(input: &ScoringInput<'_>) -> f64 {
    let summary = input.summary;
    let mut score = match summary.total_time_ms {
        t if t > 60_000 => 30.0,
        t if t > 30_000 => 20.0,
        t if t > 15_000 => 10.0,
        _ => 0.0,
    };
    score += (summary.interaction_count as f64 * 2.0).min(30.0);
    score += summary.focus_ratio * 20.0;
    if summary.tab_switch_count < 2 {
        score += 20.0;
    }
    bounded(score)
}

/// Job level (missing or unknown: individual = 30), boosted for decision makers
fn authority(input: &ScoringInput<'_>) -> f64 {
    const LEVELS: &[(&str, f64)] = &[
        ("c_level", 100.0),
        ("vp", 85.0),
        ("director", 70.0),
        ("manager", 55.0),
        ("team_lead", 45.0),
        ("individual", 30.0),
    ];
    let mut score = lookup(LEVELS, input.responses.text("job_level")).unwrap_or(30.0);
    if input.responses.is("decision_maker", "yes") {
        score = (score * 1.2).min(100.0);
    }
    bounded(score)
}

/// Budget status (missing: none = 10, unknown: 25) scaled by budget size
fn budget(input: &ScoringInput<'_>) -> f64 {
    const STATUS: &[(&str, f64)] = &[
        ("allocated", 100.0),
        ("approved", 85.0),
        ("requested", 60.0),
        ("planned", 40.0),
        ("exploring", 25.0),
        ("none", 10.0),
    ];
    let r = input.responses;
    let status = r.text("budget_status").unwrap_or("none");
    let mut score = lookup(STATUS, Some(status)).unwrap_or(25.0);

    let size = amount(r, "budget_size");
    if size > 1_000_000.0 {
        score = (score * 1.3).min(100.0);
    } else if size > 100_000.0 {
        score = (score * 1.1).min(100.0);
    }
    bounded(score)
}

/// Pain points, dissatisfaction with the current solution and problem severity
fn need(input: &ScoringInput<'_>) -> f64 {
    let r = input.responses;
    let mut score = 50.0;
    score += r.list_len("pain_points") as f64 * 10.0;

    if r.is("current_solution", "none") {
        score += 20.0;
    } else if r.number("satisfaction").map(|s| s < 5.0).unwrap_or(false) {
        score += 15.0;
    }

    score += match r.text("problem_severity") {
        Some("critical") => 30.0,
        Some("high") => 20.0,
        Some("low") => 5.0,
        _ => 10.0,
    };
    bounded(score)
}

/// Purchase timeline (missing: exploring = 15), then project start, then 25
fn timeline(input: &ScoringInput<'_>) -> f64 {
    const TIMELINE: &[(&str, f64)] = &[
        ("immediate", 100.0),
        ("this_month", 85.0),
        ("this_quarter", 70.0),
        ("this_year", 50.0),
        ("next_year", 30.0),
        ("exploring", 15.0),
    ];
    let r = input.responses;
    let purchase = r.text("purchase_timeline").unwrap_or("exploring");
    let score = lookup(TIMELINE, Some(purchase))
        .or_else(|| lookup(TIMELINE, r.text("project_start")))
        .unwrap_or(25.0);
    bounded(score)
}

/// Decision rights, stakeholder count (missing: 5) and approval process
fn decision_process(input: &ScoringInput<'_>) -> f64 {
    let r = input.responses;
    let mut score = 50.0;
    if r.is("decision_maker", "yes") {
        score += 30.0;
    } else if r.is("decision_maker", "influence") {
        score += 15.0;
    }

    let stakeholders = r
        .number("stakeholders")
        .filter(|n| *n >= 1.0)
        .unwrap_or(5.0);
    if stakeholders <= 2.0 {
        score += 20.0;
    } else if stakeholders <= 4.0 {
        score += 10.0;
    }

    if r.is("approval_process", "simple") {
        score += 10.0;
    }
    bounded(score)
}

fn champion_strength(input: &ScoringInput<'_>) -> f64 {
    let r = input.responses;
    let mut score = 40.0;
    if r.is("will_recommend", "yes") {
        score += 30.0;
    }
    if r.number("nps").map(|n| n >= 9.0).unwrap_or(false) {
        score += 20.0;
    }
    score += match r.text("influence") {
        Some("high") => 30.0,
        Some("low") => 5.0,
        _ => 15.0,
    };
    bounded(score)
}

/// Requirement and tech-stack overlap with the configured vocabularies
fn technical_fit(input: &ScoringInput<'_>) -> f64 {
    let r = input.responses;
    let config = input.config;
    let score = 50.0
        + overlap(&r.list("requirements"), &config.capabilities) * 30.0
        + overlap(&r.list("tech_stack"), &config.compatible_tech) * 20.0;
    bounded(score)
}

/// Company value overlap plus work pace (missing or unknown: balanced = 15)
fn cultural_fit(input: &ScoringInput<'_>) -> f64 {
    let r = input.responses;
    let mut score = 50.0 + overlap(&r.list("company_values"), &input.config.company_values) * 30.0;
    score += match r.text("work_pace") {
        Some("fast_paced") => 20.0,
        Some("methodical") => 10.0,
        _ => 15.0,
    };
    bounded(score)
}
