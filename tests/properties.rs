//! Property-based tests for scoring invariants.
//!
//! Uses proptest to fuzz-verify:
//!   - consistency score bounds and penalty arithmetic
//!   - consistency score never rising when rule-triggering answers are added
//!   - scorer purity and dimension clamping under adversarial answers
//!   - tier monotonicity across every vertical preset
//!   - percentile bounds and monotonicity
//!   - session summary bounds for arbitrary event streams

use proptest::prelude::*;
use serde_json::{json, Value};

use candidate_intel::benchmark::{BenchmarkEngine, CohortRecord};
use candidate_intel::consistency::rules::IDEALIZED_ANSWERS;
use candidate_intel::consistency::{ConsistencyChecker, Integrity};
use candidate_intel::scoring::{algorithms, ScoringConfig, Scorer, TierTable};
use candidate_intel::telemetry::{SessionSummary, TelemetryEvent, TelemetrySession};
use candidate_intel::ResponseSet;

const QUESTION_IDS: &[&str] = &[
    "work_style",
    "strengths",
    "experience",
    "motivation",
    "risk_tolerance",
    "decision_style",
    "challenge_response",
    "client_approach",
    "values_rank",
    "timeline",
    "portfolio",
    "income",
    "job_level",
    "budget_status",
    "pain_points",
    "ethical_boundary",
    "communication_style",
    "team_conflict",
    "nps",
];

const ANSWERS: &[&str] = &[
    "coach",
    "0-2",
    "stability",
    "aggressive",
    "analytical",
    "act",
    "educator",
    "achievement",
    "leadership",
    "strategic",
    "immediate",
    "vp",
    "decline",
    "",
];

// ═══════════════════════════════════════════════════════════════════
// Strategies
// ═══════════════════════════════════════════════════════════════════

fn answer_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::sample::select(ANSWERS).prop_map(|s| json!(s)),
        any::<f64>().prop_map(|n| serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)),
        any::<i64>().prop_map(|n| json!(n)),
        any::<bool>().prop_map(|b| json!(b)),
        Just(Value::Null),
        prop::collection::vec(
            prop::sample::select(vec!["Leadership", "Communication", "Strategic Thinking", "x"]),
            0..4
        )
        .prop_map(|items| json!(items)),
        "\\PC{0,16}".prop_map(|s| json!(s)),
    ]
}

fn response_set() -> impl Strategy<Value = ResponseSet> {
    prop::collection::vec((prop::sample::select(QUESTION_IDS), answer_value()), 0..16)
        .prop_map(|pairs| pairs.into_iter().collect::<ResponseSet>())
}

fn session() -> impl Strategy<Value = TelemetrySession> {
    let event = prop_oneof![
        (0.0f64..2000.0, 0.0f64..2000.0).prop_map(|(x, y)| (0u8, x, y)),
        Just((1u8, 0.0, 0.0)),
        Just((2u8, 0.0, 0.0)),
        Just((3u8, 0.0, 0.0)),
        Just((4u8, 0.0, 0.0)),
        Just((5u8, 0.0, 0.0)),
        Just((6u8, 0.0, 0.0)),
    ];
    prop::collection::vec((0u64..120_000, event), 0..80).prop_map(|mut events| {
        events.sort_by_key(|(offset, _)| *offset);
        let mut session = TelemetrySession::new();
        for (i, (offset, (kind, x, y))) in events.into_iter().enumerate() {
            let question = format!("q{}", i / 4);
            match kind {
                0 => session.record(TelemetryEvent::pointer_move(offset, x, y)),
                1 => session.record(TelemetryEvent::pointer_click(offset, 1.0, 1.0)),
                2 => session.record(TelemetryEvent::key_down(offset, "Backspace")),
                3 => session.record(TelemetryEvent::visibility(offset, i % 2 == 0)),
                4 => session.start_question(&question, offset),
                5 => session.end_question(&question, offset, Some(json!("a"))),
                _ => session.record(TelemetryEvent::paste(offset)),
            }
        }
        session
    })
}

fn summary() -> impl Strategy<Value = SessionSummary> {
    (
        0u32..500,
        0.0f64..60_000.0,
        0u32..20,
        0.0f64..=100.0,
        0u32..5,
        0.0f64..=100.0,
    )
        .prop_map(
            |(events, avg, hesitations, completion, rapid, engagement)| {
                let mut summary = SessionSummary::neutral("prop");
                summary.event_count = events;
                summary.average_response_time_ms = avg;
                summary.hesitation_count = hesitations;
                summary.completion_rate = completion;
                summary.anomalies.rapid_clicking = rapid;
                summary.engagement_score = engagement;
                summary
            },
        )
}

// ═══════════════════════════════════════════════════════════════════
// Consistency
// ═══════════════════════════════════════════════════════════════════

proptest! {
    /// Score is 100 minus the severity penalties, floored at 0, and the
    /// integrity band always agrees with it.
    #[test]
    fn prop_consistency_score_is_penalty_sum(responses in response_set()) {
        let report = ConsistencyChecker::new().check(&responses);
        let penalty: u32 = report
            .contradictions
            .iter()
            .map(|c| c.severity.penalty() as u32)
            .sum();
        prop_assert!(report.score <= 100);
        prop_assert_eq!(report.score as u32, 100u32.saturating_sub(penalty));
        prop_assert_eq!(report.integrity, Integrity::from_score(report.score));
    }

    /// Adding answers that can only trigger findings never raises the score.
    ///
    /// Idealized answers go under fresh question ids, where they can only push
    /// the gaming share up. The stability/aggressive pair is added only when
    /// neither question was answered; if its non-idealized half clears a
    /// gaming finding, the contradiction it raises carries the same penalty.
    #[test]
    fn prop_consistency_score_never_rises_with_triggering_answers(
        base in response_set(),
        idealized in prop::collection::vec(prop::sample::select(IDEALIZED_ANSWERS.to_vec()), 0..6),
        add_contradiction in any::<bool>(),
    ) {
        let checker = ConsistencyChecker::new();
        let before = checker.check(&base).score;

        let mut extended = base.clone();
        for (i, answer) in idealized.iter().enumerate() {
            extended.insert(format!("extra_{}", i), *answer);
        }
        if add_contradiction
            && !base.contains_key("motivation")
            && !base.contains_key("risk_tolerance")
        {
            extended.insert("motivation", "stability");
            extended.insert("risk_tolerance", "aggressive");
        }

        let after = checker.check(&extended).score;
        prop_assert!(after <= before, "{} rose to {}", before, after);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Scoring
// ═══════════════════════════════════════════════════════════════════

proptest! {
    /// Every dimension stays in [0, 100] for every algorithm regardless of
    /// answer types, and the total is bounded.
    #[test]
    fn prop_dimensions_are_clamped(
        responses in response_set(),
        summary in summary(),
        algorithm in prop::sample::select(algorithms::names().collect::<Vec<_>>()),
    ) {
        let scorer = Scorer::new(ScoringConfig::for_algorithm(algorithm)).unwrap();
        let result = scorer.score(&responses, &summary);

        for d in &result.dimension_scores {
            prop_assert!(
                (0.0..=100.0).contains(&d.score),
                "{} scored {}", d.dimension, d.score
            );
        }
        prop_assert!(result.total_score <= 100);
        prop_assert!(result.confidence <= 100);
        prop_assert!((1.0..=1.2 + 1e-9).contains(&result.behavioral_multiplier));
    }

    /// Scoring is a pure function of its inputs.
    #[test]
    fn prop_scorer_is_pure(responses in response_set(), summary in summary()) {
        let scorer = Scorer::new(ScoringConfig::default()).unwrap();
        let first = scorer.score(&responses, &summary);
        let second = scorer.score(&responses, &summary);
        prop_assert_eq!(first, second);
    }

    /// Assigned tier always matches the table and respects its floor.
    #[test]
    fn prop_tier_matches_table(responses in response_set(), summary in summary()) {
        let config = ScoringConfig {
            vertical: Some("financial".to_string()),
            ..ScoringConfig::default()
        };
        let scorer = Scorer::new(config).unwrap();
        let result = scorer.score(&responses, &summary);
        prop_assert!(result.tier.min <= result.total_score);
        prop_assert_eq!(&result.tier, scorer.tiers().select(result.total_score));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Tiers
// ═══════════════════════════════════════════════════════════════════

proptest! {
    /// A higher score never lands in a lower tier.
    #[test]
    fn prop_tier_rank_is_monotonic(
        a in 0u8..=100,
        b in 0u8..=100,
        vertical in prop::sample::select(TierTable::VERTICALS.to_vec()),
    ) {
        let table = TierTable::for_vertical(vertical).unwrap();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(table.rank(low) <= table.rank(high));
        prop_assert!(table.select(low).min <= table.select(high).min);
        prop_assert!(table.select(high).min <= high);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Benchmark
// ═══════════════════════════════════════════════════════════════════

proptest! {
    /// Percentile is within [0, 100] and never decreases with the score.
    #[test]
    fn prop_percentile_bounded_and_monotonic(
        scores in prop::collection::vec(-50.0f64..150.0, 0..60),
        a in 0u8..=100,
        b in 0u8..=100,
    ) {
        let engine = BenchmarkEngine::default();
        let cohort: Vec<CohortRecord> = scores
            .iter()
            .map(|s| CohortRecord::new(*s, ResponseSet::new()))
            .collect();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        let low_result = engine.benchmark(low, &ResponseSet::new(), &cohort);
        let high_result = engine.benchmark(high, &ResponseSet::new(), &cohort);
        prop_assert!(high_result.percentile <= 100);
        prop_assert!(low_result.percentile <= high_result.percentile);

        let counted: usize = high_result.distribution.iter().map(|b| b.count).sum();
        prop_assert_eq!(counted, cohort.len());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Telemetry
// ═══════════════════════════════════════════════════════════════════

proptest! {
    /// Derived scores stay in range for arbitrary event streams.
    #[test]
    fn prop_summary_is_bounded(session in session()) {
        let summary = session.summarize();
        prop_assert!((0.0..=100.0).contains(&summary.confidence_score));
        prop_assert!((0.0..=100.0).contains(&summary.engagement_score));
        prop_assert!((0.0..=1.0).contains(&summary.focus_ratio));
        prop_assert!((0.0..=100.0).contains(&summary.completion_rate));
        prop_assert!((-6..=5).contains(&summary.trust_balance()));
    }
}
