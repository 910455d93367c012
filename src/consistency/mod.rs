//! Response consistency
//!
//! A small rule engine that looks for contradictions between answers and for
//! answer sheets that read as gamed.

pub mod checker;
pub mod rules;

pub use checker::{
    ConsistencyChecker, ConsistencyReport, Contradiction, Integrity, SELECTION_PATTERN_RULE,
};
pub use rules::{default_rules, ConsistencyRule, Finding, FindingKind};
