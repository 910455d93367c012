//! Scoring configuration
//!
//! `ScoringConfig` is plain data loaded from JSON. Nothing in it is trusted
//! until `Scorer::new` resolves it: the algorithm name, weight overrides and
//! tier table are all checked there, and a bad value is a hard
//! configuration error.

use crate::error::ScoringError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default algorithm name
pub const DEFAULT_ALGORITHM: &str = "12-dimensional";

/// Scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Registered algorithm name (`12-dimensional`, `candidate-assessment`)
    pub algorithm: String,
    /// Per-dimension weight overrides, merged over the algorithm defaults
    pub weights: BTreeMap<String, f64>,
    /// Tier preset name; ignored when `tiers` is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
    /// Explicit tier table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiers: Option<Vec<Tier>>,
    /// Capabilities matched against a prospect's requirements
    pub capabilities: Vec<String>,
    /// Technologies matched against a prospect's stack
    pub compatible_tech: Vec<String>,
    /// Values matched against a prospect's stated company values
    pub company_values: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            algorithm: DEFAULT_ALGORITHM.to_string(),
            weights: BTreeMap::new(),
            vertical: None,
            tiers: None,
            capabilities: Vec::new(),
            compatible_tech: Vec::new(),
            company_values: vec![
                "innovation".to_string(),
                "excellence".to_string(),
                "integrity".to_string(),
            ],
        }
    }
}

impl ScoringConfig {
    /// Configuration for a named algorithm with all other defaults
    pub fn for_algorithm(algorithm: &str) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ScoringError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ScoringError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Resolve the tier table: explicit tiers, then the vertical preset, then
    /// the generic default.
    pub fn tier_table(&self) -> Result<TierTable, ScoringError> {
        match (&self.tiers, &self.vertical) {
            (Some(tiers), _) => TierTable::new(tiers.clone()),
            (None, Some(vertical)) => TierTable::for_vertical(vertical),
            (None, None) => Ok(TierTable::default()),
        }
    }
}

/// One row of a tier table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Inclusive score floor (0-100)
    pub min: u8,
    pub name: String,
}

impl Tier {
    pub fn new(min: u8, name: &str) -> Self {
        Self {
            min,
            name: name.to_string(),
        }
    }
}

/// Validated tier table, sorted by descending floor.
///
/// Always non-empty and always contains a tier with floor 0, so every score
/// in [0, 100] selects exactly one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            tiers: preset(&[
                (90, "ELITE"),
                (80, "PREMIUM"),
                (70, "HIGH"),
                (60, "MEDIUM"),
                (40, "LOW"),
                (0, "ENTRY"),
            ]),
        }
    }
}

impl TierTable {
    /// Names accepted by `for_vertical`
    pub const VERTICALS: [&'static str; 4] = ["default", "financial", "hiring", "retention"];

    pub fn new(mut tiers: Vec<Tier>) -> Result<Self, ScoringError> {
        if tiers.is_empty() {
            return Err(ScoringError::InvalidTierTable("tier table is empty".to_string()));
        }
        if let Some(tier) = tiers.iter().find(|t| t.min > 100) {
            return Err(ScoringError::InvalidTierTable(format!(
                "tier {} has floor {} outside 0-100",
                tier.name, tier.min
            )));
        }
        if let Some(tier) = tiers.iter().find(|t| t.name.trim().is_empty()) {
            return Err(ScoringError::InvalidTierTable(format!(
                "tier with floor {} has no name",
                tier.min
            )));
        }

        tiers.sort_by(|a, b| b.min.cmp(&a.min));
        if let Some(pair) = tiers.windows(2).find(|w| w[0].min == w[1].min) {
            return Err(ScoringError::InvalidTierTable(format!(
                "duplicate floor {} ({} and {})",
                pair[0].min, pair[0].name, pair[1].name
            )));
        }
        if tiers.last().map(|t| t.min) != Some(0) {
            return Err(ScoringError::InvalidTierTable(
                "no tier with floor 0; low scores would have no tier".to_string(),
            ));
        }

        Ok(Self { tiers })
    }

    /// Preset table for a vertical
    pub fn for_vertical(vertical: &str) -> Result<Self, ScoringError> {
        let tiers = match vertical {
            "default" => return Ok(Self::default()),
            "financial" => preset(&[
                (90, "DIAMOND"),
                (80, "PLATINUM"),
                (70, "GOLD"),
                (60, "SILVER"),
                (0, "BRONZE"),
            ]),
            "hiring" => preset(&[
                (85, "PERFECT_FIT"),
                (70, "STRONG_CANDIDATE"),
                (55, "POTENTIAL"),
                (0, "NOT_QUALIFIED"),
            ]),
            "retention" => preset(&[
                (80, "CHAMPION"),
                (60, "SATISFIED"),
                (40, "AT_RISK"),
                (0, "CHURNING"),
            ]),
            other => {
                return Err(ScoringError::InvalidTierTable(format!(
                    "unknown vertical: {}",
                    other
                )))
            }
        };
        Self::new(tiers)
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Highest tier whose floor is at or below `score`
    pub fn select(&self, score: u8) -> &Tier {
        &self.tiers[self.position(score)]
    }

    /// Rank of the selected tier, 0 for the lowest tier
    pub fn rank(&self, score: u8) -> usize {
        self.tiers.len() - 1 - self.position(score)
    }

    fn position(&self, score: u8) -> usize {
        self.tiers
            .iter()
            .position(|t| t.min <= score)
            .unwrap_or(self.tiers.len() - 1)
    }
}

fn preset(rows: &[(u8, &str)]) -> Vec<Tier> {
    rows.iter().map(|(min, name)| Tier::new(*min, name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tier_selection() {
        let table = TierTable::default();
        assert_eq!(table.select(100).name, "ELITE");
        assert_eq!(table.select(90).name, "ELITE");
        assert_eq!(table.select(89).name, "PREMIUM");
        assert_eq!(table.select(45).name, "LOW");
        assert_eq!(table.select(39).name, "ENTRY");
        assert_eq!(table.select(0).name, "ENTRY");
        assert_eq!(table.rank(0), 0);
        assert_eq!(table.rank(95), 5);
    }

    #[test]
    fn test_new_sorts_unordered_rows() {
        let table = TierTable::new(vec![
            Tier::new(0, "C"),
            Tier::new(80, "A"),
            Tier::new(50, "B"),
        ])
        .unwrap();
        let names: Vec<_> = table.tiers().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(table.select(65).name, "B");
    }

    #[test]
    fn test_invalid_tables_are_rejected() {
        assert!(matches!(
            TierTable::new(vec![]),
            Err(ScoringError::InvalidTierTable(_))
        ));
        assert!(TierTable::new(vec![Tier::new(101, "X"), Tier::new(0, "Y")]).is_err());
        assert!(TierTable::new(vec![Tier::new(50, "X"), Tier::new(50, "Y"), Tier::new(0, "Z")]).is_err());
        assert!(TierTable::new(vec![Tier::new(50, "X"), Tier::new(10, "Y")]).is_err());
        assert!(TierTable::new(vec![Tier::new(0, " ")]).is_err());
    }

    #[test]
    fn test_vertical_presets() {
        assert_eq!(TierTable::for_vertical("financial").unwrap().select(75).name, "GOLD");
        assert_eq!(TierTable::for_vertical("hiring").unwrap().select(85).name, "PERFECT_FIT");
        assert_eq!(TierTable::for_vertical("retention").unwrap().select(39).name, "CHURNING");
        assert_eq!(TierTable::for_vertical("default").unwrap(), TierTable::default());
        for vertical in TierTable::VERTICALS {
            assert!(TierTable::for_vertical(vertical).is_ok());
        }
        assert!(TierTable::for_vertical("aerospace").is_err());
    }

    #[test]
    fn test_config_tier_resolution() {
        let mut config = ScoringConfig::default();
        assert_eq!(config.tier_table().unwrap(), TierTable::default());

        config.vertical = Some("hiring".to_string());
        assert_eq!(config.tier_table().unwrap().select(60).name, "POTENTIAL");

        config.tiers = Some(vec![Tier::new(0, "ALL")]);
        assert_eq!(config.tier_table().unwrap().select(60).name, "ALL");
    }

    #[test]
    fn test_config_from_json_fills_defaults() {
        let config = ScoringConfig::from_json(
            r#"{"algorithm": "candidate-assessment", "weights": {"ethical": 0.3}}"#,
        )
        .unwrap();
        assert_eq!(config.algorithm, "candidate-assessment");
        assert_eq!(config.weights.get("ethical"), Some(&0.3));
        assert_eq!(config.company_values.len(), 3);

        let round_trip = ScoringConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(round_trip, config);

        assert!(matches!(
            ScoringConfig::from_json("{\"algorithm\": 3}"),
            Err(ScoringError::JsonError(_))
        ));
    }
}
