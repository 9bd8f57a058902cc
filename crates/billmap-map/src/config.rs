//! Scoring weights and thresholds.
//!
//! The values are hand-tuned. They are kept as named constants and grouped
//! into [`ScoringConfig`] so they can be tuned without touching the algorithm.
//! Any key missing from a config document keeps its default.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Minimum score for a candidate to be kept as a suggestion.
pub const SUGGESTION_FLOOR: f64 = 0.35;
/// Minimum top score for a column to auto-map.
pub const AUTO_MAP_FLOOR: f64 = 0.75;

/// Header and field name contain one another.
pub const CONTAINMENT_WEIGHT: f64 = 0.6;
/// Header and field name are equal (added on top of containment).
pub const EXACT_WEIGHT: f64 = 0.4;
/// Multiplier applied to the best alias weight.
pub const ALIAS_FACTOR: f64 = 0.3;
/// Detected type equals the field's expected type.
pub const TYPE_MATCH_WEIGHT: f64 = 0.2;
/// Sampled values belong to the field's vocabulary.
pub const VOCAB_WEIGHT: f64 = 0.1;
/// Unique identifier column for an `*id` field.
pub const IDENTIFIER_WEIGHT: f64 = 0.1;
/// Date column for a `*period*` field.
pub const PERIOD_DATE_WEIGHT: f64 = 0.15;
/// Numeric mean on the unit-price (< 1) or cost (> 1) scale.
pub const NUMERIC_SCALE_WEIGHT: f64 = 0.1;
/// Column is among the leading headers.
pub const LEADING_COLUMN_WEIGHT: f64 = 0.1;
/// Subtracted for generic headers such as `Col1` or `C2`.
pub const GENERIC_HEADER_PENALTY: f64 = 0.15;

/// Cardinality above which a column looks like a unique identifier.
pub const IDENTIFIER_CARDINALITY: f64 = 0.9;
/// Number of leading headers that get the leading-column bonus.
pub const LEADING_COLUMNS: usize = 3;
/// Normalized headers shorter than this are generic.
pub const MIN_MEANINGFUL_LEN: usize = 5;

/// Per-signal score contributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub containment: f64,
    pub exact: f64,
    pub alias_factor: f64,
    pub type_match: f64,
    pub vocab: f64,
    pub identifier: f64,
    pub period_date: f64,
    pub numeric_scale: f64,
    pub leading_column: f64,
    pub generic_header_penalty: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            containment: CONTAINMENT_WEIGHT,
            exact: EXACT_WEIGHT,
            alias_factor: ALIAS_FACTOR,
            type_match: TYPE_MATCH_WEIGHT,
            vocab: VOCAB_WEIGHT,
            identifier: IDENTIFIER_WEIGHT,
            period_date: PERIOD_DATE_WEIGHT,
            numeric_scale: NUMERIC_SCALE_WEIGHT,
            leading_column: LEADING_COLUMN_WEIGHT,
            generic_header_penalty: GENERIC_HEADER_PENALTY,
        }
    }
}

/// Cut-offs used when filtering and deciding auto-mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub suggestion_floor: f64,
    pub auto_map_floor: f64,
    pub identifier_cardinality: f64,
    pub leading_columns: usize,
    pub min_meaningful_len: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            suggestion_floor: SUGGESTION_FLOOR,
            auto_map_floor: AUTO_MAP_FLOOR,
            identifier_cardinality: IDENTIFIER_CARDINALITY,
            leading_columns: LEADING_COLUMNS,
            min_meaningful_len: MIN_MEANINGFUL_LEN,
        }
    }
}

impl Thresholds {
    /// Stricter auto-mapping: only near-exact structural matches apply silently.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            auto_map_floor: 0.9,
            suggestion_floor: 0.5,
            ..Self::default()
        }
    }
}

/// Complete scoring configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: SignalWeights,
    pub thresholds: Thresholds,
}

impl ScoringConfig {
    /// Parses a TOML config document and checks threshold ranges.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let config: Self = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let unit = [
            ("suggestion_floor", self.thresholds.suggestion_floor),
            ("identifier_cardinality", self.thresholds.identifier_cardinality),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(MapError::InvalidThreshold { name, value });
            }
        }
        if !self.thresholds.auto_map_floor.is_finite() || self.thresholds.auto_map_floor < 0.0 {
            return Err(MapError::InvalidThreshold {
                name: "auto_map_floor",
                value: self.thresholds.auto_map_floor,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config = ScoringConfig::from_toml_str(
            r#"
            [thresholds]
            auto_map_floor = 0.8

            [weights]
            leading_column = 0.0
            "#,
        )
        .unwrap();
        assert_eq!(config.thresholds.auto_map_floor, 0.8);
        assert_eq!(config.thresholds.suggestion_floor, SUGGESTION_FLOOR);
        assert_eq!(config.weights.leading_column, 0.0);
        assert_eq!(config.weights.containment, CONTAINMENT_WEIGHT);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(ScoringConfig::from_toml_str("").unwrap(), ScoringConfig::default());
    }

    #[test]
    fn rejects_out_of_range_floor() {
        let err = ScoringConfig::from_toml_str("[thresholds]\nsuggestion_floor = 1.5\n").unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidThreshold {
                name: "suggestion_floor",
                ..
            }
        ));
    }
}
