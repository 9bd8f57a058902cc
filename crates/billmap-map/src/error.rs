//! Error types for loading engine configuration.
//!
//! Scoring itself never fails; only parsing tables and config documents can.

use thiserror::Error;

/// Errors from parsing lookup tables or scoring configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapError {
    /// Document is not valid TOML or has the wrong shape.
    #[error("failed to parse document: {0}")]
    Parse(#[from] toml::de::Error),

    /// Alias weight outside `0.0..=1.0`.
    #[error("alias '{alias}' for field '{field}' has weight {weight}, expected 0.0..=1.0")]
    InvalidAliasWeight {
        field: String,
        alias: String,
        weight: f64,
    },

    /// Threshold outside its allowed range.
    #[error("invalid threshold {name} = {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

/// Result type for engine configuration loading.
pub type Result<T> = std::result::Result<T, MapError>;
