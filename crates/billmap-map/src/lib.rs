//! Column auto-suggestion engine for cloud-billing exports.
//!
//! Given a CSV header row and a bounded sample of rows, scores every column
//! against the internal billing schema and decides which columns are safe to
//! map without human confirmation.
//!
//! # Features
//!
//! - **Profiling**: type detection, cardinality and numeric scale per column
//! - **Lookup tables**: canonical overrides, provider aliases, closed vocabularies
//! - **Scoring**: additive multi-signal scores with an auditable breakdown
//! - **Resolution**: exact, deterministic reuse of confirmed mappings
//!
//! # Example
//!
//! ```ignore
//! use billmap_map::{MappingTables, SuggestionEngine};
//! use billmap_model::InternalSchema;
//!
//! let schema = InternalSchema::focus();
//! let engine = SuggestionEngine::new(MappingTables::focus(), schema);
//!
//! for column in engine.suggest(&headers, &sample_rows, &schema.field_names()) {
//!     if let Some(field) = column.auto_mapped_field() {
//!         println!("{} -> {}", column.csv_column, field);
//!     }
//! }
//! ```

#![deny(unsafe_code)]

mod config;
mod engine;
mod error;
mod normalize;
mod profile;
mod resolve;
mod tables;

// === Error Types ===
pub use error::{MapError, Result};

// === Configuration ===
pub use config::{ScoringConfig, SignalWeights, Thresholds};

// === Signals ===
pub use normalize::normalize;
pub use profile::{
    ColumnProfile, DATE_RATIO, NUMERIC_RATIO, cardinality, column_values, detect_type,
    is_generic_header, is_identifier_header, numeric_mean,
};
pub use tables::{ALIAS_CONTAINMENT_FACTOR, Alias, FOCUS_TABLES_TOML, MappingTables, VOCAB_RATIO};

// === Scoring ===
pub use engine::{CANONICAL_SCORE, SuggestionEngine};

// === Resolution ===
pub use resolve::{group_mappings, resolve_headers};
