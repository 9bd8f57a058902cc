//! Data model for the cloud-billing column mapping engine.
//!
//! - [`DetectedColumn`]: a header observed for a tenant+provider
//! - [`ColumnMapping`]: a confirmed `internal field -> source column(s)` row
//! - [`MappingSuggestionRecord`]: append-only audit of scored candidates
//! - [`InternalSchema`]: the fixed canonical field set with expected types

pub mod column;
pub mod error;
pub mod ids;
pub mod mapping;
pub mod schema;
pub mod suggestion;

pub use column::{DetectedColumn, DetectedType, SampleRow};
pub use error::{ModelError, Result};
pub use ids::{Provider, TenantId, UploadId};
pub use mapping::{ColumnMapping, ResolvedMapping, SourceCandidates};
pub use schema::{FOCUS_SCHEMA_TOML, InternalField, InternalSchema};
pub use suggestion::{
    ColumnSuggestion, MappingSuggestionRecord, Reason, ScoreComponent, ScoredCandidate,
};
