//! Scored mapping suggestions and their audit records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::column::DetectedType;
use crate::ids::{Provider, TenantId, UploadId};

/// Signal that contributed to a candidate's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    /// Header is canonical by construction; scoring was skipped.
    CanonicalOverride,
    /// Header and field name contain one another.
    HeaderInternal,
    /// Header and field name are equal after normalization.
    ExactHeader,
    /// Header matches a known provider synonym of the field.
    Alias,
    /// Detected value type equals the field's expected type.
    TypeMatch,
    /// Sampled values fall inside the field's closed vocabulary.
    Vocab,
    /// Highly unique identifier-like column for an `*id` field.
    IdentifierCardinality,
    /// Date column for a `*period*` field.
    PeriodDate,
    /// Numeric mean fits the unit-price or cost scale of the field.
    NumericScale,
    /// Column is among the first headers of the file.
    LeadingColumn,
    /// Header carries no meaningful text (penalty).
    GenericHeader,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CanonicalOverride => "canonical-override",
            Self::HeaderInternal => "header-internal",
            Self::ExactHeader => "exact-header",
            Self::Alias => "alias",
            Self::TypeMatch => "type-match",
            Self::Vocab => "vocab",
            Self::IdentifierCardinality => "identifier-cardinality",
            Self::PeriodDate => "period-date",
            Self::NumericScale => "numeric-scale",
            Self::LeadingColumn => "leading-column",
            Self::GenericHeader => "generic-header",
        }
    }

    /// True for the name-based signals required before a column may auto-map.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::HeaderInternal | Self::ExactHeader)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One signal's contribution to a score. Penalties are negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub reason: Reason,
    pub value: f64,
}

/// A ranked internal-field candidate for one CSV column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub internal_field: String,
    pub score: f64,
    pub components: Vec<ScoreComponent>,
}

impl ScoredCandidate {
    pub fn reasons(&self) -> impl Iterator<Item = Reason> + '_ {
        self.components.iter().map(|component| component.reason)
    }

    pub fn has_reason(&self, reason: Reason) -> bool {
        self.reasons().any(|r| r == reason)
    }

    /// True if a name-based signal contributed.
    pub fn has_structural_match(&self) -> bool {
        self.reasons().any(|reason| reason.is_structural())
    }

    /// Human-readable breakdown, e.g. `header-internal +0.60; leading-column +0.10`.
    pub fn explain(&self) -> String {
        self.components
            .iter()
            .map(|c| format!("{} {:+.2}", c.reason, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Auto-suggest result for one CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSuggestion {
    pub csv_column: String,
    pub detected_type: DetectedType,
    /// Candidates at or above the suggestion floor, best first.
    pub suggestions: Vec<ScoredCandidate>,
    pub auto_mapped: bool,
}

impl ColumnSuggestion {
    pub fn top(&self) -> Option<&ScoredCandidate> {
        self.suggestions.first()
    }

    /// The internal field this column is auto-mapped to, if any.
    pub fn auto_mapped_field(&self) -> Option<&str> {
        if !self.auto_mapped {
            return None;
        }
        self.top().map(|candidate| candidate.internal_field.as_str())
    }
}

/// Append-only audit row: one per (column x surviving candidate) per upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSuggestionRecord {
    pub provider: Provider,
    pub tenant_id: TenantId,
    pub upload_id: UploadId,
    pub source_column: String,
    pub internal_field: String,
    pub score: f64,
    pub auto_mapped: bool,
    pub reasons: Vec<Reason>,
}

impl MappingSuggestionRecord {
    /// Flattens a column result into records; `auto_mapped` is set on the top
    /// candidate only.
    pub fn from_column(
        tenant_id: &TenantId,
        provider: &Provider,
        upload_id: &UploadId,
        column: &ColumnSuggestion,
    ) -> Vec<Self> {
        column
            .suggestions
            .iter()
            .enumerate()
            .map(|(rank, candidate)| Self {
                provider: provider.clone(),
                tenant_id: tenant_id.clone(),
                upload_id: upload_id.clone(),
                source_column: column.csv_column.clone(),
                internal_field: candidate.internal_field.clone(),
                score: candidate.score,
                auto_mapped: column.auto_mapped && rank == 0,
                reasons: candidate.reasons().collect(),
            })
            .collect()
    }

    /// Uniqueness key: (upload, source column, internal field).
    pub fn key(&self) -> (&str, &str, &str) {
        (
            self.upload_id.as_str(),
            self.source_column.as_str(),
            self.internal_field.as_str(),
        )
    }
}
