//! Input and output of one upload pass.

use billmap_model::{ColumnSuggestion, Provider, ResolvedMapping, SampleRow, TenantId, UploadId};

/// Header row and bounded sample of one billing file.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub tenant_id: TenantId,
    pub provider: Provider,
    pub upload_id: UploadId,
    /// Raw header row, in file order. May contain duplicates and blanks.
    pub headers: Vec<String>,
    pub sample_rows: Vec<SampleRow>,
}

impl UploadRequest {
    pub fn new(
        tenant_id: TenantId,
        provider: Provider,
        upload_id: UploadId,
        headers: Vec<String>,
        sample_rows: Vec<SampleRow>,
    ) -> Self {
        Self {
            tenant_id,
            provider,
            upload_id,
            headers,
            sample_rows,
        }
    }
}

/// Rows written by one pass. Duplicates are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertCounts {
    pub detected_columns: usize,
    pub suggestions: usize,
    pub mappings: usize,
}

/// Result of one upload pass.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Every schema field (and confirmed extra field) with its source column.
    pub mapping: ResolvedMapping,
    /// Scoring results for the headers no confirmed mapping claimed.
    pub suggestions: Vec<ColumnSuggestion>,
    /// Fields resolved from confirmed mappings before scoring.
    pub confirmed_fields: Vec<String>,
    pub inserted: InsertCounts,
}

impl UploadOutcome {
    /// `(field, column)` pairs that were auto-mapped during this pass.
    pub fn auto_mapped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mapping
            .resolved()
            .filter(|(field, _)| !self.confirmed_fields.iter().any(|c| c == field))
    }

    /// Columns that still need a human decision: scored but not auto-mapped.
    pub fn pending_review(&self) -> impl Iterator<Item = &ColumnSuggestion> {
        self.suggestions
            .iter()
            .filter(|column| !column.auto_mapped && !column.suggestions.is_empty())
    }
}
