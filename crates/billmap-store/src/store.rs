//! The storage collaborator seen by the mapping service.

use billmap_model::{ColumnMapping, DetectedColumn, MappingSuggestionRecord, Provider, TenantId};

use crate::error::Result;

/// Persistence for detected columns, confirmed mappings and suggestion records.
///
/// Every insert ignores rows whose uniqueness key is already stored and
/// returns the number of rows actually written. Implementations lock
/// internally so one store can serve concurrent uploads.
pub trait MappingStore: Send + Sync {
    /// Inserts headers seen for the first time, keyed by
    /// (tenant, provider, column name).
    fn insert_detected_columns(&self, columns: &[DetectedColumn]) -> Result<usize>;

    /// Every detected column for a tenant+provider.
    fn find_detected_columns(
        &self,
        tenant: &TenantId,
        provider: &Provider,
    ) -> Result<Vec<DetectedColumn>>;

    /// Every confirmed mapping for a tenant+provider.
    fn find_mappings(&self, tenant: &TenantId, provider: &Provider) -> Result<Vec<ColumnMapping>>;

    /// Appends suggestion records, keyed by (upload, source column, internal field).
    fn insert_suggestions(&self, records: &[MappingSuggestionRecord]) -> Result<usize>;

    /// Suggestion records for a tenant+provider, in insertion order.
    fn find_suggestions(
        &self,
        tenant: &TenantId,
        provider: &Provider,
    ) -> Result<Vec<MappingSuggestionRecord>>;

    /// Inserts mappings keyed by (tenant, provider, internal field). An existing
    /// mapping is never overwritten: the first confirmed mapping wins.
    fn insert_mappings_if_absent(&self, mappings: &[ColumnMapping]) -> Result<usize>;
}

impl<S: MappingStore + ?Sized> MappingStore for &S {
    fn insert_detected_columns(&self, columns: &[DetectedColumn]) -> Result<usize> {
        (**self).insert_detected_columns(columns)
    }

    fn find_detected_columns(
        &self,
        tenant: &TenantId,
        provider: &Provider,
    ) -> Result<Vec<DetectedColumn>> {
        (**self).find_detected_columns(tenant, provider)
    }

    fn find_mappings(&self, tenant: &TenantId, provider: &Provider) -> Result<Vec<ColumnMapping>> {
        (**self).find_mappings(tenant, provider)
    }

    fn insert_suggestions(&self, records: &[MappingSuggestionRecord]) -> Result<usize> {
        (**self).insert_suggestions(records)
    }

    fn find_suggestions(
        &self,
        tenant: &TenantId,
        provider: &Provider,
    ) -> Result<Vec<MappingSuggestionRecord>> {
        (**self).find_suggestions(tenant, provider)
    }

    fn insert_mappings_if_absent(&self, mappings: &[ColumnMapping]) -> Result<usize> {
        (**self).insert_mappings_if_absent(mappings)
    }
}
