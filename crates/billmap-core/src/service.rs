//! Mapping service: resolution, scoring and persistence for one upload.
//!
//! Confirmed mappings are authoritative. A header claimed by one is never
//! scored, and a field it resolves is never offered to the scorer. Everything
//! else goes through the suggestion engine; auto-mapped columns are persisted
//! as new confirmed mappings (first one wins) and merged into the result.

use std::collections::HashSet;
use std::time::Instant;

use billmap_map::{MappingTables, ScoringConfig, SuggestionEngine, group_mappings, resolve_headers};
use billmap_model::{
    ColumnMapping, ColumnSuggestion, DetectedColumn, InternalSchema, MappingSuggestionRecord,
    Provider, ResolvedMapping, SourceCandidates, TenantId, UploadId,
};
use billmap_store::MappingStore;
use tracing::{debug, info, info_span};

use crate::error::{Result, ServiceError};
use crate::upload::{InsertCounts, UploadOutcome, UploadRequest};

/// Orchestrates the suggestion engine against a [`MappingStore`].
#[derive(Debug)]
pub struct MappingService<'a, S> {
    store: S,
    tables: &'a MappingTables,
    schema: &'a InternalSchema,
    config: ScoringConfig,
}

impl<S: MappingStore> MappingService<'static, S> {
    /// Service over the embedded FOCUS schema and tables.
    pub fn new(store: S) -> Self {
        Self::with_tables(store, MappingTables::focus(), InternalSchema::focus())
    }
}

impl<'a, S: MappingStore> MappingService<'a, S> {
    pub fn with_tables(store: S, tables: &'a MappingTables, schema: &'a InternalSchema) -> Self {
        Self {
            store,
            tables,
            schema,
            config: ScoringConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ScoringConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn schema(&self) -> &InternalSchema {
        self.schema
    }

    fn engine(&self) -> SuggestionEngine<'a> {
        SuggestionEngine::new(self.tables, self.schema).with_config(self.config)
    }

    /// Records headers seen for the first time. Blank and repeated headers in
    /// the same upload are skipped; returns rows inserted.
    pub fn store_detected_columns(
        &self,
        tenant: &TenantId,
        provider: &Provider,
        headers: &[impl AsRef<str>],
    ) -> Result<usize> {
        let mut seen = HashSet::new();
        let columns: Vec<DetectedColumn> = headers
            .iter()
            .map(|header| header.as_ref())
            .filter(|header| !header.trim().is_empty() && seen.insert(*header))
            .map(|header| DetectedColumn::new(tenant.clone(), provider.clone(), header))
            .collect();
        let inserted = self
            .store
            .insert_detected_columns(&columns)
            .map_err(ServiceError::store("insert detected columns"))?;
        debug!(
            tenant = %tenant,
            provider = %provider,
            headers = columns.len(),
            inserted,
            "detected columns stored"
        );
        Ok(inserted)
    }

    /// Appends a suggestion record per surviving candidate and confirms the
    /// top candidate of every auto-mapped column unless the field already has a
    /// mapping. Returns `(suggestions inserted, mappings inserted)`.
    pub fn store_auto_suggestions(
        &self,
        tenant: &TenantId,
        provider: &Provider,
        upload_id: &UploadId,
        columns: &[ColumnSuggestion],
    ) -> Result<(usize, usize)> {
        let records: Vec<MappingSuggestionRecord> = columns
            .iter()
            .flat_map(|column| {
                MappingSuggestionRecord::from_column(tenant, provider, upload_id, column)
            })
            .collect();
        let suggestions = self
            .store
            .insert_suggestions(&records)
            .map_err(ServiceError::store("insert suggestions"))?;

        let mappings: Vec<ColumnMapping> = columns
            .iter()
            .filter_map(|column| {
                column.auto_mapped_field().map(|field| {
                    ColumnMapping::new(
                        tenant.clone(),
                        provider.clone(),
                        field,
                        SourceCandidates::single(column.csv_column.as_str()),
                    )
                })
            })
            .collect();
        let confirmed = self
            .store
            .insert_mappings_if_absent(&mappings)
            .map_err(ServiceError::store("insert mappings"))?;

        Ok((suggestions, confirmed))
    }

    /// Resolves confirmed mappings against `headers` by exact normalized match.
    ///
    /// Every schema field is present in the output (`None` when unresolved),
    /// plus any confirmed field outside the schema.
    pub fn load_resolved_mapping(
        &self,
        provider: &Provider,
        headers: &[impl AsRef<str>],
        tenant: &TenantId,
    ) -> Result<ResolvedMapping> {
        let rows = self
            .store
            .find_mappings(tenant, provider)
            .map_err(ServiceError::store("find mappings"))?;
        let confirmed = group_mappings(&rows);
        let resolved = resolve_headers(&confirmed, headers, &self.schema.field_names());
        debug!(
            tenant = %tenant,
            provider = %provider,
            confirmed = confirmed.len(),
            resolved = resolved.resolved_count(),
            "confirmed mappings resolved"
        );
        Ok(resolved)
    }

    /// Full pass for one upload: record headers, apply confirmed mappings,
    /// score the rest, persist suggestions and new auto-mappings.
    pub fn process_upload(&self, request: &UploadRequest) -> Result<UploadOutcome> {
        let span = info_span!(
            "upload",
            tenant = %request.tenant_id,
            provider = %request.provider,
            upload_id = %request.upload_id
        );
        let _guard = span.enter();
        let start = Instant::now();

        let detected_columns =
            self.store_detected_columns(&request.tenant_id, &request.provider, &request.headers)?;

        let mut mapping =
            self.load_resolved_mapping(&request.provider, &request.headers, &request.tenant_id)?;
        let confirmed_fields: Vec<String> =
            mapping.resolved().map(|(field, _)| field.to_string()).collect();
        let claimed: HashSet<String> = mapping.claimed_columns().map(str::to_string).collect();
        let open_fields: Vec<&str> = self
            .schema
            .field_names()
            .into_iter()
            .filter(|field| !mapping.is_resolved(field))
            .collect();

        let engine = self.engine();
        let suggestions: Vec<ColumnSuggestion> = info_span!("score").in_scope(|| {
            request
                .headers
                .iter()
                .enumerate()
                .filter(|(_, header)| !claimed.contains(header.as_str()))
                .map(|(index, header)| {
                    engine.suggest_column(index, header, &request.sample_rows, &open_fields)
                })
                .collect()
        });

        let (suggestion_rows, mapping_rows) = self.store_auto_suggestions(
            &request.tenant_id,
            &request.provider,
            &request.upload_id,
            &suggestions,
        )?;

        for column in &suggestions {
            if let Some(field) = column.auto_mapped_field()
                && !mapping.set_if_unresolved(field, &column.csv_column)
            {
                debug!(
                    column = %column.csv_column,
                    field,
                    "field already mapped by an earlier column"
                );
            }
        }

        let inserted = InsertCounts {
            detected_columns,
            suggestions: suggestion_rows,
            mappings: mapping_rows,
        };
        info!(
            headers = request.headers.len(),
            sample_rows = request.sample_rows.len(),
            confirmed = confirmed_fields.len(),
            scored = suggestions.len(),
            resolved = mapping.resolved_count(),
            new_mappings = inserted.mappings,
            duration_ms = start.elapsed().as_millis(),
            "upload processed"
        );

        Ok(UploadOutcome {
            mapping,
            suggestions,
            confirmed_fields,
            inserted,
        })
    }
}
