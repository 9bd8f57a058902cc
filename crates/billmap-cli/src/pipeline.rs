//! Store-backed steps behind the `ingest` and `resolve` commands.

use std::path::Path;

use anyhow::{Context, Result};
use billmap_core::{MappingService, UploadOutcome, UploadRequest};
use billmap_ingest::{project_rows, read_all, read_sample, write_canonical_csv};
use billmap_model::{InternalSchema, Provider, ResolvedMapping, TenantId, UploadId};
use billmap_store::JsonFileStore;
use tracing::info;

use crate::settings::EngineSettings;

/// Tenant, provider and store directory for one command.
#[derive(Debug, Clone, Copy)]
pub struct StoreTarget<'a> {
    pub tenant: &'a str,
    pub provider: &'a str,
    pub root: &'a Path,
}

impl StoreTarget<'_> {
    pub fn open(&self) -> Result<(TenantId, Provider, JsonFileStore)> {
        let tenant = TenantId::new(self.tenant).context("invalid tenant")?;
        let provider = Provider::new(self.provider).context("invalid provider")?;
        let store = JsonFileStore::open(self.root)
            .with_context(|| format!("open mapping store {}", self.root.display()))?;
        Ok((tenant, provider, store))
    }
}

/// What an ingest run did.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub upload_id: UploadId,
    pub outcome: UploadOutcome,
    /// Rows written to the canonical CSV, when one was requested.
    pub rows_written: Option<usize>,
}

/// Runs one upload of `csv` through the mapping service, then optionally
/// writes every row projected onto the internal schema to `output`.
///
/// Without `upload_id` a random UUID is used.
pub fn ingest_file(
    csv: &Path,
    target: &StoreTarget<'_>,
    upload_id: Option<&str>,
    sample_size: usize,
    output: Option<&Path>,
    settings: &EngineSettings,
) -> Result<IngestReport> {
    let (tenant, provider, store) = target.open()?;
    let upload_id = match upload_id {
        Some(id) => UploadId::new(id),
        None => UploadId::new(uuid::Uuid::new_v4().to_string()),
    }
    .context("invalid upload id")?;

    let sample = read_sample(csv, sample_size).context("read CSV sample")?;
    let schema = InternalSchema::focus();
    let service =
        MappingService::with_tables(store, settings.tables(), schema).with_config(settings.config);
    let request = UploadRequest::new(
        tenant,
        provider,
        upload_id.clone(),
        sample.headers,
        sample.rows,
    );
    let outcome = service
        .process_upload(&request)
        .context("process upload")?;

    let rows_written = match output {
        Some(output) => {
            let all = read_all(csv).context("read CSV rows")?;
            let rows = project_rows(&outcome.mapping, &all.rows);
            write_canonical_csv(output, &schema.field_names(), &rows)
                .context("write canonical CSV")?;
            info!(path = %output.display(), rows = rows.len(), "canonical rows written");
            Some(rows.len())
        }
        None => None,
    };

    Ok(IngestReport {
        upload_id,
        outcome,
        rows_written,
    })
}

/// Resolves the confirmed mappings of `target` against the header row of `csv`.
pub fn resolve_file(
    csv: &Path,
    target: &StoreTarget<'_>,
    settings: &EngineSettings,
) -> Result<ResolvedMapping> {
    let (tenant, provider, store) = target.open()?;
    let sample = read_sample(csv, 0).context("read CSV header")?;
    let service = MappingService::with_tables(store, settings.tables(), InternalSchema::focus())
        .with_config(settings.config);
    service
        .load_resolved_mapping(&provider, &sample.headers, &tenant)
        .context("resolve confirmed mappings")
}
