//! In-process store, used by tests and one-shot CLI runs.

use std::collections::BTreeMap;
use std::sync::Mutex;

use billmap_model::{ColumnMapping, DetectedColumn, MappingSuggestionRecord, Provider, TenantId};

use crate::document::{Scope, StoreDocument, group_by_scope};
use crate::error::Result;
use crate::store::MappingStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<Scope, StoreDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(
        &self,
        tenant: &TenantId,
        provider: &Provider,
        view: impl FnOnce(&StoreDocument) -> T,
    ) -> Result<T> {
        let documents = self.documents.lock()?;
        Ok(match documents.get(&Scope::new(tenant, provider)) {
            Some(doc) => view(doc),
            None => view(&StoreDocument::default()),
        })
    }

    fn write<'a, T: 'a>(
        &self,
        rows: &'a [T],
        scope_of: impl Fn(&T) -> Scope,
        mut insert: impl FnMut(&mut StoreDocument, Vec<&'a T>) -> usize,
    ) -> Result<usize> {
        let mut documents = self.documents.lock()?;
        let mut inserted = 0;
        for (scope, rows) in group_by_scope(rows, scope_of) {
            inserted += insert(documents.entry(scope).or_default(), rows);
        }
        Ok(inserted)
    }
}

impl MappingStore for MemoryStore {
    fn insert_detected_columns(&self, columns: &[DetectedColumn]) -> Result<usize> {
        self.write(
            columns,
            |column| Scope::new(&column.tenant_id, &column.provider),
            |doc, rows| doc.insert_detected_columns(rows),
        )
    }

    fn find_detected_columns(
        &self,
        tenant: &TenantId,
        provider: &Provider,
    ) -> Result<Vec<DetectedColumn>> {
        self.read(tenant, provider, |doc| doc.detected_columns.clone())
    }

    fn find_mappings(&self, tenant: &TenantId, provider: &Provider) -> Result<Vec<ColumnMapping>> {
        self.read(tenant, provider, |doc| doc.mappings.clone())
    }

    fn insert_suggestions(&self, records: &[MappingSuggestionRecord]) -> Result<usize> {
        self.write(
            records,
            |record| Scope::new(&record.tenant_id, &record.provider),
            |doc, rows| doc.insert_suggestions(rows),
        )
    }

    fn find_suggestions(
        &self,
        tenant: &TenantId,
        provider: &Provider,
    ) -> Result<Vec<MappingSuggestionRecord>> {
        self.read(tenant, provider, |doc| doc.suggestions.clone())
    }

    fn insert_mappings_if_absent(&self, mappings: &[ColumnMapping]) -> Result<usize> {
        self.write(
            mappings,
            |mapping| Scope::new(&mapping.tenant_id, &mapping.provider),
            |doc, rows| doc.insert_mappings_if_absent(rows),
        )
    }
}
