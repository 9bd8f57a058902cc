//! Rows stored for one tenant+provider, with duplicate-ignoring inserts.

use std::collections::{BTreeMap, HashSet};

use billmap_model::{ColumnMapping, DetectedColumn, MappingSuggestionRecord, Provider, TenantId};
use serde::{Deserialize, Serialize};

/// Scope of one store document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Scope {
    pub(crate) tenant: TenantId,
    pub(crate) provider: Provider,
}

impl Scope {
    pub(crate) fn new(tenant: &TenantId, provider: &Provider) -> Self {
        Self {
            tenant: tenant.clone(),
            provider: provider.clone(),
        }
    }
}

/// Splits a batch by tenant+provider, keeping row order within each scope.
pub(crate) fn group_by_scope<'a, T>(
    rows: &'a [T],
    scope_of: impl Fn(&T) -> Scope,
) -> BTreeMap<Scope, Vec<&'a T>> {
    let mut grouped: BTreeMap<Scope, Vec<&T>> = BTreeMap::new();
    for row in rows {
        grouped.entry(scope_of(row)).or_default().push(row);
    }
    grouped
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct StoreDocument {
    #[serde(default)]
    pub(crate) detected_columns: Vec<DetectedColumn>,
    #[serde(default)]
    pub(crate) mappings: Vec<ColumnMapping>,
    #[serde(default)]
    pub(crate) suggestions: Vec<MappingSuggestionRecord>,
}

impl StoreDocument {
    pub(crate) fn insert_detected_columns<'a>(
        &mut self,
        columns: impl IntoIterator<Item = &'a DetectedColumn>,
    ) -> usize {
        let mut seen: HashSet<String> = self
            .detected_columns
            .iter()
            .map(|column| column.column_name.clone())
            .collect();
        let before = self.detected_columns.len();
        for column in columns {
            if seen.insert(column.column_name.clone()) {
                self.detected_columns.push(column.clone());
            }
        }
        self.detected_columns.len() - before
    }

    pub(crate) fn insert_suggestions<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a MappingSuggestionRecord>,
    ) -> usize {
        let mut seen: HashSet<(String, String, String)> =
            self.suggestions.iter().map(owned_key).collect();
        let before = self.suggestions.len();
        for record in records {
            if seen.insert(owned_key(record)) {
                self.suggestions.push(record.clone());
            }
        }
        self.suggestions.len() - before
    }

    pub(crate) fn insert_mappings_if_absent<'a>(
        &mut self,
        mappings: impl IntoIterator<Item = &'a ColumnMapping>,
    ) -> usize {
        let mut seen: HashSet<String> = self
            .mappings
            .iter()
            .map(|mapping| mapping.internal_field.clone())
            .collect();
        let before = self.mappings.len();
        for mapping in mappings {
            if seen.insert(mapping.internal_field.clone()) {
                self.mappings.push(mapping.clone());
            }
        }
        self.mappings.len() - before
    }
}

fn owned_key(record: &MappingSuggestionRecord) -> (String, String, String) {
    let (upload, source, field) = record.key();
    (upload.to_string(), source.to_string(), field.to_string())
}

#[cfg(test)]
mod tests {
    use billmap_model::{SourceCandidates, UploadId};

    use super::*;

    fn scope() -> (TenantId, Provider) {
        (TenantId::new("t1").unwrap(), Provider::new("aws").unwrap())
    }

    #[test]
    fn detected_columns_ignore_duplicates() {
        let (tenant, provider) = scope();
        let mut doc = StoreDocument::default();
        let a = DetectedColumn::new(tenant.clone(), provider.clone(), "Cost");
        let b = DetectedColumn::new(tenant, provider, "Region");

        assert_eq!(doc.insert_detected_columns([&a, &b, &a]), 2);
        assert_eq!(doc.insert_detected_columns([&a]), 0);
        assert_eq!(doc.detected_columns.len(), 2);
    }

    #[test]
    fn first_mapping_wins() {
        let (tenant, provider) = scope();
        let mut doc = StoreDocument::default();
        let first = ColumnMapping::new(
            tenant.clone(),
            provider.clone(),
            "servicename",
            SourceCandidates::single("svc"),
        );
        let second = ColumnMapping::new(
            tenant,
            provider,
            "servicename",
            SourceCandidates::single("Service"),
        );

        assert_eq!(doc.insert_mappings_if_absent([&first]), 1);
        assert_eq!(doc.insert_mappings_if_absent([&second]), 0);
        assert_eq!(doc.mappings[0].source.as_slice(), ["svc"]);
    }

    #[test]
    fn suggestions_are_keyed_by_upload() {
        let (tenant, provider) = scope();
        let record = |upload: &str| MappingSuggestionRecord {
            provider: provider.clone(),
            tenant_id: tenant.clone(),
            upload_id: UploadId::new(upload).unwrap(),
            source_column: "Cost".to_string(),
            internal_field: "billedcost".to_string(),
            score: 0.9,
            auto_mapped: false,
            reasons: Vec::new(),
        };
        let mut doc = StoreDocument::default();
        assert_eq!(doc.insert_suggestions([&record("u1"), &record("u1")]), 1);
        assert_eq!(doc.insert_suggestions([&record("u2")]), 1);
        assert_eq!(doc.suggestions.len(), 2);
    }

    #[test]
    fn groups_rows_by_scope() {
        let aws = DetectedColumn::new(
            TenantId::new("t1").unwrap(),
            Provider::new("aws").unwrap(),
            "Cost",
        );
        let gcp = DetectedColumn::new(
            TenantId::new("t1").unwrap(),
            Provider::new("gcp").unwrap(),
            "cost",
        );
        let rows = [aws.clone(), gcp, aws];
        let grouped = group_by_scope(&rows, |c| Scope::new(&c.tenant_id, &c.provider));
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.values().map(Vec::len).sum::<usize>(), 3);
    }
}
