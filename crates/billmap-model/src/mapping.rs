//! Confirmed mappings and resolved upload mappings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{Provider, TenantId};

/// Source column names accepted for one internal field.
///
/// Older stores hold a bare string, an array, or an object with a
/// `source_column` key. All three shapes deserialize into this type and it
/// always serializes back as an array, so readers only ever see one shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "StoredSource", into = "Vec<String>")]
pub struct SourceCandidates(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSource {
    Single(String),
    List(Vec<String>),
    Object { source_column: Box<StoredSource> },
}

impl StoredSource {
    fn flatten(self, out: &mut Vec<String>) {
        match self {
            Self::Single(name) => out.push(name),
            Self::List(names) => out.extend(names),
            Self::Object { source_column } => source_column.flatten(out),
        }
    }
}

impl From<StoredSource> for SourceCandidates {
    fn from(stored: StoredSource) -> Self {
        let mut names = Vec::new();
        stored.flatten(&mut names);
        Self::new(names)
    }
}

impl From<SourceCandidates> for Vec<String> {
    fn from(candidates: SourceCandidates) -> Self {
        candidates.0
    }
}

impl SourceCandidates {
    /// Builds candidates, dropping blank names and repeated names.
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            let trimmed = name.trim();
            if trimmed.is_empty() || out.iter().any(|existing| existing == trimmed) {
                continue;
            }
            out.push(trimmed.to_string());
        }
        Self(out)
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self::new([name.into()])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends names not already present.
    pub fn extend(&mut self, other: &SourceCandidates) {
        for name in &other.0 {
            if !self.0.contains(name) {
                self.0.push(name.clone());
            }
        }
    }
}

/// The confirmed source column(s) for one internal field of a tenant+provider.
///
/// At most one row exists per (tenant, provider, internal field). When present
/// it is authoritative and bypasses scoring on later uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub provider: Provider,
    pub tenant_id: TenantId,
    pub internal_field: String,
    #[serde(rename = "source_column")]
    pub source: SourceCandidates,
}

impl ColumnMapping {
    pub fn new(
        tenant_id: TenantId,
        provider: Provider,
        internal_field: impl Into<String>,
        source: SourceCandidates,
    ) -> Self {
        Self {
            provider,
            tenant_id,
            internal_field: internal_field.into(),
            source,
        }
    }

    /// Uniqueness key: (tenant, provider, internal field).
    pub fn key(&self) -> (&str, &str, &str) {
        (
            self.tenant_id.as_str(),
            self.provider.as_str(),
            self.internal_field.as_str(),
        )
    }
}

/// `{internal field -> source column}` handed to the row transformer.
///
/// `None` means the upload does not populate that field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedMapping(BTreeMap<String, Option<String>>);

impl ResolvedMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a mapping with every field present and unresolved.
    pub fn unresolved<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        Self(
            fields
                .into_iter()
                .map(|field| (field.to_string(), None))
                .collect(),
        )
    }

    pub fn source_for(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|source| source.as_deref())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_resolved(&self, field: &str) -> bool {
        self.source_for(field).is_some()
    }

    pub fn set(&mut self, field: impl Into<String>, source: Option<String>) {
        self.0.insert(field.into(), source);
    }

    /// Sets `field` only when it has no source yet. Returns true if set.
    pub fn set_if_unresolved(&mut self, field: &str, source: &str) -> bool {
        if self.is_resolved(field) {
            return false;
        }
        self.0.insert(field.to_string(), Some(source.to_string()));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0
            .iter()
            .map(|(field, source)| (field.as_str(), source.as_deref()))
    }

    /// Fields that have a source column.
    pub fn resolved(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(field, source)| source.as_deref().map(|s| (field.as_str(), s)))
    }

    pub fn unresolved_fields(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, source)| source.is_none())
            .map(|(field, _)| field.as_str())
    }

    /// Source columns already claimed by some field.
    pub fn claimed_columns(&self) -> impl Iterator<Item = &str> {
        self.0.values().filter_map(|source| source.as_deref())
    }

    pub fn resolved_count(&self) -> usize {
        self.0.values().filter(|source| source.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
