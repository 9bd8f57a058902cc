//! Lookup tables: canonical overrides, provider aliases and closed vocabularies.
//!
//! Tables are read-only configuration. The FOCUS defaults are embedded at
//! compile time and parsed once; tests and callers may build their own with
//! [`MappingTables::from_toml_str`] and pass them to the engine by reference.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use serde::Deserialize;

use crate::error::{MapError, Result};
use crate::normalize::normalize;

/// Embedded default tables document.
pub const FOCUS_TABLES_TOML: &str = include_str!("../data/focus_tables.toml");

/// Weight multiplier when header and alias only contain one another.
pub const ALIAS_CONTAINMENT_FACTOR: f64 = 0.85;

/// Share of sampled values that must fall in a vocabulary (strictly above).
pub const VOCAB_RATIO: f64 = 0.6;

static FOCUS_TABLES: LazyLock<MappingTables> = LazyLock::new(|| {
    MappingTables::from_toml_str(FOCUS_TABLES_TOML).expect("embedded tables are valid")
});

/// A provider synonym for an internal field.
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    pub alias: String,
    pub weight: f64,
    normalized: String,
}

impl Alias {
    pub fn new(alias: impl Into<String>, weight: f64) -> Self {
        let alias = alias.into();
        let normalized = normalize(&alias);
        Self {
            alias,
            weight,
            normalized,
        }
    }

    /// Weight this alias lends to `normalized_header`: full weight on an exact
    /// match, reduced weight when one contains the other, else `0`.
    fn score(&self, normalized_header: &str) -> f64 {
        if self.normalized.is_empty() || normalized_header.is_empty() {
            return 0.0;
        }
        if self.normalized == normalized_header {
            self.weight
        } else if normalized_header.contains(&self.normalized)
            || self.normalized.contains(normalized_header)
        {
            self.weight * ALIAS_CONTAINMENT_FACTOR
        } else {
            0.0
        }
    }
}

#[derive(Debug, Deserialize)]
struct TablesDocument {
    #[serde(default)]
    canonical: BTreeMap<String, String>,
    #[serde(default)]
    aliases: BTreeMap<String, Vec<AliasEntry>>,
    #[serde(default)]
    vocab: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AliasEntry {
    alias: String,
    weight: f64,
}

/// Canonical, alias and vocabulary tables keyed by internal field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingTables {
    canonical: BTreeMap<String, String>,
    aliases: BTreeMap<String, Vec<Alias>>,
    vocab: BTreeMap<String, BTreeSet<String>>,
}

impl MappingTables {
    /// The embedded FOCUS tables.
    pub fn focus() -> &'static Self {
        &FOCUS_TABLES
    }

    /// Parses a tables document. Canonical keys are normalized and vocabulary
    /// values lowercased on load.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let document: TablesDocument = toml::from_str(document)?;
        let mut tables = Self::default();
        for (header, field) in document.canonical {
            tables = tables.with_canonical(&header, field);
        }
        for (field, entries) in document.aliases {
            for entry in entries {
                if !(0.0..=1.0).contains(&entry.weight) {
                    return Err(MapError::InvalidAliasWeight {
                        field,
                        alias: entry.alias,
                        weight: entry.weight,
                    });
                }
                tables = tables.with_alias(&field, entry.alias, entry.weight);
            }
        }
        for (field, values) in document.vocab {
            tables = tables.with_vocab(&field, values);
        }
        Ok(tables)
    }

    pub fn with_canonical(mut self, header: &str, field: impl Into<String>) -> Self {
        self.canonical.insert(normalize(header), field.into());
        self
    }

    pub fn with_alias(mut self, field: &str, alias: impl Into<String>, weight: f64) -> Self {
        self.aliases
            .entry(field.to_string())
            .or_default()
            .push(Alias::new(alias, weight));
        self
    }

    pub fn with_vocab(
        mut self,
        field: &str,
        values: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        let entry = self.vocab.entry(field.to_string()).or_default();
        entry.extend(
            values
                .into_iter()
                .map(|value| value.as_ref().trim().to_lowercase()),
        );
        self
    }

    /// Internal field a header always means, looked up by normalized header.
    pub fn canonical_match(&self, normalized_header: &str) -> Option<&str> {
        self.canonical.get(normalized_header).map(String::as_str)
    }

    pub fn aliases_for(&self, field: &str) -> &[Alias] {
        self.aliases.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Best alias weight for a raw header against `field`, or `0`.
    pub fn alias_score(&self, raw_header: &str, field: &str) -> f64 {
        let header = normalize(raw_header);
        self.aliases_for(field)
            .iter()
            .map(|alias| alias.score(&header))
            .fold(0.0, f64::max)
    }

    /// True when more than [`VOCAB_RATIO`] of the non-empty sampled values,
    /// lowercased, belong to `field`'s vocabulary. Fields without a vocabulary
    /// never match.
    pub fn vocab_match(&self, values: &[Option<&str>], field: &str) -> bool {
        let Some(vocab) = self.vocab.get(field) else {
            return false;
        };
        let present: Vec<String> = values
            .iter()
            .flatten()
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())
            .collect();
        if present.is_empty() {
            return false;
        }
        let hits = present.iter().filter(|value| vocab.contains(*value)).count();
        hits as f64 / present.len() as f64 > VOCAB_RATIO
    }

    pub fn has_vocab(&self, field: &str) -> bool {
        self.vocab.contains_key(field)
    }
}
