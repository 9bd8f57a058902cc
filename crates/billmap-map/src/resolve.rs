//! Exact resolution of confirmed mappings against a new header row.
//!
//! Confirmed mappings are authoritative and never re-scored: a field resolves
//! to the first header whose normalized form equals one of its confirmed
//! source names, or stays unresolved.

use std::collections::BTreeMap;

use billmap_model::{ColumnMapping, ResolvedMapping, SourceCandidates};

use crate::normalize::normalize;

/// Groups confirmed mapping rows into `internal field -> candidate names`.
pub fn group_mappings(mappings: &[ColumnMapping]) -> BTreeMap<String, SourceCandidates> {
    let mut grouped: BTreeMap<String, SourceCandidates> = BTreeMap::new();
    for mapping in mappings {
        grouped
            .entry(mapping.internal_field.clone())
            .or_default()
            .extend(&mapping.source);
    }
    grouped
}

/// First header, in header order, whose normalized form matches a candidate.
fn first_match<'h>(
    candidates: &SourceCandidates,
    normalized_headers: &[(String, &'h str)],
) -> Option<&'h str> {
    let wanted: Vec<String> = candidates
        .iter()
        .map(normalize)
        .filter(|name| !name.is_empty())
        .collect();
    normalized_headers
        .iter()
        .find(|(normalized, _)| !normalized.is_empty() && wanted.contains(normalized))
        .map(|(_, header)| *header)
}

/// Resolves every field in `fields` plus every confirmed field.
///
/// Output is deterministic for identical inputs. Fields without a confirmed
/// mapping, or whose candidates match no header, map to `None`.
pub fn resolve_headers<H, F>(
    confirmed: &BTreeMap<String, SourceCandidates>,
    headers: &[H],
    fields: &[F],
) -> ResolvedMapping
where
    H: AsRef<str>,
    F: AsRef<str>,
{
    let normalized_headers: Vec<(String, &str)> = headers
        .iter()
        .map(|header| {
            let header = header.as_ref();
            (normalize(header), header)
        })
        .collect();

    let mut resolved = ResolvedMapping::unresolved(fields.iter().map(|field| field.as_ref()));
    for (field, candidates) in confirmed {
        let source = first_match(candidates, &normalized_headers).map(str::to_string);
        resolved.set(field.as_str(), source);
    }
    resolved
}
