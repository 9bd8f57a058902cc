//! Per-column statistics computed from sampled values.
//!
//! Everything here is total: empty samples, blank cells and odd values fall
//! back to the safest answer (`string`, ratio `0`, no mean).

use std::collections::BTreeSet;
use std::sync::LazyLock;

use billmap_model::{DetectedType, SampleRow};
use regex::Regex;

use crate::normalize::normalize;

/// Share of non-empty values that must parse as numbers for `number`.
pub const NUMERIC_RATIO: f64 = 0.9;
/// Share of non-empty values that must start with `YYYY-MM-DD` for `date`.
pub const DATE_RATIO: f64 = 0.9;

static ISO_DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("valid date regex"));

static IDENTIFIER_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^id$|[_\s./-]id$|account|subscription|project)")
        .expect("valid identifier regex")
});

// CamelCase `...Id` / `...ID` suffix; case-sensitive so `Paid` stays out.
static CAMEL_ID_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]I[dD]$").expect("valid camel id regex"));

/// Normalized prefix of auto-generated headers (`Col1`, `column_12`).
pub const GENERIC_PREFIX: &str = "col";

/// Collects the raw cells of `header` across sample rows. Absent keys are `None`.
pub fn column_values<'a>(rows: &'a [SampleRow], header: &str) -> Vec<Option<&'a str>> {
    rows.iter()
        .map(|row| row.get(header).map(String::as_str))
        .collect()
}

fn present<'a>(values: &[Option<&'a str>]) -> Vec<&'a str> {
    values
        .iter()
        .flatten()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect()
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// True when the header names an identifier (`id`, `*_id`, `*Id`, or one of
/// `account`, `subscription`, `project`).
pub fn is_identifier_header(header: &str) -> bool {
    let header = header.trim();
    IDENTIFIER_KEYWORD.is_match(header) || CAMEL_ID_SUFFIX.is_match(header)
}

/// True when the header carries no meaningful text: a normalized token shorter
/// than `min_meaningful_len`, or one starting with `col`.
///
/// The prefix rule is literal, so `CollectionDate` counts as generic too.
pub fn is_generic_header(header: &str, min_meaningful_len: usize) -> bool {
    let token = normalize(header);
    token.len() < min_meaningful_len || token.starts_with(GENERIC_PREFIX)
}

/// Classifies sampled values as `number`, `date` or `string`.
///
/// Identifier headers are always `string` so that account numbers keep their
/// leading zeros downstream.
pub fn detect_type(values: &[Option<&str>], header: &str) -> DetectedType {
    if is_identifier_header(header) {
        return DetectedType::String;
    }
    let values = present(values);
    if values.is_empty() {
        return DetectedType::String;
    }
    let total = values.len() as f64;
    let numeric = values.iter().filter(|v| parse_number(v).is_some()).count() as f64;
    if numeric / total >= NUMERIC_RATIO {
        return DetectedType::Number;
    }
    let dates = values
        .iter()
        .filter(|v| ISO_DATE_PREFIX.is_match(v))
        .count() as f64;
    if dates / total >= DATE_RATIO {
        return DetectedType::Date;
    }
    DetectedType::String
}

/// Distinct non-empty values divided by non-empty values; `0` for no values.
pub fn cardinality(values: &[Option<&str>]) -> f64 {
    let values = present(values);
    if values.is_empty() {
        return 0.0;
    }
    let distinct: BTreeSet<&str> = values.iter().copied().collect();
    distinct.len() as f64 / values.len() as f64
}

/// Mean of the values that parse as numbers.
pub fn numeric_mean(values: &[Option<&str>]) -> Option<f64> {
    let numbers: Vec<f64> = present(values)
        .into_iter()
        .filter_map(parse_number)
        .collect();
    if numbers.is_empty() {
        return None;
    }
    Some(numbers.iter().sum::<f64>() / numbers.len() as f64)
}

/// Everything the orchestrator needs to know about one column's sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub normalized_header: String,
    pub detected_type: DetectedType,
    pub cardinality: f64,
    pub mean: Option<f64>,
    pub is_identifier: bool,
}

impl ColumnProfile {
    pub fn new(header: &str, values: &[Option<&str>]) -> Self {
        let detected_type = detect_type(values, header);
        let mean = match detected_type {
            DetectedType::Number => numeric_mean(values),
            _ => None,
        };
        Self {
            normalized_header: normalize(header),
            detected_type,
            cardinality: cardinality(values),
            mean,
            is_identifier: is_identifier_header(header),
        }
    }
}
