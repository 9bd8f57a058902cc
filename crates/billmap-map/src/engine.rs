//! Auto-suggest orchestrator.
//!
//! Combines the header, type, cardinality, alias and vocabulary signals into an
//! additive score per (CSV column, internal field), ranks the candidates, and
//! decides whether the column may be mapped without human confirmation.
//!
//! Columns are scored independently: a header's result depends only on its own
//! name, its position and its sampled values. Duplicate headers therefore get
//! identical rankings.

use std::cmp::Ordering;

use billmap_model::{
    ColumnSuggestion, DetectedType, InternalSchema, Reason, SampleRow, ScoreComponent,
    ScoredCandidate,
};
use tracing::{debug, trace};

use crate::config::ScoringConfig;
use crate::normalize::normalize;
use crate::profile::{ColumnProfile, column_values, is_generic_header};
use crate::tables::MappingTables;

/// Score given to a canonical override.
pub const CANONICAL_SCORE: f64 = 1.0;

/// Rounds to four decimals so threshold checks ignore accumulation noise.
fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

struct ColumnContext<'a> {
    index: usize,
    header: &'a str,
    values: Vec<Option<&'a str>>,
    profile: ColumnProfile,
    generic: bool,
}

/// Engine for suggesting internal fields for CSV columns.
///
/// # Example
///
/// ```ignore
/// use billmap_map::{MappingTables, SuggestionEngine};
/// use billmap_model::InternalSchema;
///
/// let schema = InternalSchema::focus();
/// let engine = SuggestionEngine::new(MappingTables::focus(), schema);
/// let results = engine.suggest(&headers, &sample_rows, &schema.field_names());
/// ```
#[derive(Debug, Clone)]
pub struct SuggestionEngine<'a> {
    tables: &'a MappingTables,
    schema: &'a InternalSchema,
    config: ScoringConfig,
}

impl<'a> SuggestionEngine<'a> {
    /// Creates an engine with the default scoring configuration.
    pub fn new(tables: &'a MappingTables, schema: &'a InternalSchema) -> Self {
        Self {
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

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Suggests internal fields for every header, in header order.
    ///
    /// `internal_fields` is the candidate set; its order breaks score ties
    /// (first declared wins).
    pub fn suggest<H, F>(
        &self,
        headers: &[H],
        sample_rows: &[SampleRow],
        internal_fields: &[F],
    ) -> Vec<ColumnSuggestion>
    where
        H: AsRef<str>,
        F: AsRef<str>,
    {
        headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                self.suggest_column(index, header.as_ref(), sample_rows, internal_fields)
            })
            .collect()
    }

    /// Suggests internal fields for the header at position `index`.
    pub fn suggest_column<F: AsRef<str>>(
        &self,
        index: usize,
        header: &str,
        sample_rows: &[SampleRow],
        internal_fields: &[F],
    ) -> ColumnSuggestion {
        let values = column_values(sample_rows, header);
        let profile = ColumnProfile::new(header, &values);

        if let Some(field) = self.tables.canonical_match(&profile.normalized_header) {
            // A field outside the candidate set is already taken; the header
            // still means that field, so it is not offered elsewhere.
            let open = internal_fields.iter().any(|f| f.as_ref() == field);
            debug!(column = header, field, open, "canonical override");
            let suggestions = if open {
                vec![ScoredCandidate {
                    internal_field: field.to_string(),
                    score: CANONICAL_SCORE,
                    components: vec![ScoreComponent {
                        reason: Reason::CanonicalOverride,
                        value: CANONICAL_SCORE,
                    }],
                }]
            } else {
                Vec::new()
            };
            return ColumnSuggestion {
                csv_column: header.to_string(),
                detected_type: profile.detected_type,
                suggestions,
                auto_mapped: open,
            };
        }

        let thresholds = &self.config.thresholds;
        let context = ColumnContext {
            index,
            header,
            values,
            generic: is_generic_header(header, thresholds.min_meaningful_len),
            profile,
        };

        let mut ranked: Vec<(usize, ScoredCandidate)> = internal_fields
            .iter()
            .enumerate()
            .map(|(order, field)| (order, self.score_field(&context, field.as_ref())))
            .filter(|(_, candidate)| candidate.score >= thresholds.suggestion_floor)
            .collect();
        ranked.sort_by(|(order_a, a), (order_b, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(order_a.cmp(order_b))
        });
        let suggestions: Vec<ScoredCandidate> =
            ranked.into_iter().map(|(_, candidate)| candidate).collect();

        let auto_mapped = self.should_auto_map(&context, sample_rows.len(), &suggestions);
        debug!(
            column = header,
            detected_type = %context.profile.detected_type,
            candidates = suggestions.len(),
            top = suggestions.first().map(|c| c.internal_field.as_str()),
            top_score = suggestions.first().map(|c| c.score),
            auto_mapped,
            "scored column"
        );

        ColumnSuggestion {
            csv_column: header.to_string(),
            detected_type: context.profile.detected_type,
            suggestions,
            auto_mapped,
        }
    }

    /// Auto-mapping needs a meaningful header, more than one sample row, and a
    /// top candidate backed by a structural name match above the floor.
    fn should_auto_map(
        &self,
        context: &ColumnContext<'_>,
        sample_len: usize,
        suggestions: &[ScoredCandidate],
    ) -> bool {
        if context.generic || sample_len <= 1 {
            return false;
        }
        suggestions.first().is_some_and(|top| {
            top.has_structural_match() && top.score >= self.config.thresholds.auto_map_floor
        })
    }

    fn score_field(&self, context: &ColumnContext<'_>, field: &str) -> ScoredCandidate {
        let weights = &self.config.weights;
        let thresholds = &self.config.thresholds;
        let profile = &context.profile;
        let header = profile.normalized_header.as_str();
        let normalized_field = normalize(field);
        let mut components = Vec::new();
        let mut add = |reason: Reason, value: f64| components.push(ScoreComponent { reason, value });

        if !header.is_empty()
            && !normalized_field.is_empty()
            && (header.contains(&normalized_field) || normalized_field.contains(header))
        {
            add(Reason::HeaderInternal, weights.containment);
        }
        if !header.is_empty() && header == normalized_field {
            add(Reason::ExactHeader, weights.exact);
        }

        let alias = self.tables.alias_score(context.header, field);
        if alias > 0.0 {
            add(Reason::Alias, alias * weights.alias_factor);
        }

        if self.schema.expected_type(field) == Some(profile.detected_type) {
            add(Reason::TypeMatch, weights.type_match);
        }

        if self.tables.vocab_match(&context.values, field) {
            add(Reason::Vocab, weights.vocab);
        }

        if field.ends_with("id")
            && profile.cardinality > thresholds.identifier_cardinality
            && profile.is_identifier
        {
            add(Reason::IdentifierCardinality, weights.identifier);
        }

        if profile.detected_type == DetectedType::Date && field.contains("period") {
            add(Reason::PeriodDate, weights.period_date);
        }

        if profile.detected_type == DetectedType::Number
            && let Some(mean) = profile.mean
            && ((mean < 1.0 && field.contains("unitprice")) || (mean > 1.0 && field.contains("cost")))
        {
            add(Reason::NumericScale, weights.numeric_scale);
        }

        if context.index < thresholds.leading_columns {
            add(Reason::LeadingColumn, weights.leading_column);
        }

        if context.generic {
            add(Reason::GenericHeader, -weights.generic_header_penalty);
        }

        let score = round_score(components.iter().map(|c| c.value).sum());
        trace!(column = context.header, field, score, "candidate");
        ScoredCandidate {
            internal_field: field.to_string(),
            score,
            components,
        }
    }
}
