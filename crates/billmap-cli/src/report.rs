//! Table rendering for command output.

use billmap_core::UploadOutcome;
use billmap_model::{ColumnSuggestion, InternalSchema, ResolvedMapping};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

const EMPTY: &str = "-";

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// Internal schema fields in declaration order.
pub fn fields_table(schema: &InternalSchema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for field in &schema.fields {
        table.add_row(vec![
            Cell::new(&field.name),
            Cell::new(field.expected_type),
            Cell::new(field.description.as_deref().unwrap_or(EMPTY)),
        ]);
    }
    table
}

/// One row per scored column: type, best candidate, score and breakdown.
pub fn suggestions_table(columns: &[ColumnSuggestion]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Best field"),
        header_cell("Score"),
        header_cell("Auto"),
        header_cell("Signals"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for column in columns {
        let (field, score, signals) = match column.top() {
            Some(top) => (
                Cell::new(&top.internal_field),
                Cell::new(format!("{:.4}", top.score)),
                Cell::new(top.explain()),
            ),
            None => (
                Cell::new(EMPTY).fg(Color::DarkGrey),
                Cell::new(EMPTY).fg(Color::DarkGrey),
                Cell::new(EMPTY).fg(Color::DarkGrey),
            ),
        };
        let auto = if column.auto_mapped {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no")
        };
        table.add_row(vec![
            Cell::new(&column.csv_column),
            Cell::new(column.detected_type),
            field,
            score,
            auto,
            signals,
        ]);
    }
    table
}

/// Resolved fields only; unresolved fields are summarized by count.
pub fn mapping_table(mapping: &ResolvedMapping) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Source column")]);
    apply_table_style(&mut table);
    for (field, column) in mapping.resolved() {
        table.add_row(vec![Cell::new(field), Cell::new(column)]);
    }
    table
}

pub fn print_outcome(outcome: &UploadOutcome) {
    println!("{}", mapping_table(&outcome.mapping));
    println!(
        "Resolved {} of {} fields ({} confirmed, {} auto-mapped)",
        outcome.mapping.resolved_count(),
        outcome.mapping.len(),
        outcome.confirmed_fields.len(),
        outcome.auto_mapped().count(),
    );
    let pending: Vec<ColumnSuggestion> = outcome.pending_review().cloned().collect();
    if !pending.is_empty() {
        println!("Columns awaiting review:");
        println!("{}", suggestions_table(&pending));
    }
    println!(
        "Stored {} new columns, {} suggestions, {} mappings",
        outcome.inserted.detected_columns, outcome.inserted.suggestions, outcome.inserted.mappings,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_table_lists_only_resolved_fields() {
        let mut mapping = ResolvedMapping::unresolved(["servicename", "billedcost"]);
        mapping.set("servicename", Some("ServiceName".to_string()));

        let rendered = mapping_table(&mapping).to_string();
        assert!(rendered.contains("servicename"));
        assert!(rendered.contains("ServiceName"));
        assert!(!rendered.contains("billedcost"));
    }

    #[test]
    fn fields_table_has_a_row_per_field() {
        let schema = InternalSchema::focus();
        let table = fields_table(schema);
        assert_eq!(table.row_iter().count(), schema.len());
    }
}
