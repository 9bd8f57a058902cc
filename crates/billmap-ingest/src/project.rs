//! Projection of raw rows onto the internal schema.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use billmap_model::{ResolvedMapping, SampleRow};
use csv::Writer;

use crate::error::{IngestError, Result};

/// One row in canonical form: internal field to value.
///
/// `None` means the upload does not populate the field, or the cell is blank.
pub type CanonicalRow = BTreeMap<String, Option<String>>;

/// Projects each raw row through the resolved mapping.
pub fn project_rows(mapping: &ResolvedMapping, rows: &[SampleRow]) -> Vec<CanonicalRow> {
    rows.iter()
        .map(|row| {
            mapping
                .iter()
                .map(|(field, source)| {
                    let value = source
                        .and_then(|column| row.get(column))
                        .filter(|value| !value.trim().is_empty())
                        .cloned();
                    (field.to_string(), value)
                })
                .collect()
        })
        .collect()
}

/// Writes canonical rows as CSV with one column per field, in `fields` order.
/// Absent values are written as empty cells.
pub fn write_canonical_csv(path: &Path, fields: &[&str], rows: &[CanonicalRow]) -> Result<()> {
    let write_error = |e: csv::Error| IngestError::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    };
    let file = File::create(path).map_err(|e| IngestError::FileOpen {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(fields).map_err(write_error)?;
    for row in rows {
        let record = fields
            .iter()
            .map(|field| row.get(*field).and_then(Option::as_deref).unwrap_or(""));
        writer.write_record(record).map_err(write_error)?;
    }
    writer
        .flush()
        .map_err(|e| write_error(csv::Error::from(e)))?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote canonical rows");
    Ok(())
}
