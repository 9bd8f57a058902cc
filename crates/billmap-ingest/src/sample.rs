//! Header row and bounded sample of a billing CSV.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use billmap_model::SampleRow;
use csv::{ReaderBuilder, StringRecord};

use crate::error::{IngestError, Result};

/// Raw header row and the first rows of a file, keyed by raw header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvSample {
    pub headers: Vec<String>,
    pub rows: Vec<SampleRow>,
}

impl CsvSample {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads the header row and up to `sample_size` data rows.
///
/// Headers are kept as written (only a UTF-8 byte order mark is removed).
/// Fully blank rows are skipped. Short rows leave trailing columns absent;
/// when a header repeats, the first occurrence's value is kept.
pub fn read_sample(path: &Path, sample_size: usize) -> Result<CsvSample> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| IngestError::FileOpen {
        path: path.to_path_buf(),
        source: e,
    })?;
    let sample = sample_from_reader(file, sample_size, path)?;
    tracing::debug!(
        path = %path.display(),
        headers = sample.headers.len(),
        rows = sample.rows.len(),
        "read CSV sample"
    );
    Ok(sample)
}

/// Reads every data row of the file.
pub fn read_all(path: &Path) -> Result<CsvSample> {
    read_sample(path, usize::MAX)
}

fn sample_from_reader<R: Read>(reader: R, sample_size: usize, path: &Path) -> Result<CsvSample> {
    let parse_error = |e: csv::Error| IngestError::CsvParse {
        path: path.to_path_buf(),
        source: e,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = reader.records();

    let headers: Vec<String> = match records.next() {
        Some(record) => header_row(&record.map_err(parse_error)?),
        None => {
            return Err(IngestError::EmptyCsv {
                path: path.to_path_buf(),
            });
        }
    };

    let mut rows = Vec::new();
    for record in records {
        if rows.len() >= sample_size {
            break;
        }
        let record = record.map_err(parse_error)?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(sample_row(&headers, &record));
    }
    Ok(CsvSample { headers, rows })
}

fn header_row(record: &StringRecord) -> Vec<String> {
    record
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            if index == 0 {
                raw.trim_start_matches('\u{feff}').to_string()
            } else {
                raw.to_string()
            }
        })
        .collect()
}

fn sample_row(headers: &[String], record: &StringRecord) -> SampleRow {
    let mut row = SampleRow::new();
    for (header, cell) in headers.iter().zip(record.iter()) {
        row.entry(header.clone()).or_insert_with(|| cell.to_string());
    }
    row
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn sample(content: &str, limit: usize) -> Result<CsvSample> {
        sample_from_reader(content.as_bytes(), limit, &PathBuf::from("memory.csv"))
    }

    #[test]
    fn keeps_raw_headers_in_order() {
        let sample = sample("\u{feff}Service Name,Cost ,Col3\nEC2,1.5,x\n", 10).unwrap();
        assert_eq!(sample.headers, ["Service Name", "Cost ", "Col3"]);
        assert_eq!(sample.rows[0]["Service Name"], "EC2");
        assert_eq!(sample.rows[0]["Cost "], "1.5");
    }

    #[test]
    fn stops_at_sample_size_and_skips_blank_rows() {
        let sample = sample("a,b\n1,2\n,\n3,4\n5,6\n", 2).unwrap();
        assert_eq!(sample.rows.len(), 2);
        assert_eq!(sample.rows[1]["a"], "3");
    }

    #[test]
    fn short_rows_leave_columns_absent() {
        let sample = sample("a,b,c\n1\n", 10).unwrap();
        assert_eq!(sample.rows[0].get("a").map(String::as_str), Some("1"));
        assert!(!sample.rows[0].contains_key("c"));
    }

    #[test]
    fn duplicate_headers_keep_first_value() {
        let sample = sample("Cost,Cost\n1,2\n", 10).unwrap();
        assert_eq!(sample.headers, ["Cost", "Cost"]);
        assert_eq!(sample.rows[0]["Cost"], "1");
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(sample("", 10), Err(IngestError::EmptyCsv { .. })));
    }
}
