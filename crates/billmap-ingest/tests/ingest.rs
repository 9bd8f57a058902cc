use std::fs;

use billmap_ingest::{IngestError, project_rows, read_all, read_sample, write_canonical_csv};
use billmap_model::ResolvedMapping;
use tempfile::tempdir;

const CUR: &str = "\
lineItem/UsageAccountId,product/ProductName,lineItem/UnblendedCost
000123456789,Amazon Elastic Compute Cloud,1.25
000123456789,Amazon Simple Storage Service,0.02
000987654321,AWS Lambda,0.40
";

#[test]
fn samples_and_full_reads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cur.csv");
    fs::write(&path, CUR).unwrap();

    let sample = read_sample(&path, 2).unwrap();
    assert_eq!(sample.headers.len(), 3);
    assert_eq!(sample.rows.len(), 2);
    assert_eq!(sample.rows[0]["lineItem/UsageAccountId"], "000123456789");

    let all = read_all(&path).unwrap();
    assert_eq!(all.rows.len(), 3);
}

#[test]
fn missing_file_is_reported() {
    let dir = tempdir().unwrap();
    let err = read_sample(&dir.path().join("absent.csv"), 10).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn writes_projected_rows_in_field_order() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cur.csv");
    let output = dir.path().join("canonical.csv");
    fs::write(&input, CUR).unwrap();

    let mut mapping = ResolvedMapping::unresolved(["id", "servicename", "billedcost", "tags"]);
    mapping.set("id", Some("lineItem/UsageAccountId".to_string()));
    mapping.set("servicename", Some("product/ProductName".to_string()));
    mapping.set("billedcost", Some("lineItem/UnblendedCost".to_string()));

    let sample = read_all(&input).unwrap();
    let rows = project_rows(&mapping, &sample.rows);
    write_canonical_csv(&output, &["id", "servicename", "billedcost", "tags"], &rows).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("id,servicename,billedcost,tags"));
    assert_eq!(
        lines.next(),
        Some("000123456789,Amazon Elastic Compute Cloud,1.25,")
    );
    assert_eq!(written.lines().count(), 4);
}
