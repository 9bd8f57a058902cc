use std::fs;
use std::sync::Arc;
use std::thread;

use billmap_model::{
    ColumnMapping, DetectedColumn, MappingSuggestionRecord, Provider, Reason, SourceCandidates,
    TenantId, UploadId,
};
use billmap_store::{JsonFileStore, MappingStore, MemoryStore};
use tempfile::tempdir;

fn tenant() -> TenantId {
    TenantId::new("acme").unwrap()
}

fn aws() -> Provider {
    Provider::new("aws").unwrap()
}

fn mapping(field: &str, source: &str) -> ColumnMapping {
    ColumnMapping::new(tenant(), aws(), field, SourceCandidates::single(source))
}

fn suggestion(upload: &str, column: &str, field: &str) -> MappingSuggestionRecord {
    MappingSuggestionRecord {
        provider: aws(),
        tenant_id: tenant(),
        upload_id: UploadId::new(upload).unwrap(),
        source_column: column.to_string(),
        internal_field: field.to_string(),
        score: 1.2,
        auto_mapped: true,
        reasons: vec![Reason::HeaderInternal, Reason::ExactHeader],
    }
}

fn exercise(store: &dyn MappingStore) {
    let columns = [
        DetectedColumn::new(tenant(), aws(), "ServiceName"),
        DetectedColumn::new(tenant(), aws(), "Cost"),
    ];
    assert_eq!(store.insert_detected_columns(&columns).unwrap(), 2);
    assert_eq!(store.insert_detected_columns(&columns).unwrap(), 0);
    assert_eq!(store.find_detected_columns(&tenant(), &aws()).unwrap().len(), 2);

    assert_eq!(
        store
            .insert_mappings_if_absent(&[mapping("servicename", "ServiceName")])
            .unwrap(),
        1
    );
    assert_eq!(
        store
            .insert_mappings_if_absent(&[mapping("servicename", "svc")])
            .unwrap(),
        0
    );
    let mappings = store.find_mappings(&tenant(), &aws()).unwrap();
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].source.as_slice(), ["ServiceName"]);

    let records = [
        suggestion("u1", "ServiceName", "servicename"),
        suggestion("u1", "ServiceName", "servicename"),
        suggestion("u2", "ServiceName", "servicename"),
    ];
    assert_eq!(store.insert_suggestions(&records).unwrap(), 2);
    assert_eq!(store.find_suggestions(&tenant(), &aws()).unwrap().len(), 2);

    let gcp = Provider::new("gcp").unwrap();
    assert!(store.find_mappings(&tenant(), &gcp).unwrap().is_empty());
}

#[test]
fn memory_store_ignores_duplicates() {
    exercise(&MemoryStore::new());
}

#[test]
fn file_store_ignores_duplicates() {
    let dir = tempdir().unwrap();
    exercise(&JsonFileStore::open(dir.path()).unwrap());
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempdir().unwrap();
    {
        let store = JsonFileStore::open(dir.path()).unwrap();
        store
            .insert_mappings_if_absent(&[mapping("regionname", "Region Name")])
            .unwrap();
    }

    let store = JsonFileStore::open(dir.path()).unwrap();
    let mappings = store.find_mappings(&tenant(), &aws()).unwrap();
    assert_eq!(mappings[0].source.as_slice(), ["Region Name"]);
    assert!(dir.path().join("acme").join("aws.json").exists());
    let leftovers = fs::read_dir(dir.path().join("acme"))
        .unwrap()
        .filter(|entry| {
            let name = entry.as_ref().unwrap().file_name();
            name.to_string_lossy().starts_with(".tmp")
        })
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn file_store_reads_legacy_source_shapes() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::open(dir.path()).unwrap();
    let path = store.document_path(&tenant(), &aws()).unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{
            "mappings": [
                {"provider": "aws", "tenant_id": "acme", "internal_field": "servicename", "source_column": "svc"},
                {"provider": "aws", "tenant_id": "acme", "internal_field": "regionname", "source_column": {"source_column": "Region"}}
            ]
        }"#,
    )
    .unwrap();

    let mappings = store.find_mappings(&tenant(), &aws()).unwrap();
    assert_eq!(mappings[0].source.as_slice(), ["svc"]);
    assert_eq!(mappings[1].source.as_slice(), ["Region"]);

    // Any write rewrites the document with array sources.
    store
        .insert_mappings_if_absent(&[mapping("billedcost", "Cost")])
        .unwrap();
    let written = fs::read_to_string(&path).unwrap();
    let document: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(
        document["mappings"][0]["source_column"],
        serde_json::json!(["svc"])
    );
}

#[test]
fn concurrent_confirmations_keep_one_mapping() {
    let store = Arc::new(MemoryStore::new());
    let handles: Vec<_> = ["svc", "Service", "ServiceName", "product"]
        .into_iter()
        .map(|source| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .insert_mappings_if_absent(&[mapping("servicename", source)])
                    .unwrap()
            })
        })
        .collect();
    let inserted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(inserted, 1);
    assert_eq!(store.find_mappings(&tenant(), &aws()).unwrap().len(), 1);
}

#[test]
fn separate_file_store_handles_do_not_lose_writes() {
    let dir = tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let handles: Vec<_> = ["svc", "Service", "ServiceName", "product"]
        .into_iter()
        .map(|source| {
            let root = root.clone();
            thread::spawn(move || {
                // One handle per writer, like separate `billmap ingest` runs.
                let store = JsonFileStore::open(root).unwrap();
                store
                    .insert_detected_columns(&[DetectedColumn::new(tenant(), aws(), source)])
                    .unwrap();
                store
                    .insert_mappings_if_absent(&[mapping("servicename", source)])
                    .unwrap()
            })
        })
        .collect();
    let inserted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    let store = JsonFileStore::open(root.clone()).unwrap();
    assert_eq!(inserted, 1);
    assert_eq!(store.find_mappings(&tenant(), &aws()).unwrap().len(), 1);
    assert_eq!(store.find_detected_columns(&tenant(), &aws()).unwrap().len(), 4);

    let mut names: Vec<String> = fs::read_dir(root.join("acme"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["aws.json", "aws.json.lock"]);
}
