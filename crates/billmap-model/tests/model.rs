use billmap_model::{
    ColumnMapping, DetectedColumn, InternalSchema, Provider, SourceCandidates, TenantId,
};

fn tenant() -> TenantId {
    TenantId::new("tenant-1").unwrap()
}

fn aws() -> Provider {
    Provider::new("aws").unwrap()
}

#[test]
fn column_mapping_reads_legacy_scalar_source() {
    let json = r#"{
        "provider": "aws",
        "tenant_id": "tenant-1",
        "internal_field": "servicename",
        "source_column": "svc"
    }"#;
    let mapping: ColumnMapping = serde_json::from_str(json).unwrap();
    assert_eq!(mapping.source, SourceCandidates::single("svc"));
    assert_eq!(mapping.key(), ("tenant-1", "aws", "servicename"));

    let written = serde_json::to_value(&mapping).unwrap();
    assert_eq!(written["source_column"], serde_json::json!(["svc"]));
}

#[test]
fn column_mapping_round_trips() {
    let mapping = ColumnMapping::new(
        tenant(),
        aws(),
        "regionname",
        SourceCandidates::new(["Region", "Location"]),
    );
    let json = serde_json::to_string(&mapping).unwrap();
    let back: ColumnMapping = serde_json::from_str(&json).unwrap();
    assert_eq!(back, mapping);
}

#[test]
fn detected_column_key_scopes_by_tenant_and_provider() {
    let column = DetectedColumn::new(tenant(), aws(), "lineItem/UnblendedCost");
    assert_eq!(column.key(), ("tenant-1", "aws", "lineItem/UnblendedCost"));
}

#[test]
fn focus_schema_covers_core_fields() {
    let schema = InternalSchema::focus();
    for field in [
        "servicename",
        "regionname",
        "regioncode",
        "billedcost",
        "consumedquantity",
        "chargeperiodstart",
    ] {
        assert!(schema.contains(field), "missing {field}");
    }
}
