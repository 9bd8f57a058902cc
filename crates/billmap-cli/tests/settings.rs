//! Integration tests for loading engine settings from files.

use std::fs;

use billmap_cli::settings::EngineSettings;
use billmap_map::{MappingTables, ScoringConfig, Thresholds};

#[test]
fn defaults_without_files() {
    let settings = EngineSettings::load(None, None, false).unwrap();
    assert_eq!(settings.config, ScoringConfig::default());
    assert!(std::ptr::eq(settings.tables(), MappingTables::focus()));
}

#[test]
fn strict_overrides_thresholds_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scoring.toml");
    fs::write(&path, "[thresholds]\nauto_map_floor = 0.8\n").unwrap();

    let loose = EngineSettings::load(Some(&path), None, false).unwrap();
    assert!((loose.config.thresholds.auto_map_floor - 0.8).abs() < 1e-9);

    let strict = EngineSettings::load(Some(&path), None, true).unwrap();
    assert_eq!(strict.config.thresholds, Thresholds::strict());
}

#[test]
fn replacement_tables_are_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.toml");
    fs::write(&path, "[canonical]\n\"Spend\" = \"billedcost\"\n").unwrap();

    let settings = EngineSettings::load(None, Some(&path), false).unwrap();
    assert_eq!(settings.tables().canonical_match("spend"), Some("billedcost"));
    assert_eq!(settings.tables().canonical_match("servicename"), None);
}

#[test]
fn unreadable_config_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    let err = EngineSettings::load(Some(&path), None, false).unwrap_err();
    assert!(format!("{err:#}").contains("missing.toml"));
}
