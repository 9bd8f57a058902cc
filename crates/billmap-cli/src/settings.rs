//! Engine settings assembled from command-line files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use billmap_map::{MappingTables, ScoringConfig, Thresholds};

/// Scoring config and lookup tables for one command.
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub config: ScoringConfig,
    /// Replacement tables; `None` uses the embedded FOCUS tables.
    pub tables: Option<MappingTables>,
}

impl EngineSettings {
    /// Loads `--config` and `--tables` files. `strict` replaces the
    /// thresholds after the config file is applied.
    pub fn load(config: Option<&Path>, tables: Option<&Path>, strict: bool) -> Result<Self> {
        let mut scoring = match config {
            Some(path) => load_scoring_config(path)?,
            None => ScoringConfig::default(),
        };
        if strict {
            scoring.thresholds = Thresholds::strict();
        }
        let tables = tables.map(load_tables).transpose()?;
        Ok(Self {
            config: scoring,
            tables,
        })
    }

    pub fn tables(&self) -> &MappingTables {
        self.tables.as_ref().unwrap_or(MappingTables::focus())
    }
}

pub fn load_scoring_config(path: &Path) -> Result<ScoringConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read scoring config {}", path.display()))?;
    ScoringConfig::from_toml_str(&text)
        .with_context(|| format!("parse scoring config {}", path.display()))
}

pub fn load_tables(path: &Path) -> Result<MappingTables> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read mapping tables {}", path.display()))?;
    MappingTables::from_toml_str(&text)
        .with_context(|| format!("parse mapping tables {}", path.display()))
}
