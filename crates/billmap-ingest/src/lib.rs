//! Billing CSV ingestion for the column mapping engine.
//!
//! # Features
//!
//! - **Sampling**: raw header row plus a bounded sample of rows keyed by header
//! - **Projection**: raw rows rewritten as internal-field rows once a mapping
//!   is resolved
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use billmap_ingest::{project_rows, read_sample};
//!
//! let sample = read_sample(Path::new("cur-2024-01.csv"), 200)?;
//! let rows = project_rows(&resolved, &sample.rows);
//! ```

mod error;
mod project;
mod sample;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use sample::{CsvSample, read_all, read_sample};

// === Projection ===
pub use project::{CanonicalRow, project_rows, write_canonical_csv};
