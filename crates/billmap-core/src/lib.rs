//! Upload pipeline for the cloud-billing column mapping engine.
//!
//! [`MappingService`] ties the suggestion engine to a [`MappingStore`]:
//! confirmed mappings resolve first, remaining headers are scored, and
//! auto-mapped columns become confirmed mappings for the next upload.
//!
//! # Example
//!
//! ```ignore
//! use billmap_core::{MappingService, UploadRequest};
//! use billmap_store::MemoryStore;
//!
//! let service = MappingService::new(MemoryStore::new());
//! let outcome = service.process_upload(&request)?;
//! for (field, column) in outcome.mapping.resolved() {
//!     println!("{field} <- {column}");
//! }
//! ```
//!
//! [`MappingStore`]: billmap_store::MappingStore

#![deny(unsafe_code)]

mod error;
mod service;
mod upload;

pub use error::{Result, ServiceError};
pub use service::MappingService;
pub use upload::{InsertCounts, UploadOutcome, UploadRequest};
