//! Storage for the column mapping engine.
//!
//! Three kinds of rows are kept per tenant+provider:
//!
//! - **Detected columns**: every header ever seen (schema drift audit)
//! - **Confirmed mappings**: one source per internal field, first one wins
//! - **Suggestion records**: append-only audit of scored candidates per upload
//!
//! All inserts ignore duplicate keys. [`MemoryStore`] keeps rows in process;
//! [`JsonFileStore`] writes one JSON document per tenant+provider with atomic
//! replace.

#![deny(unsafe_code)]

mod document;
mod error;
mod file;
mod memory;
mod store;

pub use error::{Result, StoreError};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::MappingStore;
