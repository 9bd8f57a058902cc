//! Storage error types.
//!
//! Duplicate keys are never errors: every insert ignores rows whose key is
//! already stored. What remains is I/O, encoding and locking failures, which
//! callers must see.

use std::path::PathBuf;

use thiserror::Error;

/// Storage operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Failed to serialize store document {path}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Stored document is not valid JSON or has the wrong shape.
    #[error("Failed to deserialize store document {path}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A previous writer panicked while holding the store lock.
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// Tenant or provider cannot be used as a storage key.
    #[error("Invalid {kind} '{value}' for storage key")]
    InvalidKey { kind: &'static str, value: String },
}

impl StoreError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::Serialization { .. } => "An error occurred while saving mappings.".to_string(),
            Self::Deserialization { path, .. } => format!(
                "The mapping store at {} could not be read. The file may be corrupted.",
                path.display()
            ),
            Self::LockPoisoned => {
                "The mapping store is unavailable after an earlier failure.".to_string()
            }
            Self::InvalidKey { kind, value } => {
                format!("'{value}' is not a valid {kind} for the mapping store.")
            }
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
