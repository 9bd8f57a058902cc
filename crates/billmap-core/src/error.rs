//! Errors surfaced by the mapping service.
//!
//! Scoring and resolution never fail. Only the store can, and its errors are
//! passed through untouched: the service does not retry.

use billmap_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
    /// A storage operation failed for a reason other than a duplicate key.
    #[error("mapping store operation '{operation}' failed")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    pub(crate) fn store(operation: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { operation, source }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
