//! Error types for the billing mapping model.

use thiserror::Error;

/// Errors raised while constructing model values or parsing schema documents.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// Identifier was empty after trimming.
    #[error("{kind} must not be empty")]
    EmptyIdentifier { kind: &'static str },

    /// Internal field name is not a canonical token.
    #[error("invalid internal field name '{0}': expected lowercase ASCII letters and digits")]
    InvalidFieldName(String),

    /// The same internal field was declared twice.
    #[error("internal field '{0}' is declared more than once")]
    DuplicateField(String),

    /// Schema document could not be parsed.
    #[error("failed to parse schema document: {0}")]
    SchemaParse(#[from] toml::de::Error),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
