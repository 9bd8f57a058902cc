//! The fixed internal billing schema.
//!
//! The schema is configuration: a versioned, ordered list of canonical field
//! names with the value type each one is expected to hold. The expected type
//! feeds one scoring signal; it never filters candidates.
//!
//! A FOCUS-style default schema is embedded at compile time. Callers may parse
//! their own with [`InternalSchema::from_toml_str`].

use std::collections::BTreeSet;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::column::DetectedType;
use crate::error::{ModelError, Result};

/// Embedded default schema document.
pub const FOCUS_SCHEMA_TOML: &str = include_str!("../data/focus_schema.toml");

static FOCUS_SCHEMA: LazyLock<InternalSchema> = LazyLock::new(|| {
    InternalSchema::from_toml_str(FOCUS_SCHEMA_TOML).expect("embedded schema is valid")
});

/// A canonical field of the internal schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalField {
    pub name: String,
    pub expected_type: DetectedType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ordered set of internal fields. Declaration order breaks score ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalSchema {
    pub version: String,
    pub fields: Vec<InternalField>,
}

impl InternalSchema {
    /// The embedded FOCUS-style schema.
    pub fn focus() -> &'static Self {
        &FOCUS_SCHEMA
    }

    /// Parses and validates a schema document.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let schema: Self = toml::from_str(document)?;
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for field in &self.fields {
            let canonical = !field.name.is_empty()
                && field
                    .name
                    .chars()
                    .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit());
            if !canonical {
                return Err(ModelError::InvalidFieldName(field.name.clone()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ModelError::DuplicateField(field.name.clone()));
            }
        }
        Ok(())
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&InternalField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Declared type for `name`; `None` for fields outside the schema.
    pub fn expected_type(&self, name: &str) -> Option<DetectedType> {
        self.field(name).map(|field| field.expected_type)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_schema_loads() {
        let schema = InternalSchema::focus();
        assert_eq!(schema.version, "1.0");
        assert_eq!(schema.expected_type("billedcost"), Some(DetectedType::Number));
        assert_eq!(
            schema.expected_type("chargeperiodstart"),
            Some(DetectedType::Date)
        );
        assert_eq!(schema.expected_type("servicename"), Some(DetectedType::String));
        assert_eq!(schema.expected_type("nope"), None);
    }

    #[test]
    fn declaration_order_is_preserved() {
        let schema = InternalSchema::from_toml_str(
            r#"
            version = "test"
            [[fields]]
            name = "zeta"
            expected_type = "string"
            [[fields]]
            name = "alpha"
            expected_type = "number"
            "#,
        )
        .unwrap();
        assert_eq!(schema.field_names(), ["zeta", "alpha"]);
    }

    #[test]
    fn rejects_non_canonical_names() {
        let err = InternalSchema::from_toml_str(
            r#"
            version = "test"
            [[fields]]
            name = "Billed_Cost"
            expected_type = "number"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidFieldName(name) if name == "Billed_Cost"));
    }

    #[test]
    fn rejects_duplicate_fields() {
        let err = InternalSchema::from_toml_str(
            r#"
            version = "test"
            [[fields]]
            name = "tags"
            expected_type = "string"
            [[fields]]
            name = "tags"
            expected_type = "string"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateField(_)));
    }
}
