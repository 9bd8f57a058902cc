use std::fmt;

use crate::ModelError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ModelError::EmptyIdentifier { kind: $kind });
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Client account that owns an upload and its confirmed mappings.
    TenantId,
    "tenant id"
);

string_id!(
    /// Billing export source (e.g. `aws`, `azure`, `gcp`). Opaque to the engine.
    Provider,
    "provider"
);

string_id!(
    /// Identifier of a single billing file upload.
    UploadId,
    "upload id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_trimmed() {
        let tenant = TenantId::new("  acme ").unwrap();
        assert_eq!(tenant.as_str(), "acme");
        assert_eq!(tenant.to_string(), "acme");
    }

    #[test]
    fn empty_ids_are_rejected() {
        let err = Provider::new("   ").unwrap_err();
        assert_eq!(err.to_string(), "provider must not be empty");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let upload = UploadId::new("u-1").unwrap();
        assert_eq!(serde_json::to_string(&upload).unwrap(), "\"u-1\"");
    }
}
