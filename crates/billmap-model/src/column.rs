use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{Provider, TenantId};

/// One sampled CSV row keyed by raw header. A missing key is a null cell.
pub type SampleRow = BTreeMap<String, String>;

/// Value type inferred from a column's sampled values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedType {
    Number,
    Date,
    /// Fallback for empty samples, identifier columns and mixed values.
    #[default]
    String,
}

impl DetectedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Date => "date",
            Self::String => "string",
        }
    }
}

impl fmt::Display for DetectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DetectedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" | "numeric" => Ok(Self::Number),
            "date" | "datetime" => Ok(Self::Date),
            "string" | "text" => Ok(Self::String),
            _ => Err(format!("Unknown column type: {s}")),
        }
    }
}

/// A CSV header observed for a tenant and provider.
///
/// Rows are written once, the first time a header is seen, and never
/// updated or removed. They record schema drift across uploads and say
/// nothing about whether the column is mapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedColumn {
    pub provider: Provider,
    pub tenant_id: TenantId,
    pub column_name: String,
    pub first_seen_at: DateTime<Utc>,
}

impl DetectedColumn {
    pub fn new(tenant_id: TenantId, provider: Provider, column_name: impl Into<String>) -> Self {
        Self {
            provider,
            tenant_id,
            column_name: column_name.into(),
            first_seen_at: Utc::now(),
        }
    }

    /// Uniqueness key: (tenant, provider, column name).
    pub fn key(&self) -> (&str, &str, &str) {
        (
            self.tenant_id.as_str(),
            self.provider.as_str(),
            self.column_name.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detected_type_parses_aliases() {
        assert_eq!("Numeric".parse::<DetectedType>(), Ok(DetectedType::Number));
        assert_eq!("date".parse::<DetectedType>(), Ok(DetectedType::Date));
        assert_eq!("TEXT".parse::<DetectedType>(), Ok(DetectedType::String));
        assert!("blob".parse::<DetectedType>().is_err());
    }

    #[test]
    fn detected_type_serializes_lowercase() {
        let json = serde_json::to_string(&DetectedType::Number).unwrap();
        assert_eq!(json, "\"number\"");
    }
}
