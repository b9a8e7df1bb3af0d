// ==========================================
// Appliance Registry - Document model
// ==========================================
// Stored records are flat JSON objects (camelCase keys)
// Filters are equality matches over top-level string fields
// ==========================================

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

/// JSON-like stored record
pub type Document = Map<String, Value>;

/// Well-known document fields
pub mod fields {
    pub const ID: &str = "_id";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const USER_ID: &str = "userId";
    pub const APPLIANCE_ID: &str = "applianceId";
    pub const FUEL_ID: &str = "fuelId";
    pub const EMAIL: &str = "email";
}

// ==========================================
// Filter - identity / lookup filter
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pairs: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition `field == value`
    pub fn eq(mut self, field: &str, value: impl Into<String>) -> Self {
        self.pairs.push((field.to_string(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// In-memory evaluation, used by callers that already hold documents
    pub fn matches(&self, doc: &Document) -> bool {
        self.pairs
            .iter()
            .all(|(field, value)| doc.get(field).and_then(Value::as_str) == Some(value.as_str()))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .pairs
            .iter()
            .map(|(field, value)| format!("{}={}", field, value))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Reads a non-empty string field
pub fn str_field<'a>(doc: &'a Document, field: &str) -> Option<&'a str> {
    doc.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Stored timestamp encoding (RFC 3339, UTC, microseconds)
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decodes a stored document into a typed record
pub fn from_document<T: DeserializeOwned>(doc: Document) -> serde_json::Result<T> {
    serde_json::from_value(Value::Object(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_matches_all_conditions() {
        let doc = json!({"userId": "USER001", "applianceId": "APP001"});
        let doc = doc.as_object().unwrap();

        let filter = Filter::new().eq("userId", "USER001").eq("applianceId", "APP001");
        assert!(filter.matches(doc));

        let filter = Filter::new().eq("userId", "USER001").eq("applianceId", "APP002");
        assert!(!filter.matches(doc));
    }

    #[test]
    fn test_filter_display() {
        let filter = Filter::new().eq("userId", "U1").eq("fuelId", "F1");
        assert_eq!(filter.to_string(), "userId=U1, fuelId=F1");
    }

    #[test]
    fn test_timestamp_round_trips_through_chrono() {
        let now = Utc::now();
        let text = format_timestamp(now);
        assert!(text.ends_with('Z'));
        let parsed: DateTime<Utc> = text.parse().unwrap();
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
    }

    #[test]
    fn test_str_field_skips_blank() {
        let doc = json!({"a": "  ", "b": " x ", "c": 3});
        let doc = doc.as_object().unwrap();
        assert_eq!(str_field(doc, "a"), None);
        assert_eq!(str_field(doc, "b"), Some("x"));
        assert_eq!(str_field(doc, "c"), None);
        assert_eq!(str_field(doc, "missing"), None);
    }
}
