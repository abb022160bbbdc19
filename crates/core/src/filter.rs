//! Metadata filtering for search
//!
//! Supports equality filtering on top-level scalar fields, with AND
//! semantics across conditions. Nested paths and ranges are not supported.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Chunk and document metadata: a JSON object of scalar values
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// JSON scalar value for filtering
///
/// Only scalar values can be used in equality filters. Serialized as the
/// plain JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonScalar {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (stored as f64)
    Number(f64),
    /// String value
    String(String),
}

impl JsonScalar {
    /// Check if this scalar matches a JSON value
    pub fn matches_json(&self, value: &serde_json::Value) -> bool {
        match (self, value) {
            (JsonScalar::Null, serde_json::Value::Null) => true,
            (JsonScalar::Bool(a), serde_json::Value::Bool(b)) => a == b,
            (JsonScalar::Number(a), serde_json::Value::Number(b)) => {
                b.as_f64().is_some_and(|n| (a - n).abs() < f64::EPSILON)
            }
            (JsonScalar::String(a), serde_json::Value::String(b)) => a == b,
            _ => false,
        }
    }

    /// Convert a JSON value into a scalar, rejecting arrays and objects
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(JsonScalar::Null),
            serde_json::Value::Bool(b) => Some(JsonScalar::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(JsonScalar::Number),
            serde_json::Value::String(s) => Some(JsonScalar::String(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident($conv:expr)),* $(,)?) => {
        $(
            impl From<$ty> for JsonScalar {
                fn from(v: $ty) -> Self {
                    JsonScalar::$variant($conv(v))
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool(|v: bool| v),
    i32 => Number(f64::from),
    u32 => Number(f64::from),
    i64 => Number(|v: i64| v as f64),
    f64 => Number(|v: f64| v),
    String => String(|v: String| v),
    &str => String(|v: &str| v.to_string()),
}

/// Metadata filter for search (equality only)
///
/// All conditions must match. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataFilter {
    /// Top-level field equality (scalar values only)
    pub equals: HashMap<String, JsonScalar>,
}

impl MetadataFilter {
    /// Create an empty filter (matches all)
    pub fn new() -> Self {
        MetadataFilter {
            equals: HashMap::new(),
        }
    }

    /// Add an equality condition
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<JsonScalar>) -> Self {
        self.equals.insert(field.into(), value.into());
        self
    }

    /// Build a filter from a JSON object of scalar conditions
    ///
    /// Returns `None` if any condition value is an array or object.
    pub fn from_json_object(conditions: &Metadata) -> Option<Self> {
        let mut filter = MetadataFilter::new();
        for (field, value) in conditions {
            filter
                .equals
                .insert(field.clone(), JsonScalar::from_json(value)?);
        }
        Some(filter)
    }

    /// Check if metadata matches this filter
    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.equals.iter().all(|(key, expected)| {
            metadata
                .get(key)
                .is_some_and(|actual| expected.matches_json(actual))
        })
    }

    /// Check if filter is empty (matches all)
    pub fn is_empty(&self) -> bool {
        self.equals.is_empty()
    }

    /// Get the number of conditions in the filter
    pub fn len(&self) -> usize {
        self.equals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: serde_json::Value) -> Metadata {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = MetadataFilter::new();
        assert!(filter.matches(&Metadata::new()));
        assert!(filter.matches(&meta(json!({"foo": "bar"}))));
        assert!(filter.is_empty());
        assert_eq!(filter.len(), 0);
    }

    #[test]
    fn test_filter_matches_exact() {
        let filter = MetadataFilter::new()
            .eq("category", "document")
            .eq("year", 2024);

        let m = meta(json!({
            "category": "document",
            "year": 2024,
            "extra": "ignored"
        }));
        assert!(filter.matches(&m));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_filter_missing_field() {
        let filter = MetadataFilter::new()
            .eq("category", "document")
            .eq("year", 2024);
        assert!(!filter.matches(&meta(json!({ "category": "document" }))));
    }

    #[test]
    fn test_filter_wrong_value() {
        let filter = MetadataFilter::new().eq("category", "document");
        assert!(!filter.matches(&meta(json!({ "category": "image" }))));
    }

    #[test]
    fn test_filter_bool_and_null() {
        let filter = MetadataFilter::new().eq("active", true);
        assert!(filter.matches(&meta(json!({ "active": true }))));
        assert!(!filter.matches(&meta(json!({ "active": false }))));

        let filter = MetadataFilter::new().eq("deleted", JsonScalar::Null);
        assert!(filter.matches(&meta(json!({ "deleted": null }))));
        assert!(!filter.matches(&meta(json!({ "deleted": false }))));
    }

    #[test]
    fn test_json_scalar_type_mismatches() {
        assert!(!JsonScalar::Bool(true).matches_json(&json!(1)));
        assert!(!JsonScalar::Number(42.0).matches_json(&json!("42")));
        assert!(!JsonScalar::String("42".to_string()).matches_json(&json!(42)));
    }

    #[test]
    fn test_from_json_object() {
        let conditions = meta(json!({"lang": "en", "page": 3}));
        let filter = MetadataFilter::from_json_object(&conditions).unwrap();
        assert_eq!(filter.len(), 2);
        assert!(filter.matches(&meta(json!({"lang": "en", "page": 3, "x": 1}))));

        let nested = meta(json!({"tags": ["a", "b"]}));
        assert!(MetadataFilter::from_json_object(&nested).is_none());
    }

    #[test]
    fn test_filter_serializes_plain_values() {
        let filter = MetadataFilter::new().eq("lang", "en");
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"equals": {"lang": "en"}})
        );
        let parsed: MetadataFilter =
            serde_json::from_value(json!({"equals": {"page": 3, "draft": false, "x": null}}))
                .unwrap();
        assert_eq!(parsed.equals["page"], JsonScalar::Number(3.0));
        assert_eq!(parsed.equals["draft"], JsonScalar::Bool(false));
        assert_eq!(parsed.equals["x"], JsonScalar::Null);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn filter_from_own_fields_matches(
                fields in proptest::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,8}", 0..6)
            ) {
                let mut m = Metadata::new();
                for (k, v) in &fields {
                    m.insert(k.clone(), serde_json::Value::String(v.clone()));
                }
                let filter = MetadataFilter::from_json_object(&m).unwrap();
                prop_assert!(filter.matches(&m));
                prop_assert_eq!(filter.len(), fields.len());
            }
        }
    }
}
