//! Flattened property store backing file-based client configuration.
//!
//! The store is filled once by a capture step (see [`super::loader`]) and is
//! read-only while a resolution pass runs.

use crate::error::StoreError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A single stored property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Integer(i64),
    Text(String),
    /// Anything else the document held (booleans, floats, arrays).
    Other(Value),
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Integer(n) => write!(f, "{}", n),
            PropertyValue::Text(s) => write!(f, "{}", s),
            PropertyValue::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => PropertyValue::Text(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Integer(i),
                None => PropertyValue::Other(Value::Number(n)),
            },
            other => PropertyValue::Other(other),
        }
    }
}

/// Key/value map with typed, fallible accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertyStore {
    properties: BTreeMap<String, PropertyValue>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a JSON object.
    ///
    /// Scalar top-level keys are stored as-is; nested objects are flattened
    /// into `parent.child` keys.
    pub fn from_json_object(object: Map<String, Value>) -> Self {
        let mut store = Self::new();
        store.merge_json_object(object);
        store
    }

    /// Add the entries of a JSON object, replacing existing keys.
    pub fn merge_json_object(&mut self, object: Map<String, Value>) {
        flatten_into(&mut self.properties, None, object);
    }

    /// Add every entry of `other`, replacing existing keys.
    pub fn overlay(&mut self, other: PropertyStore) {
        self.properties.extend(other.properties);
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Result<&PropertyValue, StoreError> {
        self.properties.get(key).ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })
    }

    pub fn get_string(&self, key: &str) -> Result<&str, StoreError> {
        match self.get(key)? {
            PropertyValue::Text(s) => Ok(s),
            _ => Err(StoreError::TypeMismatch {
                key: key.to_string(),
                expected: "string",
            }),
        }
    }

    pub fn get_int(&self, key: &str) -> Result<i32, StoreError> {
        match self.get(key)? {
            PropertyValue::Integer(n) => i32::try_from(*n).map_err(|_| StoreError::TypeMismatch {
                key: key.to_string(),
                expected: "32-bit integer",
            }),
            _ => Err(StoreError::TypeMismatch {
                key: key.to_string(),
                expected: "integer",
            }),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Integer(i64::from(value))
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

fn flatten_into(
    properties: &mut BTreeMap<String, PropertyValue>,
    prefix: Option<&str>,
    object: Map<String, Value>,
) {
    for (key, value) in object {
        let key = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key,
        };
        match value {
            Value::Object(nested) => flatten_into(properties, Some(&key), nested),
            Value::Null => {}
            scalar => {
                properties.insert(key, scalar.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(value: Value) -> PropertyStore {
        match value {
            Value::Object(map) => PropertyStore::from_json_object(map),
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_typed_accessors() {
        let store = store(json!({"irods_host": "localhost", "irods_port": 1247}));
        assert_eq!(store.get_string("irods_host").unwrap(), "localhost");
        assert_eq!(store.get_int("irods_port").unwrap(), 1247);
    }

    #[test]
    fn test_missing_key_is_not_found() {
        let store = PropertyStore::new();
        assert_eq!(
            store.get_string("irods_host"),
            Err(StoreError::NotFound {
                key: "irods_host".into()
            })
        );
    }

    #[test]
    fn test_type_mismatch() {
        let store = store(json!({"irods_port": "1247", "irods_host": 5}));
        assert!(matches!(
            store.get_int("irods_port"),
            Err(StoreError::TypeMismatch { .. })
        ));
        assert!(matches!(
            store.get_string("irods_host"),
            Err(StoreError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_out_of_range_integer_is_a_mismatch() {
        let store = store(json!({"irods_port": 1_i64 << 40}));
        assert!(matches!(
            store.get_int("irods_port"),
            Err(StoreError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_nested_objects_are_flattened() {
        let store = store(json!({
            "encryption": {"key_size": 32, "algorithm": "AES-256-CBC"},
            "irods_zone_name": "tempZone",
            "ignored": null
        }));
        assert_eq!(store.get_int("encryption.key_size").unwrap(), 32);
        assert_eq!(
            store.get_string("encryption.algorithm").unwrap(),
            "AES-256-CBC"
        );
        assert!(!store.contains_key("ignored"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_overlay_replaces_keys() {
        let mut base = store(json!({"irods_host": "a", "irods_port": 1}));
        base.overlay(store(json!({"irods_host": "b"})));
        assert_eq!(base.get_string("irods_host").unwrap(), "b");
        assert_eq!(base.get_int("irods_port").unwrap(), 1);
    }
}
