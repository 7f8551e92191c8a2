//! Caller-supplied key/value context for log records
//!
//! `RecordContext` holds only custom fields; built-in record attributes
//! (severity, timestamp, thread, location) live in named `Record` fields, so
//! the reserved-vs-custom distinction is a type-level property rather than a
//! runtime set-membership check.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type for structured context fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl FieldValue {
    /// Convert to `serde_json::Value` for rendering
    ///
    /// Non-finite floats are coerced to their string representation so the
    /// render path never fails on a value JSON cannot express.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(f.to_string())),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<serde_json::Value> for FieldValue {
    /// Lossy conversion: arrays and objects are coerced to their compact
    /// string form rather than rejected, per the degrade-to-string contract.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Float(f)
                } else {
                    FieldValue::String(n.to_string())
                }
            }
            serde_json::Value::String(s) => FieldValue::String(s),
            other => FieldValue::String(other.to_string()),
        }
    }
}

/// Ordered collection of caller-supplied context fields
///
/// Insertion order is preserved in rendered output. Inserting an existing key
/// replaces its value, so a context can never produce duplicate JSON keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordContext {
    fields: Vec<(String, FieldValue)>,
}

impl RecordContext {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field, replacing any existing value under the same key
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.add_field(key, value);
        self
    }

    /// Add a field (mutable version)
    pub fn add_field<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
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
    fn test_context_creation() {
        let ctx = RecordContext::new();
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_context_with_fields() {
        let ctx = RecordContext::new()
            .with_field("user_id", 123)
            .with_field("username", "john_doe")
            .with_field("active", true);

        assert_eq!(ctx.len(), 3);
        assert_eq!(ctx.get("user_id"), Some(&FieldValue::Int(123)));
    }

    #[test]
    fn test_context_replace_on_duplicate_key() {
        let ctx = RecordContext::new()
            .with_field("key", "first")
            .with_field("key", "second");

        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.get("key"), Some(&FieldValue::String("second".into())));
    }

    #[test]
    fn test_context_preserves_insertion_order() {
        let ctx = RecordContext::new()
            .with_field("z", 1)
            .with_field("a", 2)
            .with_field("m", 3);

        let keys: Vec<&str> = ctx.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_field_value_from_json() {
        let arr = serde_json::json!([1, 2, 3]);
        assert_eq!(FieldValue::from(arr), FieldValue::String("[1,2,3]".into()));

        let obj = serde_json::json!({"a": 1});
        assert_eq!(
            FieldValue::from(obj),
            FieldValue::String("{\"a\":1}".into())
        );

        assert_eq!(
            FieldValue::from(serde_json::json!(42)),
            FieldValue::Int(42)
        );
        assert_eq!(FieldValue::from(serde_json::Value::Null), FieldValue::Null);
    }

    #[test]
    fn test_non_finite_float_coerced_to_string() {
        let value = FieldValue::Float(f64::NAN);
        assert_eq!(
            value.to_json_value(),
            serde_json::Value::String("NaN".to_string())
        );
    }
}
