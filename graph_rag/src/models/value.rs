use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single value returned by the graph store.
///
/// Rows are untyped, so every column is decoded into this sum type. Equality
/// is structural: two records are equal when they hold the same keys with
/// equal values, regardless of the order the store produced them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Record(BTreeMap<String, Value>),
}

/// One advance of a row cursor
pub type Row = Vec<Value>;

impl Value {
    pub fn record<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Record(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_equality_ignores_insertion_order() {
        let a = Value::record([("name", Value::from("Morphine")), ("dose", Value::from(10i64))]);
        let b = Value::record([("dose", Value::from(10i64)), ("name", Value::from("Morphine"))]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_integer_and_float_are_distinct() {
        assert_ne!(Value::Integer(1), Value::Float(1.0));
    }

    #[test]
    fn test_deserialize_from_json() {
        let value: Value = serde_json::from_str(r#"{"name": "Prevacid", "tags": ["ppi", null], "n": 2}"#).unwrap();
        let expected = Value::record([
            ("name", Value::from("Prevacid")),
            ("tags", Value::List(vec![Value::from("ppi"), Value::Null])),
            ("n", Value::from(2i64)),
        ]);
        assert_eq!(value, expected);
    }
}
