//! Lenient accessors over `extra_info` mappings.
//!
//! Reward rules never fail on malformed auxiliary data: missing or mistyped
//! values read as zero, empty, or false.

use serde_json::{Map, Value};

/// Borrowed view over an optional `extra_info` mapping
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtraInfo<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> ExtraInfo<'a> {
    pub fn new(map: Option<&'a Map<String, Value>>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.and_then(|m| m.get(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Numeric value for `key`, 0.0 when absent or not a number
    pub fn number(&self, key: &str) -> f64 {
        self.get(key).map(number_or_zero).unwrap_or(0.0)
    }

    /// String entries of the list under `key`; non-string entries are skipped
    pub fn strings(&self, key: &str) -> Vec<&'a str> {
        match self.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(s)) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub fn number_or_zero(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}
