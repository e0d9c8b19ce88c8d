//! Typed scalar values carried by records.

use chrono::{DateTime, Utc};
use serde::ser::Serializer;
use serde::Serialize;

/// A single cell value. Wire input is restricted to flat scalars; timestamps
/// appear once the temporal validator has parsed a recognized date column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Convert a raw JSON value into a typed cell. Lenient: nested
    /// arrays/objects are stringified rather than rejected.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s.clone()),
            other => Value::Str(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Lenient numeric coercion: numbers pass through, booleans map to 0/1,
    /// strings are parsed, everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Str(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// String form of a non-null value. Every non-null value has one;
    /// identifier coercion relies on this never failing.
    pub fn display_string(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Str(s) => Some(s.clone()),
            Value::Timestamp(t) => Some(t.to_rfc3339()),
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Check whether a string is one of the textual stand-ins for a missing
    /// value ("nan", "null", "n/a", ...).
    pub fn is_null_text(text: &str) -> bool {
        let trimmed = text.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            // Non-finite floats are rewritten to null by the sanitize pass;
            // serializing any stragglers as null keeps the wire form safe.
            Value::Float(_) => serializer.serialize_none(),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Timestamp(t) => serializer.serialize_str(&t.to_rfc3339()),
        }
    }
}
