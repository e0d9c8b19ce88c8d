//! Record and batch representations.

use indexmap::{IndexMap, IndexSet};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::value::Value;

/// One row of an entity batch. Columns the entity schema recognizes live in
/// `fields` with their declared type; everything else rides along verbatim in
/// the `extra` overflow bag and is re-emitted on serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub fields: IndexMap<String, Value>,
    pub extra: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a column in either map.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column).or_else(|| self.extra.get(column))
    }

    /// Write a column, preferring whichever map already holds it. New columns
    /// (derived flags, reason tags) become known fields.
    pub fn set(&mut self, column: &str, value: Value) {
        if let Some(slot) = self.fields.get_mut(column) {
            *slot = value;
        } else if let Some(slot) = self.extra.get_mut(column) {
            *slot = value;
        } else {
            self.fields.insert(column.to_string(), value);
        }
    }

    /// Iterate all columns, known fields first.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .chain(self.extra.iter())
            .map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + self.extra.len()))?;
        for (key, value) in self.columns() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// An ordered sequence of records of one entity type. Serializes as a plain
/// list of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordBatch {
    pub records: Vec<Record>,
}

impl RecordBatch {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ordered union of column names across all records.
    pub fn columns(&self) -> IndexSet<String> {
        let mut columns = IndexSet::new();
        for record in &self.records {
            for (name, _) in record.columns() {
                columns.insert(name.to_string());
            }
        }
        columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.records.iter().any(|r| r.get(column).is_some())
    }

    /// Values of one column, row order, `Null` where a record lacks it.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> {
        self.records
            .iter()
            .map(move |r| r.get(column).unwrap_or(&Value::Null))
    }

    /// Non-null numeric values of one column.
    pub fn numeric_values(&self, column: &str) -> Vec<f64> {
        self.column_values(column)
            .filter_map(|v| v.as_f64())
            .filter(|f| f.is_finite())
            .collect()
    }
}
