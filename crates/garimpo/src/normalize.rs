//! Schema normalization: column standardization, type coercion, vocabulary
//! translation, and imputation, driven by the per-entity descriptors.

use indexmap::IndexSet;
use tracing::warn;

use crate::payload::RawRecord;
use crate::record::{Record, RecordBatch, Value};
use crate::schema::vocab::{fold_accents, CATEGORY_SENTINEL, STATUS_TRANSLATIONS};
use crate::schema::{Entity, FieldKind};
use crate::stats;

/// Builds a normalized batch from raw payload records. The raw input is
/// borrowed and never mutated; the returned batch is a fresh copy.
#[derive(Debug, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, entity: Entity, raw: &[RawRecord]) -> RecordBatch {
        let schema = entity.schema();

        // Standardize names and split known fields from the overflow bag.
        let mut records: Vec<Record> = raw
            .iter()
            .map(|raw_record| {
                let mut record = Record::new();
                for (name, value) in raw_record {
                    let column = name.trim().to_lowercase();
                    let value = Value::from_json(value);
                    if schema.field(&column).is_some() {
                        record.fields.insert(column, value);
                    } else {
                        record.extra.insert(column, value);
                    }
                }
                record
            })
            .collect();

        // Uniform column set: the ordered union of observed columns, with
        // absent cells as null.
        let mut columns: IndexSet<String> = IndexSet::new();
        for record in &records {
            for (name, _) in record.columns() {
                columns.insert(name.to_string());
            }
        }
        for record in &mut records {
            for column in &columns {
                if record.get(column).is_none() {
                    if schema.field(column).is_some() {
                        record.fields.insert(column.clone(), Value::Null);
                    } else {
                        record.extra.insert(column.clone(), Value::Null);
                    }
                }
            }
        }

        let mut batch = RecordBatch::new(records);

        for column in schema.required_columns() {
            if !columns.contains(column) {
                warn!(
                    entity = %entity,
                    column,
                    "required column missing from input batch"
                );
            }
        }

        // Record-level kind transforms.
        for spec in schema.fields {
            if !columns.contains(spec.name) {
                continue;
            }
            match spec.kind {
                FieldKind::Identifier => self.apply(&mut batch, spec.name, coerce_identifier),
                FieldKind::Status => self.apply(&mut batch, spec.name, translate_status),
                FieldKind::Category => self.apply(&mut batch, spec.name, normalize_category),
                FieldKind::Count => self.apply(&mut batch, spec.name, coerce_count),
                FieldKind::Place => self.apply(&mut batch, spec.name, normalize_place),
                // Measures need column statistics; handled below.
                FieldKind::Measure => {}
                // Timestamps belong to the temporal validator.
                FieldKind::Timestamp => {}
            }
        }

        // Batch-level measure imputation: coerce, then fill nulls with the
        // column median, or zero when the median is undefined.
        for spec in schema.fields {
            if spec.kind != FieldKind::Measure || !columns.contains(spec.name) {
                continue;
            }
            self.apply(&mut batch, spec.name, coerce_measure);
            let fill = stats::median(&batch.numeric_values(spec.name)).unwrap_or(0.0);
            for record in &mut batch.records {
                if record.get(spec.name).map(Value::is_null).unwrap_or(false) {
                    record.set(spec.name, Value::Float(fill));
                }
            }
        }

        batch
    }

    fn apply(&self, batch: &mut RecordBatch, column: &str, transform: fn(&Value) -> Value) {
        for record in &mut batch.records {
            if let Some(value) = record.get(column) {
                let transformed = transform(value);
                record.set(column, transformed);
            }
        }
    }
}

/// Identifiers become their string form. Nulls stay null rather than turning
/// into a literal "nan".
fn coerce_identifier(value: &Value) -> Value {
    match value.display_string() {
        Some(s) => Value::Str(s),
        None => Value::Null,
    }
}

/// Lower-case, trim, then translate through the fixed status vocabulary;
/// unmapped statuses pass through unchanged.
fn translate_status(value: &Value) -> Value {
    match value.display_string() {
        Some(s) => {
            let status = s.trim().to_lowercase();
            match STATUS_TRANSLATIONS.get(status.as_str()) {
                Some(translated) => Value::Str((*translated).to_string()),
                None => Value::Str(status),
            }
        }
        None => Value::Null,
    }
}

/// Lower-case snake-case category, with missing/blank/textual-null values
/// mapped to the sentinel.
fn normalize_category(value: &Value) -> Value {
    let text = match value.display_string() {
        Some(s) => s,
        None => return Value::Str(CATEGORY_SENTINEL.to_string()),
    };
    let folded = text.trim().to_lowercase();
    if Value::is_null_text(&folded) {
        Value::Str(CATEGORY_SENTINEL.to_string())
    } else {
        Value::Str(folded.replace(' ', "_"))
    }
}

/// Counts default to zero when missing or unparseable.
fn coerce_count(value: &Value) -> Value {
    Value::Float(value.as_f64().unwrap_or(0.0))
}

/// Measures coerce leniently; unparseable values become null so the median
/// fill can pick them up.
fn coerce_measure(value: &Value) -> Value {
    match value.as_f64() {
        Some(f) => Value::Float(f),
        None => Value::Null,
    }
}

/// Place names are accent-folded to ASCII, upper-cased, trimmed.
fn normalize_place(value: &Value) -> Value {
    match value.display_string() {
        Some(s) => Value::Str(fold_accents(&s).to_uppercase().trim().to_string()),
        None => Value::Null,
    }
}
