//! IQR-based outlier bounding, entity-agnostic.

use std::str::FromStr;

use tracing::warn;

use crate::error::GarimpoError;
use crate::record::{RecordBatch, Value};
use crate::stats::Quartiles;

/// Default IQR multiplier for the outlier bounds.
pub const DEFAULT_IQR_FACTOR: f64 = 1.5;

/// Batches smaller than this make quantile estimates meaningless; outlier
/// treatment is skipped for them.
pub const MIN_ROWS: usize = 3;

/// What to do with out-of-bound values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlierMode {
    /// Clamp out-of-bound values to the nearest bound; row count preserved.
    #[default]
    Capping,
    /// Drop rows whose value is null, non-numeric, or out of bounds.
    Removal,
}

impl FromStr for OutlierMode {
    type Err = GarimpoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "capping" => Ok(OutlierMode::Capping),
            "removal" | "remove" => Ok(OutlierMode::Removal),
            other => Err(GarimpoError::Config(format!(
                "unknown outlier mode '{}': use capping or removal",
                other
            ))),
        }
    }
}

impl std::fmt::Display for OutlierMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutlierMode::Capping => write!(f, "capping"),
            OutlierMode::Removal => write!(f, "removal"),
        }
    }
}

/// Bound a numeric column to `[Q1 - factor*IQR, Q3 + factor*IQR]`.
///
/// Undersized batches and columns with undefined or non-finite bounds are
/// returned unchanged; both are logged as skips, not errors.
pub fn treat(batch: RecordBatch, column: &str, factor: f64, mode: OutlierMode) -> RecordBatch {
    if batch.len() < MIN_ROWS {
        warn!(column, rows = batch.len(), "batch too small for outlier analysis, skipping");
        return batch;
    }

    let quartiles = match Quartiles::of(&batch.numeric_values(column)) {
        Some(q) => q,
        None => {
            warn!(column, "no numeric values, skipping outlier treatment");
            return batch;
        }
    };
    let (lower, upper) = quartiles.bounds(factor);
    if !lower.is_finite() || !upper.is_finite() {
        warn!(column, "IQR bounds undefined, skipping outlier treatment");
        return batch;
    }

    match mode {
        OutlierMode::Capping => cap(batch, column, lower, upper),
        OutlierMode::Removal => remove(batch, column, lower, upper),
    }
}

fn cap(mut batch: RecordBatch, column: &str, lower: f64, upper: f64) -> RecordBatch {
    for record in &mut batch.records {
        let numeric = record.get(column).and_then(Value::as_f64);
        if let Some(f) = numeric {
            if f < lower {
                record.set(column, Value::Float(lower));
            } else if f > upper {
                record.set(column, Value::Float(upper));
            }
        }
    }
    batch
}

fn remove(mut batch: RecordBatch, column: &str, lower: f64, upper: f64) -> RecordBatch {
    // pandas mask semantics: a null value fails the in-bounds filter, so the
    // row is dropped.
    batch.records.retain(|record| {
        record
            .get(column)
            .and_then(Value::as_f64)
            .map(|f| f >= lower && f <= upper)
            .unwrap_or(false)
    });
    batch
}
