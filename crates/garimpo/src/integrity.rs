//! Referential-integrity validation between a child batch and a parent batch.

use std::collections::HashSet;

use tracing::warn;

use crate::error::{GarimpoError, Result};
use crate::record::{RecordBatch, Value};

/// Column the orphan reason tag is written to.
pub const ISSUE_COLUMN: &str = "dq_issue";

/// Partition a child batch by whether each record's foreign key resolves to
/// a record in the parent batch. Returns `(valid, orphans)`; orphans carry a
/// reason tag naming the failed key.
///
/// An empty or absent parent means no valid parent universe exists: every
/// child record is an orphan. A missing key column is a configuration error,
/// not a data error, and aborts the run.
pub fn validate_integrity(
    child: RecordBatch,
    parent: &RecordBatch,
    child_key: &str,
    parent_key: &str,
) -> Result<(RecordBatch, RecordBatch)> {
    if parent.is_empty() {
        let orphans = tag_all(child, child_key);
        if !orphans.is_empty() {
            warn!(child_key, "parent batch empty, all child records orphaned");
        }
        return Ok((RecordBatch::empty(), orphans));
    }

    if child.is_empty() {
        return Ok((RecordBatch::empty(), RecordBatch::empty()));
    }

    if !child.has_column(child_key) {
        return Err(GarimpoError::MissingKeyColumn {
            column: child_key.to_string(),
            dataset: "child".to_string(),
        });
    }
    if !parent.has_column(parent_key) {
        return Err(GarimpoError::MissingKeyColumn {
            column: parent_key.to_string(),
            dataset: "parent".to_string(),
        });
    }

    let parent_keys: HashSet<String> = parent
        .column_values(parent_key)
        .filter_map(Value::display_string)
        .collect();

    let mut valid = RecordBatch::empty();
    let mut orphans = RecordBatch::empty();
    for mut record in child.records {
        let resolves = record
            .get(child_key)
            .and_then(Value::display_string)
            .map(|key| parent_keys.contains(&key))
            .unwrap_or(false);
        if resolves {
            valid.records.push(record);
        } else {
            record.set(ISSUE_COLUMN, Value::Str(orphan_reason(child_key)));
            orphans.records.push(record);
        }
    }

    if !orphans.is_empty() {
        warn!(child_key, orphans = orphans.len(), "orphan records found");
    }

    Ok((valid, orphans))
}

fn orphan_reason(child_key: &str) -> String {
    format!("orphan: {} not found in parent dataset", child_key)
}

fn tag_all(mut child: RecordBatch, child_key: &str) -> RecordBatch {
    for record in &mut child.records {
        record.set(ISSUE_COLUMN, Value::Str(orphan_reason(child_key)));
    }
    child
}
