//! Main Garimpo struct and public API.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{GarimpoError, Result};
use crate::integrity::validate_integrity;
use crate::normalize::Normalizer;
use crate::outlier::{self, OutlierMode};
use crate::payload::Payload;
use crate::record::{RecordBatch, Value};
use crate::schema::Entity;
use crate::temporal::TemporalValidator;

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct GarimpoConfig {
    /// Combined row-count limit across all entities; oversized payloads are
    /// rejected before any stage runs.
    pub max_total_rows: usize,
    /// IQR multiplier for outlier bounds.
    pub iqr_factor: f64,
}

impl Default for GarimpoConfig {
    fn default() -> Self {
        Self {
            max_total_rows: 10_000,
            iqr_factor: outlier::DEFAULT_IQR_FACTOR,
        }
    }
}

/// The partitioned, wire-safe result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutput {
    pub status: String,
    /// Accepted records per entity, keyed by the caller's entity name.
    pub data: IndexMap<String, RecordBatch>,
    /// Orphaned records per violated foreign key (e.g. `items→orders`).
    pub orphans: IndexMap<String, RecordBatch>,
}

/// Foreign keys checked for order items, in fixed order. First failure wins:
/// a record orphaned by an earlier check never reaches a later one.
const ITEM_CHECKS: &[(&str, Entity, &str)] = &[
    ("order_id", Entity::Orders, "items→orders"),
    ("product_id", Entity::Products, "items→products"),
    ("seller_id", Entity::Sellers, "items→sellers"),
];

/// The pipeline orchestrator.
pub struct Garimpo {
    config: GarimpoConfig,
    normalizer: Normalizer,
}

impl Garimpo {
    /// Create an orchestrator with default configuration.
    pub fn new() -> Self {
        Self::with_config(GarimpoConfig::default())
    }

    pub fn with_config(config: GarimpoConfig) -> Self {
        Self {
            config,
            normalizer: Normalizer::new(),
        }
    }

    /// Run the full pipeline for one payload: normalize each entity, apply
    /// temporal validation and outlier capping where applicable, partition
    /// order items by referential integrity, and assemble the sanitized
    /// response.
    pub fn process(&self, payload: &Payload) -> Result<ProcessOutput> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("process", run_id = %run_id);
        let _guard = span.enter();

        let total_rows = payload.total_rows();
        if total_rows > self.config.max_total_rows {
            return Err(GarimpoError::PayloadTooLarge {
                rows: total_rows,
                limit: self.config.max_total_rows,
            });
        }
        info!(total_rows, entities = payload.entities.len(), "pipeline run started");

        // Stage 1: per-entity normalization, temporal validation, capping.
        let mut processed: IndexMap<String, RecordBatch> = IndexMap::new();
        let mut entity_keys: HashMap<Entity, String> = HashMap::new();
        let temporal = TemporalValidator::new();

        for (name, raw) in &payload.entities {
            if raw.is_empty() {
                continue;
            }
            let entity = match Entity::from_name(name) {
                Some(entity) => entity,
                None => {
                    warn!(entity = %name, "no normalizer registered, skipping entity");
                    continue;
                }
            };

            let mut batch = self.normalizer.normalize(entity, raw);
            if entity.has_temporal_columns() {
                temporal.apply(&mut batch);
            }
            for &column in entity.outlier_columns() {
                batch = outlier::treat(batch, column, self.config.iqr_factor, OutlierMode::Capping);
            }

            info!(entity = %entity, rows = batch.len(), "entity normalized");
            entity_keys.insert(entity, name.clone());
            processed.insert(name.clone(), batch);
        }

        // Stage 2: referential integrity for order items, one check per
        // foreign key, threading the valid partition through the chain.
        let mut orphans: IndexMap<String, RecordBatch> = IndexMap::new();
        if let Some(items_key) = entity_keys.get(&Entity::OrderItems).cloned() {
            let mut valid = processed
                .shift_remove(&items_key)
                .unwrap_or_else(RecordBatch::empty);
            let empty = RecordBatch::empty();

            for &(key, parent_entity, violation) in ITEM_CHECKS {
                let parent = entity_keys
                    .get(&parent_entity)
                    .and_then(|name| processed.get(name))
                    .unwrap_or(&empty);
                let (next_valid, step_orphans) = validate_integrity(valid, parent, key, key)
                    .map_err(|e| e.in_stage(Entity::OrderItems.name(), "integrity"))?;
                valid = next_valid;
                if !step_orphans.is_empty() {
                    info!(violation, count = step_orphans.len(), "orphans partitioned");
                    orphans.insert(violation.to_string(), step_orphans);
                }
            }

            processed.insert(items_key, valid);
        }

        // Stage 3: rewrite non-finite numerics to null across every batch.
        for batch in processed.values_mut().chain(orphans.values_mut()) {
            sanitize(batch);
        }

        info!("pipeline run finished");
        Ok(ProcessOutput {
            status: "success".to_string(),
            data: processed,
            orphans,
        })
    }
}

impl Default for Garimpo {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace every non-finite float with an explicit null.
fn sanitize(batch: &mut RecordBatch) {
    for record in &mut batch.records {
        for value in record.fields.values_mut().chain(record.extra.values_mut()) {
            if matches!(value, Value::Float(f) if !f.is_finite()) {
                *value = Value::Null;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn test_sanitize_rewrites_non_finite() {
        let mut record = Record::new();
        record.fields.insert("a".to_string(), Value::Float(f64::NAN));
        record.fields.insert("b".to_string(), Value::Float(f64::INFINITY));
        record.fields.insert("c".to_string(), Value::Float(1.0));
        record.extra.insert("d".to_string(), Value::Float(f64::NEG_INFINITY));
        let mut batch = RecordBatch::new(vec![record]);

        sanitize(&mut batch);

        let record = &batch.records[0];
        assert_eq!(record.get("a"), Some(&Value::Null));
        assert_eq!(record.get("b"), Some(&Value::Null));
        assert_eq!(record.get("c"), Some(&Value::Float(1.0)));
        assert_eq!(record.get("d"), Some(&Value::Null));
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let mut payload = Payload::new();
        let record = serde_json::json!({"order_id": "o1"});
        payload.insert(
            "orders",
            vec![record.as_object().unwrap().clone(); 11],
        );

        let garimpo = Garimpo::with_config(GarimpoConfig {
            max_total_rows: 10,
            ..GarimpoConfig::default()
        });
        let err = garimpo.process(&payload).unwrap_err();
        assert!(matches!(
            err,
            GarimpoError::PayloadTooLarge { rows: 11, limit: 10 }
        ));
    }
}
