//! Error types for the Garimpo library.

use thiserror::Error;

/// Main error type for Garimpo operations.
#[derive(Debug, Error)]
pub enum GarimpoError {
    /// Invalid configuration argument (e.g. an unrecognized outlier mode).
    #[error("configuration error: {0}")]
    Config(String),

    /// A declared key column is missing from the batch it was declared for,
    /// so a referential-integrity check cannot be performed.
    #[error("key column '{column}' not found in {dataset} dataset")]
    MissingKeyColumn { column: String, dataset: String },

    /// Combined row count across all entities exceeds the configured limit.
    #[error("payload of {rows} rows exceeds the limit of {limit}")]
    PayloadTooLarge { rows: usize, limit: usize },

    /// A pipeline stage failed for a specific entity.
    #[error("{stage} stage failed for entity '{entity}': {source}")]
    Stage {
        entity: String,
        stage: &'static str,
        #[source]
        source: Box<GarimpoError>,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GarimpoError {
    /// Wrap an error with the entity and stage it occurred in.
    pub fn in_stage(self, entity: impl Into<String>, stage: &'static str) -> Self {
        GarimpoError::Stage {
            entity: entity.into(),
            stage,
            source: Box::new(self),
        }
    }
}

/// Result type alias for Garimpo operations.
pub type Result<T> = std::result::Result<T, GarimpoError>;
