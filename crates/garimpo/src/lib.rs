//! Garimpo: cleaning and validation pipeline for e-commerce record batches.
//!
//! Garimpo takes four related batches of loosely-structured records (orders,
//! order items, products, sellers), normalizes their schemas, validates
//! temporal and referential consistency, bounds numeric outliers, and emits a
//! partitioned, wire-safe result: accepted records and orphaned records, per
//! entity.
//!
//! # Core principles
//!
//! - **Lenient on data**: unparseable values coerce to null; unknown entities
//!   and columns are skipped or carried along, never a crash.
//! - **Strict on configuration**: a missing key column or an invalid mode
//!   aborts the run with full context.
//! - **Wire-safe output**: no NaN or infinite value survives serialization.
//!
//! # Example
//!
//! ```no_run
//! use garimpo::{Garimpo, Payload};
//!
//! let payload = Payload::from_json(r#"{"orders": [{"order_id": "o1"}]}"#).unwrap();
//! let output = Garimpo::new().process(&payload).unwrap();
//!
//! println!("status: {}", output.status);
//! println!("entities: {}", output.data.len());
//! ```

pub mod error;
pub mod integrity;
pub mod normalize;
pub mod outlier;
pub mod payload;
pub mod record;
pub mod schema;
pub mod stats;
pub mod temporal;

mod garimpo;

pub use crate::garimpo::{Garimpo, GarimpoConfig, ProcessOutput};
pub use error::{GarimpoError, Result};
pub use payload::{Payload, RawRecord};
pub use record::{Record, RecordBatch, Value};
pub use schema::{Entity, EntitySchema, FieldKind, FieldSpec};
