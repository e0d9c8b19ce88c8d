//! Typed record and batch representations.

mod batch;
mod value;

pub use batch::{Record, RecordBatch};
pub use value::Value;
