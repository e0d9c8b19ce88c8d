//! Wire payload: an ordered mapping from entity name to raw records.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::Result;

/// One raw record as it arrives on the wire: string keys, JSON scalar values.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// The full request payload. Kept as an open map rather than a fixed struct
/// so unknown entity names can be skipped with a warning instead of being
/// rejected at the boundary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    pub entities: IndexMap<String, Vec<RawRecord>>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a payload from a JSON document.
    pub fn from_json(json: &str) -> Result<Payload> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add one entity's records, replacing any previous entry of that name.
    pub fn insert(&mut self, entity: impl Into<String>, records: Vec<RawRecord>) {
        self.entities.insert(entity.into(), records);
    }

    /// Combined row count across all entities, for the resource guard.
    pub fn total_rows(&self) -> usize {
        self.entities.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_preserves_entity_order() {
        let payload = Payload::from_json(
            r#"{"orders": [{"order_id": "o1"}], "sellers": [], "products": [{"product_id": "p1"}]}"#,
        )
        .unwrap();

        let names: Vec<&String> = payload.entities.keys().collect();
        assert_eq!(names, vec!["orders", "sellers", "products"]);
        assert_eq!(payload.total_rows(), 2);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Payload::from_json("[1, 2, 3]").is_err());
        assert!(Payload::from_json("{").is_err());
    }
}
