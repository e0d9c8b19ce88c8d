//! Entity dispatch.

use serde::{Deserialize, Serialize};

use super::field::{
    EntitySchema, ORDERS_SCHEMA, ORDER_ITEMS_SCHEMA, PRODUCTS_SCHEMA, SELLERS_SCHEMA,
};
use super::FieldKind;

/// The four entity types the pipeline understands. Payload keys outside this
/// set resolve to no entity and are skipped with a warning, never a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Orders,
    Products,
    OrderItems,
    Sellers,
}

impl Entity {
    /// Resolve a payload key. `order_items` accepts the `items` alias used
    /// by some upstream callers.
    pub fn from_name(name: &str) -> Option<Entity> {
        match name.trim().to_lowercase().as_str() {
            "orders" => Some(Entity::Orders),
            "products" => Some(Entity::Products),
            "order_items" | "items" => Some(Entity::OrderItems),
            "sellers" => Some(Entity::Sellers),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Entity::Orders => "orders",
            Entity::Products => "products",
            Entity::OrderItems => "order_items",
            Entity::Sellers => "sellers",
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        match self {
            Entity::Orders => &ORDERS_SCHEMA,
            Entity::Products => &PRODUCTS_SCHEMA,
            Entity::OrderItems => &ORDER_ITEMS_SCHEMA,
            Entity::Sellers => &SELLERS_SCHEMA,
        }
    }

    /// Whether the temporal validator has anything to do for this entity.
    pub fn has_temporal_columns(&self) -> bool {
        self.schema().has_kind(FieldKind::Timestamp)
    }

    /// Numeric columns the orchestrator caps outliers on, always in capping
    /// mode.
    pub fn outlier_columns(&self) -> &'static [&'static str] {
        match self {
            Entity::Products => &[
                "product_weight_g",
                "product_length_cm",
                "product_height_cm",
                "product_width_cm",
            ],
            Entity::OrderItems => &["price", "freight_value"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Entity::from_name("orders"), Some(Entity::Orders));
        assert_eq!(Entity::from_name("items"), Some(Entity::OrderItems));
        assert_eq!(Entity::from_name("order_items"), Some(Entity::OrderItems));
        assert_eq!(Entity::from_name(" Sellers "), Some(Entity::Sellers));
        assert_eq!(Entity::from_name("customers"), None);
    }

    #[test]
    fn test_outlier_columns() {
        assert_eq!(Entity::OrderItems.outlier_columns(), &["price", "freight_value"]);
        assert!(Entity::Orders.outlier_columns().is_empty());
    }
}
