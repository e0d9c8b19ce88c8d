//! Per-entity schema descriptors.
//!
//! The normalizer consults these descriptors instead of scattering
//! column-presence checks through the transforms. Columns not listed here
//! pass through untouched in each record's overflow bag.

use serde::{Deserialize, Serialize};

/// How a recognized column is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Key-like columns (`*_id`, `*_zip_code_prefix`): coerced to string.
    Identifier,
    /// Enumerated status translated through the fixed vocabulary.
    Status,
    /// Free-text category: folded to lowercase snake case, sentinel-filled.
    Category,
    /// Numeric count: missing values default to zero.
    Count,
    /// Numeric dimension: missing values filled with the column median.
    Measure,
    /// Date/timestamp column, parsed by the temporal validator.
    Timestamp,
    /// Place name: accent-folded, upper-cased.
    Place,
}

/// One recognized column of an entity.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Missing required columns produce a validation warning, not an error.
    pub required: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }
}

/// The full descriptor for one entity.
#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    pub fields: &'static [FieldSpec],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    pub fn has_kind(&self, kind: FieldKind) -> bool {
        self.fields.iter().any(|f| f.kind == kind)
    }
}

pub const ORDERS_SCHEMA: EntitySchema = EntitySchema {
    fields: &[
        FieldSpec::required("order_id", FieldKind::Identifier),
        FieldSpec::new("customer_id", FieldKind::Identifier),
        FieldSpec::new("order_status", FieldKind::Status),
        FieldSpec::required("order_purchase_timestamp", FieldKind::Timestamp),
        FieldSpec::new("order_approved_at", FieldKind::Timestamp),
        FieldSpec::new("order_delivered_carrier_date", FieldKind::Timestamp),
        FieldSpec::new("order_delivered_customer_date", FieldKind::Timestamp),
        FieldSpec::new("order_estimated_delivery_date", FieldKind::Timestamp),
    ],
};

pub const PRODUCTS_SCHEMA: EntitySchema = EntitySchema {
    fields: &[
        FieldSpec::required("product_id", FieldKind::Identifier),
        FieldSpec::new("product_category_name", FieldKind::Category),
        // "lenght" is the upstream dataset's own spelling.
        FieldSpec::new("product_name_lenght", FieldKind::Count),
        FieldSpec::new("product_description_lenght", FieldKind::Count),
        FieldSpec::new("product_photos_qty", FieldKind::Count),
        FieldSpec::new("product_weight_g", FieldKind::Measure),
        FieldSpec::new("product_length_cm", FieldKind::Measure),
        FieldSpec::new("product_height_cm", FieldKind::Measure),
        FieldSpec::new("product_width_cm", FieldKind::Measure),
    ],
};

pub const ORDER_ITEMS_SCHEMA: EntitySchema = EntitySchema {
    fields: &[
        FieldSpec::required("order_id", FieldKind::Identifier),
        FieldSpec::new("order_item_id", FieldKind::Identifier),
        FieldSpec::required("product_id", FieldKind::Identifier),
        FieldSpec::required("seller_id", FieldKind::Identifier),
        FieldSpec::required("shipping_limit_date", FieldKind::Timestamp),
        FieldSpec::required("price", FieldKind::Measure),
        FieldSpec::required("freight_value", FieldKind::Measure),
    ],
};

pub const SELLERS_SCHEMA: EntitySchema = EntitySchema {
    fields: &[
        FieldSpec::required("seller_id", FieldKind::Identifier),
        FieldSpec::new("seller_zip_code_prefix", FieldKind::Identifier),
        FieldSpec::new("seller_city", FieldKind::Place),
        FieldSpec::new("seller_state", FieldKind::Place),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        assert_eq!(
            ORDERS_SCHEMA.field("order_status").map(|f| f.kind),
            Some(FieldKind::Status)
        );
        assert!(ORDERS_SCHEMA.field("unknown_column").is_none());
    }

    #[test]
    fn test_required_columns() {
        let required: Vec<&str> = ORDER_ITEMS_SCHEMA.required_columns().collect();
        assert_eq!(
            required,
            vec![
                "order_id",
                "product_id",
                "seller_id",
                "shipping_limit_date",
                "price",
                "freight_value"
            ]
        );
    }

    #[test]
    fn test_temporal_kinds() {
        assert!(ORDERS_SCHEMA.has_kind(FieldKind::Timestamp));
        assert!(ORDER_ITEMS_SCHEMA.has_kind(FieldKind::Timestamp));
        assert!(!SELLERS_SCHEMA.has_kind(FieldKind::Timestamp));
        assert!(!PRODUCTS_SCHEMA.has_kind(FieldKind::Timestamp));
    }
}
