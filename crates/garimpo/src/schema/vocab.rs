//! Process-wide immutable vocabulary. Loaded once, never mutated at runtime.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Sentinel substituted for missing/blank categorical data.
pub const CATEGORY_SENTINEL: &str = "indefinido";

/// Translation of raw marketplace order statuses to the reporting vocabulary.
/// Statuses outside the map pass through unchanged.
pub static STATUS_TRANSLATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("delivered", "entregue"),
        ("invoiced", "faturado"),
        ("shipped", "enviado"),
        ("processing", "em processamento"),
        ("unavailable", "indisponível"),
        ("canceled", "cancelado"),
        ("created", "criado"),
        ("approved", "aprovado"),
    ])
});

/// Date/timestamp columns the temporal validator recognizes, across entities.
pub const DATE_COLUMNS: &[&str] = &[
    "order_purchase_timestamp",
    "order_approved_at",
    "order_delivered_carrier_date",
    "order_delivered_customer_date",
    "order_estimated_delivery_date",
    "shipping_limit_date",
];

/// Fold Latin-1 accented characters to their ASCII base, dropping anything
/// else outside ASCII. Covers the accents that occur in Brazilian place
/// names (the `seller_city` column).
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => Some('a'),
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => Some('A'),
            'é' | 'è' | 'ê' | 'ë' => Some('e'),
            'É' | 'È' | 'Ê' | 'Ë' => Some('E'),
            'í' | 'ì' | 'î' | 'ï' => Some('i'),
            'Í' | 'Ì' | 'Î' | 'Ï' => Some('I'),
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => Some('o'),
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => Some('O'),
            'ú' | 'ù' | 'û' | 'ü' => Some('u'),
            'Ú' | 'Ù' | 'Û' | 'Ü' => Some('U'),
            'ç' => Some('c'),
            'Ç' => Some('C'),
            'ñ' => Some('n'),
            'Ñ' => Some('N'),
            c if c.is_ascii() => Some(c),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_translations() {
        assert_eq!(STATUS_TRANSLATIONS.get("delivered"), Some(&"entregue"));
        assert_eq!(STATUS_TRANSLATIONS.get("shipped"), Some(&"enviado"));
        assert_eq!(STATUS_TRANSLATIONS.get("refunded"), None);
    }

    #[test]
    fn test_fold_accents() {
        assert_eq!(fold_accents("são paulo"), "sao paulo");
        assert_eq!(fold_accents("BRASÍLIA"), "BRASILIA");
        assert_eq!(fold_accents("maceió"), "maceio");
        assert_eq!(fold_accents("plain"), "plain");
    }
}
