//! Temporal validation: UTC parsing of recognized date columns, chronology
//! and future-date flags, and derived delivery metrics.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{RecordBatch, Value};
use crate::schema::vocab::DATE_COLUMNS;

const PURCHASE: &str = "order_purchase_timestamp";
const DELIVERED: &str = "order_delivered_customer_date";
const ESTIMATED: &str = "order_estimated_delivery_date";

/// Quick shape check before trying the parse formats one by one.
static DATE_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap(),
        Regex::new(r"^\d{4}/\d{2}/\d{2}").unwrap(),
        Regex::new(r"^\d{2}/\d{2}/\d{4}").unwrap(),
    ]
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Delivery outcome relative to the estimated date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    OnTime,
    Late,
    NotDelivered,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::OnTime => "on time",
            DeliveryStatus::Late => "late",
            DeliveryStatus::NotDelivered => "not delivered",
        }
    }
}

/// Applies the temporal rules to a batch. The reference clock defaults to
/// wall-clock now and is injectable for tests.
#[derive(Debug, Clone)]
pub struct TemporalValidator {
    reference: DateTime<Utc>,
}

impl TemporalValidator {
    pub fn new() -> Self {
        Self {
            reference: Utc::now(),
        }
    }

    /// Validator with a fixed reference clock.
    pub fn at(reference: DateTime<Utc>) -> Self {
        Self { reference }
    }

    /// Parse recognized date columns and attach the derived columns. All
    /// derivations are additive; missing source columns skip the
    /// corresponding derivation silently.
    pub fn apply(&self, batch: &mut RecordBatch) {
        let columns = batch.columns();

        for &column in DATE_COLUMNS {
            if !columns.contains(column) {
                continue;
            }
            for record in &mut batch.records {
                let parsed = record.get(column).and_then(parse_utc);
                record.set(
                    column,
                    match parsed {
                        Some(ts) => Value::Timestamp(ts),
                        None => Value::Null,
                    },
                );
            }
        }

        let has_purchase = columns.contains(PURCHASE);
        let has_delivered = columns.contains(DELIVERED);
        let has_estimated = columns.contains(ESTIMATED);

        for record in &mut batch.records {
            let purchase = record.get(PURCHASE).and_then(Value::timestamp);
            let delivered = record.get(DELIVERED).and_then(Value::timestamp);
            let estimated = record.get(ESTIMATED).and_then(Value::timestamp);

            if has_delivered && has_purchase {
                let error = matches!((delivered, purchase), (Some(d), Some(p)) if d < p);
                record.set("dq_erro_cronologia", Value::Bool(error));
            }

            if has_purchase {
                let future = matches!(purchase, Some(p) if p > self.reference);
                record.set("dq_erro_futuro", Value::Bool(future));
            }

            if has_delivered && has_purchase {
                record.set("tempo_entrega_dias", whole_days(delivered, purchase));
            }

            if has_estimated && has_purchase {
                record.set("tempo_entrega_estimado_dias", whole_days(estimated, purchase));
            }

            if has_delivered && has_estimated {
                let status = delivery_status(delivered, estimated);
                record.set("entrega_no_prazo", Value::Str(status.as_str().to_string()));
            }
        }
    }
}

impl Default for TemporalValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn whole_days(end: Option<DateTime<Utc>>, start: Option<DateTime<Utc>>) -> Value {
    match (end, start) {
        (Some(end), Some(start)) => Value::Int((end - start).num_days()),
        _ => Value::Null,
    }
}

/// Tri-state delivery outcome. A delivered order with no estimated date to
/// compare against counts as late (the strict reading; see DESIGN.md).
fn delivery_status(
    delivered: Option<DateTime<Utc>>,
    estimated: Option<DateTime<Utc>>,
) -> DeliveryStatus {
    let delivered = match delivered {
        Some(d) => d,
        None => return DeliveryStatus::NotDelivered,
    };
    match estimated {
        Some(e) if delivered <= e => DeliveryStatus::OnTime,
        _ => DeliveryStatus::Late,
    }
}

/// Lenient parse of one cell to a UTC timestamp. Unparseable values yield
/// `None`, which callers store as null.
pub fn parse_utc(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Timestamp(ts) => Some(*ts),
        Value::Str(s) => parse_str_utc(s.trim()),
        _ => None,
    }
}

fn parse_str_utc(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() || !DATE_SHAPES.iter().any(|p| p.is_match(text)) {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use chrono::TimeZone;

    fn order(pairs: &[(&str, &str)]) -> Record {
        let mut record = Record::new();
        for (column, value) in pairs {
            record
                .fields
                .insert(column.to_string(), Value::Str(value.to_string()));
        }
        record
    }

    fn utc(text: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(text).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(
            parse_str_utc("2024-01-01T12:30:00Z"),
            Some(utc("2024-01-01T12:30:00Z"))
        );
        assert_eq!(
            parse_str_utc("2024-01-01 12:30:00"),
            Some(utc("2024-01-01T12:30:00Z"))
        );
        assert_eq!(parse_str_utc("2024-01-01"), Some(utc("2024-01-01T00:00:00Z")));
        assert_eq!(parse_str_utc("not a date"), None);
        assert_eq!(parse_str_utc(""), None);
    }

    #[test]
    fn test_chronology_flag() {
        let mut batch = RecordBatch::new(vec![
            order(&[
                ("order_purchase_timestamp", "2024-01-10 00:00:00"),
                ("order_delivered_customer_date", "2024-01-05 00:00:00"),
            ]),
            order(&[
                ("order_purchase_timestamp", "2024-01-10 00:00:00"),
                ("order_delivered_customer_date", "2024-01-15 00:00:00"),
            ]),
        ]);
        TemporalValidator::new().apply(&mut batch);

        assert_eq!(
            batch.records[0].get("dq_erro_cronologia"),
            Some(&Value::Bool(true))
        );
        assert_eq!(
            batch.records[1].get("dq_erro_cronologia"),
            Some(&Value::Bool(false))
        );
    }

    #[test]
    fn test_null_side_yields_no_chronology_flag() {
        let mut batch = RecordBatch::new(vec![order(&[
            ("order_purchase_timestamp", "2024-01-10 00:00:00"),
            ("order_delivered_customer_date", "garbage"),
        ])]);
        TemporalValidator::new().apply(&mut batch);

        assert_eq!(
            batch.records[0].get("order_delivered_customer_date"),
            Some(&Value::Null)
        );
        assert_eq!(
            batch.records[0].get("dq_erro_cronologia"),
            Some(&Value::Bool(false))
        );
    }

    #[test]
    fn test_future_flag_against_reference_clock() {
        let reference = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut batch = RecordBatch::new(vec![
            order(&[("order_purchase_timestamp", "2024-07-01 00:00:00")]),
            order(&[("order_purchase_timestamp", "2024-05-01 00:00:00")]),
        ]);
        TemporalValidator::at(reference).apply(&mut batch);

        assert_eq!(batch.records[0].get("dq_erro_futuro"), Some(&Value::Bool(true)));
        assert_eq!(batch.records[1].get("dq_erro_futuro"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_delivery_durations() {
        let mut batch = RecordBatch::new(vec![order(&[
            ("order_purchase_timestamp", "2024-01-01 00:00:00"),
            ("order_delivered_customer_date", "2024-01-11 06:00:00"),
            ("order_estimated_delivery_date", "2024-01-20 00:00:00"),
        ])]);
        TemporalValidator::new().apply(&mut batch);

        assert_eq!(
            batch.records[0].get("tempo_entrega_dias"),
            Some(&Value::Int(10))
        );
        assert_eq!(
            batch.records[0].get("tempo_entrega_estimado_dias"),
            Some(&Value::Int(19))
        );
    }

    #[test]
    fn test_on_time_tristate() {
        let mut batch = RecordBatch::new(vec![
            order(&[
                ("order_delivered_customer_date", "2024-01-10 00:00:00"),
                ("order_estimated_delivery_date", "2024-01-15 00:00:00"),
            ]),
            order(&[
                ("order_delivered_customer_date", "2024-01-20 00:00:00"),
                ("order_estimated_delivery_date", "2024-01-15 00:00:00"),
            ]),
            order(&[
                ("order_delivered_customer_date", ""),
                ("order_estimated_delivery_date", "2024-01-15 00:00:00"),
            ]),
            // Delivered but no estimate to compare against: late.
            order(&[
                ("order_delivered_customer_date", "2024-01-10 00:00:00"),
                ("order_estimated_delivery_date", ""),
            ]),
        ]);
        TemporalValidator::new().apply(&mut batch);

        let statuses: Vec<&Value> = batch.column_values("entrega_no_prazo").collect();
        assert_eq!(statuses[0], &Value::Str("on time".into()));
        assert_eq!(statuses[1], &Value::Str("late".into()));
        assert_eq!(statuses[2], &Value::Str("not delivered".into()));
        assert_eq!(statuses[3], &Value::Str("late".into()));
    }

    #[test]
    fn test_missing_source_columns_skip_derivations() {
        let mut batch = RecordBatch::new(vec![order(&[(
            "shipping_limit_date",
            "2024-01-01",
        )])]);
        TemporalValidator::new().apply(&mut batch);

        assert_eq!(
            batch.records[0].get("shipping_limit_date"),
            Some(&Value::Timestamp(utc("2024-01-01T00:00:00Z")))
        );
        assert!(batch.records[0].get("dq_erro_cronologia").is_none());
        assert!(batch.records[0].get("dq_erro_futuro").is_none());
        assert!(batch.records[0].get("entrega_no_prazo").is_none());
    }
}
