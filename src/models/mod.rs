//! models
//!
//! Типизированные проекции сущностей бэкенда и единственное место,
//! где разбираются разнобойные имена полей в его ответах.
//!
//! Бэкенд отдаёт одну и ту же величину под разными ключами в разных
//! ревизиях (`id`/`_id`, `qtyLeft`/`qty_remaining`, `tier`/`tierName`),
//! числа то числом, то строкой, даты то isoformat, то голой датой.
//! Каждая сущность имеет один промежуточный Raw-тип с полным набором
//! алиасов и один явный перевод в чистую структуру. Вьюхи работают
//! только с чистыми структурами и не содержат fallback-цепочек.

pub mod booking;
pub mod event;
pub mod stall;
pub mod user;

pub use booking::{Booking, BookingStatus, Invoice};
pub use event::Event;
pub use stall::{BookingDraft, Stall, StallsPayload, Tier};
pub use user::{AuthUser, Role};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Ответы-списки приходят либо голым массивом, либо обёрткой `{"items": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Items { items: Vec<T> },
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Bare(list) => list,
            ListPayload::Items { items } => items,
        }
    }
}

// --- Лояльные десериализаторы для сырых полей бэкенда ---

// Идентификатор: строка или число -> строка
pub(crate) fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

// Денежные суммы и количества: число, дробное число или числовая строка -> i64
pub(crate) fn de_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_i64(&value))
}

pub(crate) fn coerce_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(|f| f as i64)
            .unwrap_or(0),
        _ => 0,
    }
}

pub(crate) fn de_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

// Даты: бэкенд хранит то, что ему прислали. Встречаются naive isoformat
// ("2025-01-20T10:00:00"), голая дата из формы ("2025-01-20") и RFC3339.
pub(crate) fn de_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_datetime))
}

pub(crate) fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_backend_date_variants() {
        assert!(parse_datetime("2025-01-20T10:00:00").is_some());
        assert!(parse_datetime("2025-01-20T10:00:00.123456").is_some());
        assert!(parse_datetime("2025-01-20").is_some());
        assert!(parse_datetime("2025-01-20T10:00:00+05:30").is_some());
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("next friday").is_none());
    }

    #[test]
    fn date_only_is_midnight() {
        let dt = parse_datetime("2025-01-20").unwrap();
        assert_eq!(dt.format("%H:%M:%S").to_string(), "00:00:00");
    }

    #[test]
    fn coerces_numbers_and_numeric_strings() {
        assert_eq!(coerce_i64(&json!(8000)), 8000);
        assert_eq!(coerce_i64(&json!(8000.0)), 8000);
        assert_eq!(coerce_i64(&json!("1200")), 1200);
        assert_eq!(coerce_i64(&json!(null)), 0);
        assert_eq!(coerce_i64(&json!("sold out")), 0);
    }

    #[test]
    fn list_payload_accepts_both_shapes() {
        let bare: ListPayload<i64> = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2]);

        let wrapped: ListPayload<i64> = serde_json::from_value(json!({"items": [3]})).unwrap();
        assert_eq!(wrapped.into_vec(), vec![3]);
    }
}
