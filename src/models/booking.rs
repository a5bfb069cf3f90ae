use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{de_datetime, de_i64, de_id, Tier};

/// Статус брони на сервере. Неизвестное значение читается как PAID -
/// бэкенд исторически не проставлял статус у оплаченных броней.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Paid,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn parse(raw: &str) -> BookingStatus {
        match raw.trim().to_uppercase().as_str() {
            "PENDING" => BookingStatus::Pending,
            "CANCELLED" => BookingStatus::Cancelled,
            "COMPLETED" => BookingStatus::Completed,
            _ => BookingStatus::Paid,
        }
    }

    // Подпись статуса в интерфейсе
    pub fn ui_label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Paid => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

/// Денормализованная проекция брони из GET /bookings/my.
/// Клиент никогда не держит больше, чем эта проекция.
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: String,
    pub status: BookingStatus,
    pub amount: i64,
    pub created_at: Option<NaiveDateTime>,
    pub event_title: String,
    pub event_city_id: String,
    pub event_start_at: Option<NaiveDateTime>,
    pub event_end_at: Option<NaiveDateTime>,
    pub stall_name: String,
    pub stall_tier: Tier,
    pub stall_price: i64,
    pub reviewed: bool,
    pub rating: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBookingEvent {
    #[serde(default)]
    title: String,
    #[serde(default)]
    city_id: String,
    #[serde(default, deserialize_with = "de_datetime")]
    start_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de_datetime")]
    end_at: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Deserialize)]
struct RawBookingStall {
    #[serde(default, alias = "stallName")]
    name: String,
    #[serde(default)]
    tier: Option<String>,
    #[serde(default, deserialize_with = "de_i64")]
    price: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBooking {
    #[serde(default, alias = "_id", deserialize_with = "de_id")]
    id: String,
    #[serde(default)]
    status: Option<String>,
    // Сумма может отсутствовать у старых записей - тогда цена стенда
    #[serde(default)]
    amount: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "de_datetime")]
    created_at: Option<NaiveDateTime>,
    #[serde(default)]
    event: RawBookingEvent,
    #[serde(default)]
    stall: RawBookingStall,
    #[serde(default)]
    reviewed: bool,
    #[serde(default, deserialize_with = "de_i64")]
    rating: i64,
}

impl From<RawBooking> for Booking {
    fn from(raw: RawBooking) -> Self {
        // Отсутствующая сумма откатывается на цену стенда, явный ноль остаётся нулём
        let stall_price = raw.stall.price;
        let amount = raw
            .amount
            .as_ref()
            .map(super::coerce_i64)
            .unwrap_or(stall_price);

        Booking {
            id: raw.id,
            status: BookingStatus::parse(raw.status.as_deref().unwrap_or("")),
            amount,
            created_at: raw.created_at,
            event_title: raw.event.title,
            event_city_id: raw.event.city_id,
            event_start_at: raw.event.start_at,
            event_end_at: raw.event.end_at,
            stall_name: raw.stall.name,
            stall_tier: Tier::parse(raw.stall.tier.as_deref().unwrap_or("SILVER")),
            stall_price,
            reviewed: raw.reviewed,
            rating: raw.rating,
        }
    }
}

impl<'de> Deserialize<'de> for Booking {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawBooking::deserialize(deserializer).map(Booking::from)
    }
}

/// Ответ GET /bookings/invoice/{id}: ссылка на готовый счёт.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub booking_id: String,
    pub invoice_url: String,
    #[serde(default, deserialize_with = "de_i64")]
    pub amount: i64,
    #[serde(default)]
    pub event_title: String,
    #[serde(default)]
    pub stall_name: String,
    #[serde(default)]
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_full_booking() {
        let booking: Booking = serde_json::from_value(json!({
            "id": "B1",
            "status": "PENDING",
            "amount": 8000,
            "createdAt": "2025-11-01T09:00:00",
            "event": {
                "title": "Winter Craft Fair",
                "cityId": "Delhi",
                "startAt": "2025-12-01T10:00:00",
                "endAt": "2025-12-03T18:00:00"
            },
            "stall": {"name": "A-1", "tier": "GOLD", "price": 8000},
            "reviewed": false,
            "rating": 0
        }))
        .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.amount, 8000);
        assert_eq!(booking.stall_tier, Tier::Gold);
        assert_eq!(booking.stall_tier.label(), "VIP");
    }

    #[test]
    fn missing_status_reads_as_paid() {
        let booking: Booking = serde_json::from_value(json!({"id": "B2"})).unwrap();
        assert_eq!(booking.status, BookingStatus::Paid);
        assert_eq!(booking.status.ui_label(), "confirmed");
    }

    #[test]
    fn amount_falls_back_to_stall_price() {
        let booking: Booking = serde_json::from_value(json!({
            "id": "B3",
            "stall": {"name": "A-2", "tier": "BRONZE", "price": 500}
        }))
        .unwrap();
        assert_eq!(booking.amount, 500);
    }
}
