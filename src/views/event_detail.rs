//! event_detail.rs
//!
//! Деталка события: карточки уровней и запись черновика брони.
//!
//! Пользователь выбирает УРОВЕНЬ, а не конкретный стенд: карточка уровня
//! агрегирует остатки и среднюю цену по своим стендам, в черновик
//! попадает id представителя (первого стенда уровня), а конкретную
//! единицу инвентаря назначает сервер при создании брони.

use std::sync::Arc;
use tracing::warn;

use crate::models::{BookingDraft, Event, Stall, StallsPayload, Tier};
use crate::notify::NoticeKind;
use crate::AppState;

/// Покупаемая карточка уровня.
#[derive(Debug, Clone)]
pub struct TierCard {
    pub tier: Tier,
    pub name: &'static str,
    /// Средняя цена стендов уровня (или цена уровня по умолчанию)
    pub price: i64,
    pub size: &'static str,
    pub features: &'static [&'static str],
    pub available: i64,
    pub total: i64,
    pub popular: bool,
    pub sample_stall_id: Option<String>,
}

impl TierCard {
    pub fn sold_out(&self) -> bool {
        self.total > 0 && self.available <= 0
    }
}

fn tier_size(tier: Tier) -> &'static str {
    match tier {
        Tier::Bronze => "10x10 ft",
        Tier::Silver => "12x12 ft",
        Tier::Gold => "15x15 ft",
    }
}

fn tier_features(tier: Tier) -> &'static [&'static str] {
    match tier {
        Tier::Bronze => &["Basic Setup", "Electricity", "Table & Chairs"],
        Tier::Silver => &["Premium Setup", "Electricity", "Furniture", "Branding Space"],
        Tier::Gold => &[
            "VIP Setup",
            "Premium Electricity",
            "Full Furniture",
            "Prime Location",
            "Dedicated Support",
        ],
    }
}

// Настоящие id бэкенда - 24-символьные шестнадцатеричные ObjectId
fn is_real_id(id: &str) -> bool {
    id.len() >= 24 && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Деталка события.
pub struct EventDetailView {
    state: Arc<AppState>,
    event_id: String,
    event: Option<Event>,
    stalls: Vec<Stall>,
}

impl EventDetailView {
    /// Разрешает id события по списку (невалидный или незнакомый id
    /// откатывается на первое событие), затем тянет деталку и стенды.
    /// Пустой список или сбой списка - выход через callback возврата.
    pub async fn mount(
        state: Arc<AppState>,
        requested_id: Option<&str>,
        on_back: impl FnOnce(),
    ) -> Option<Self> {
        let events = match state.api.get_json_public::<Vec<Event>>("/events").await {
            Ok(events) => events,
            Err(e) => {
                warn!("Event list failed: {}", e);
                state.notify(NoticeKind::Error, "Failed to load event.");
                on_back();
                return None;
            }
        };

        let resolved_id = match requested_id {
            Some(id) if is_real_id(id) && events.iter().any(|e| e.id == id) => id.to_string(),
            _ => match events.first() {
                Some(first) => first.id.clone(),
                None => {
                    state.notify(NoticeKind::Error, "No events found. Please seed the database.");
                    on_back();
                    return None;
                }
            },
        };

        let mut event = events.into_iter().find(|e| e.id == resolved_id);

        // Полная деталка; сбой оставляет запись из списка
        if let Ok(detail) = state
            .api
            .get_json_public::<Event>(&format!("/events/{}", resolved_id))
            .await
        {
            if detail.id == resolved_id {
                event = Some(detail);
            }
        }

        let stalls = match state
            .api
            .get_json_public::<StallsPayload>(&format!("/events/{}/stalls", resolved_id))
            .await
        {
            Ok(payload) => payload.into_stalls(),
            Err(e) => {
                warn!("Stall list failed for event {}: {}", resolved_id, e);
                Vec::new()
            }
        };

        Some(Self {
            state,
            event_id: resolved_id,
            event,
            stalls,
        })
    }

    pub fn event(&self) -> Option<&Event> {
        self.event.as_ref()
    }

    pub fn stalls(&self) -> &[Stall] {
        &self.stalls
    }

    /// Карточки уровней в фиксированном порядке BRONZE/SILVER/GOLD.
    pub fn tier_cards(&self) -> Vec<TierCard> {
        Tier::ALL
            .iter()
            .map(|&tier| {
                let group: Vec<&Stall> =
                    self.stalls.iter().filter(|s| s.tier == tier).collect();

                let total = group.iter().map(|s| s.qty_total).sum();
                let available = group.iter().map(|s| s.qty_left).sum();
                let price = if group.is_empty() {
                    tier.default_price()
                } else {
                    let sum: i64 = group.iter().map(|s| s.price).sum();
                    (sum as f64 / group.len() as f64).round() as i64
                };

                TierCard {
                    tier,
                    name: tier.label(),
                    price,
                    size: tier_size(tier),
                    features: tier_features(tier),
                    available,
                    total,
                    popular: tier == Tier::Silver,
                    sample_stall_id: group.first().map(|s| s.id.clone()),
                }
            })
            .collect()
    }

    /// Выбор уровня: пишет ровно один черновик (прежний перезаписывается)
    /// и возвращает true как сигнал перехода в мастер бронирования.
    pub fn select_tier(&self, card: &TierCard) -> bool {
        let Some(stall_id) = card.sample_stall_id.as_ref().filter(|_| !card.sold_out()) else {
            self.state
                .notify(NoticeKind::Info, "No stalls left in this tier.");
            return false;
        };

        self.state.store.save_draft(&BookingDraft {
            event_id: self.event_id.clone(),
            stall_id: stall_id.clone(),
            tier: card.name.to_string(),
            price: card.price,
        });
        true
    }
}
