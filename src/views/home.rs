use std::sync::Arc;
use tracing::warn;

use crate::api::ApiError;
use crate::models::{Event, StallsPayload};
use crate::notify::NoticeKind;
use crate::AppState;

/// Карточка события на главной: событие плюс агрегаты по его стендам.
#[derive(Debug, Clone)]
pub struct EventCard {
    pub event: Event,
    /// Минимальная цена среди стендов события
    pub price_from: i64,
    /// Суммарный остаток стендов по всем уровням
    pub stalls_available: i64,
}

/// Главная: список событий с фильтрами по городу и тегам.
pub struct HomeView {
    state: Arc<AppState>,
    cards: Vec<EventCard>,
}

impl HomeView {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            cards: Vec::new(),
        }
    }

    /// GET /events?city=&tags=, затем последовательно стенды каждого
    /// события. Сбой списка коротит загрузку и оставляет прежние
    /// карточки; сбой стендов одного события даёт нулевые агрегаты.
    pub async fn load(&mut self, city: Option<&str>, tags: Option<&str>) -> Result<(), ApiError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(city) = city.filter(|c| !c.is_empty()) {
            query.push(("city", city));
        }
        if let Some(tags) = tags.filter(|t| !t.is_empty()) {
            query.push(("tags", tags));
        }

        let events = match self
            .state
            .api
            .get_json_query::<Vec<Event>>("/events", &query)
            .await
        {
            Ok(events) => events,
            Err(e) => {
                self.state.notify(NoticeKind::Error, "Failed to load events.");
                return Err(e);
            }
        };

        let mut cards = Vec::with_capacity(events.len());
        for event in events {
            let (price_from, stalls_available) = self.stall_aggregates(&event.id).await;
            cards.push(EventCard {
                event,
                price_from,
                stalls_available,
            });
        }

        self.cards = cards;
        Ok(())
    }

    // Best-effort агрегаты: сбой чтения стендов -> нули, карточка остаётся
    async fn stall_aggregates(&self, event_id: &str) -> (i64, i64) {
        let path = format!("/events/{}/stalls", event_id);
        let stalls = match self.state.api.get_json_public::<StallsPayload>(&path).await {
            Ok(payload) => payload.into_stalls(),
            Err(e) => {
                warn!("Stall aggregates failed for event {}: {}", event_id, e);
                return (0, 0);
            }
        };

        let price_from = stalls.iter().map(|s| s.price).min().unwrap_or(0);
        let stalls_available = stalls.iter().map(|s| s.qty_left).sum();
        (price_from, stalls_available)
    }

    pub fn cards(&self) -> &[EventCard] {
        &self.cards
    }
}
