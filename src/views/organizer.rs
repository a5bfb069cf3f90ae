//! organizer.rs
//!
//! Кабинет организатора: профиль, площадки, события, стенды, брони,
//! статистика, рассылка и выгрузка списка участников.

use chrono::NaiveDateTime;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::api::ApiError;
use crate::models::{de_datetime, de_f64, de_i64, de_id, Event, ListPayload};
use crate::notify::NoticeKind;
use crate::services::upload::AssetUploader;
use crate::AppState;

/* ---------- DTO ---------- */

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerProfileStats {
    #[serde(default, deserialize_with = "de_i64")]
    pub events_hosted: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub stalls_managed: i64,
    #[serde(default, deserialize_with = "de_f64")]
    pub rating: f64,
    #[serde(default, deserialize_with = "de_i64")]
    pub profile_complete: i64,
}

/// GET /organizer/me
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub gst: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub policies: String,
    #[serde(default)]
    pub gst_doc: String,
    #[serde(default)]
    pub id_doc: String,
    #[serde(default)]
    pub stats: OrganizerProfileStats,
}

/// PATCH /organizer/me
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerProfileUpdate {
    pub brand_name: String,
    pub gst: String,
    pub contact_person: String,
    pub phone: String,
    pub about: String,
    pub policies: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Venue {
    #[serde(default, alias = "_id", deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tier: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueCreate {
    pub name: String,
    pub city: String,
    pub description: String,
    pub tier: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendPoint {
    #[serde(default)]
    pub month: String,
    #[serde(default, deserialize_with = "de_i64")]
    pub amount: i64,
}

/// GET /organizer/dashboard
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "de_i64")]
    pub revenue: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub stalls_sold: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub total_stalls: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub active_events: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub total_views: i64,
    #[serde(default)]
    pub revenue_trend: Vec<TrendPoint>,
    #[serde(default)]
    pub bookings_this_month: Vec<i64>,
}

/// Строка списка GET /organizer/me/events.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerEvent {
    #[serde(default, alias = "_id", deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "de_datetime")]
    pub start_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de_datetime")]
    pub end_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de_i64")]
    pub views: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub revenue: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub stalls_sold: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub total_stalls: i64,
}

/// Строка списка GET /organizer/me/bookings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerBooking {
    #[serde(default, alias = "_id", deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub stall_id: String,
    #[serde(default, deserialize_with = "de_i64")]
    pub amount: i64,
    #[serde(default, deserialize_with = "de_datetime")]
    pub date: Option<NaiveDateTime>,
}

/// GET /organizer/me/stats - карточки верхней панели.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerStats {
    #[serde(default, deserialize_with = "de_i64")]
    pub total_events: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub total_bookings: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub revenue: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub views: i64,
}

/// POST /events - создание события организатором.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreate {
    pub title: String,
    pub city_id: String,
    pub venue_name: String,
    pub location: String,
    pub description: String,
    pub start_at: String,
    pub end_at: String,
    pub cover_image: String,
    pub banner_image: String,
    pub tags: Vec<String>,
}

// Созданное событие приходит либо голым, либо обёрнутым в {"event": ...}
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CreatedEventPayload {
    Wrapped { event: Event },
    Bare(Event),
}

impl CreatedEventPayload {
    fn into_event(self) -> Event {
        match self {
            CreatedEventPayload::Wrapped { event } => event,
            CreatedEventPayload::Bare(event) => event,
        }
    }
}

/// POST /organizer/stalls
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StallCreate {
    pub event_id: String,
    pub name: String,
    pub tier: String,
    pub price: i64,
    pub qty_total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specs: Option<String>,
}

/// PATCH /organizer/stalls/{id} - частичное обновление.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StallUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty_total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specs: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BroadcastRequest<'a> {
    event_id: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct BookingStatusUpdate<'a> {
    status: &'a str,
}

/// Участник события из GET /organizer/events/{id}/roster.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    #[serde(default, alias = "_id", deserialize_with = "de_id")]
    pub booking_id: String,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub stall_name: String,
    #[serde(default)]
    pub tier: String,
}

/* ---------- VIEW ---------- */

/// Кабинет организатора.
pub struct OrganizerView {
    state: Arc<AppState>,
    profile: Option<OrganizerProfile>,
    venues: Vec<Venue>,
    events: Vec<OrganizerEvent>,
    bookings: Vec<OrganizerBooking>,
}

impl OrganizerView {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            profile: None,
            venues: Vec::new(),
            events: Vec::new(),
            bookings: Vec::new(),
        }
    }

    pub fn profile(&self) -> Option<&OrganizerProfile> {
        self.profile.as_ref()
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn events(&self) -> &[OrganizerEvent] {
        &self.events
    }

    pub fn bookings(&self) -> &[OrganizerBooking] {
        &self.bookings
    }

    /// GET /organizer/me
    pub async fn load_profile(&mut self) -> Result<(), ApiError> {
        match self
            .state
            .api
            .get_json::<OrganizerProfile>("/organizer/me")
            .await
        {
            Ok(profile) => {
                self.profile = Some(profile);
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// PATCH /organizer/me
    pub async fn save_profile(&mut self, update: &OrganizerProfileUpdate) -> Result<(), ApiError> {
        match self
            .state
            .api
            .patch_json::<serde_json::Value>("/organizer/me", update)
            .await
        {
            Ok(_) => {
                self.state
                    .notify(NoticeKind::Success, "Profile updated successfully");
                self.load_profile().await.ok();
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// GET /organizer/venues
    pub async fn load_venues(&mut self) -> Result<(), ApiError> {
        match self
            .state
            .api
            .get_json::<ListPayload<Venue>>("/organizer/venues")
            .await
        {
            Ok(payload) => {
                self.venues = payload.into_vec();
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// POST /organizer/venues; список перечитывается после успеха
    pub async fn add_venue(&mut self, venue: &VenueCreate) -> Result<(), ApiError> {
        match self
            .state
            .api
            .post_json::<serde_json::Value>("/organizer/venues", venue)
            .await
        {
            Ok(_) => {
                self.state.notify(NoticeKind::Success, "Venue added");
                self.load_venues().await.ok();
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// DELETE /organizer/venues/{id}
    pub async fn remove_venue(&mut self, venue_id: &str) -> Result<(), ApiError> {
        let path = format!("/organizer/venues/{}", venue_id);
        match self.state.api.delete::<serde_json::Value>(&path).await {
            Ok(_) => {
                self.venues.retain(|v| v.id != venue_id);
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// GET /organizer/dashboard
    pub async fn dashboard(&self) -> Result<DashboardStats, ApiError> {
        self.state
            .api
            .get_json::<DashboardStats>("/organizer/dashboard")
            .await
    }

    /// GET /organizer/me/events. Ответ бывает и массивом, и {"items": []}.
    pub async fn load_events(&mut self) -> Result<(), ApiError> {
        match self
            .state
            .api
            .get_json::<ListPayload<OrganizerEvent>>("/organizer/me/events")
            .await
        {
            Ok(payload) => {
                self.events = payload.into_vec();
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, "Failed loading events");
                Err(e)
            }
        }
    }

    /// GET /organizer/me/bookings
    pub async fn load_bookings(&mut self) -> Result<(), ApiError> {
        match self
            .state
            .api
            .get_json::<ListPayload<OrganizerBooking>>("/organizer/me/bookings")
            .await
        {
            Ok(payload) => {
                self.bookings = payload.into_vec();
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// GET /organizer/me/stats
    pub async fn stats(&self) -> Result<OrganizerStats, ApiError> {
        self.state
            .api
            .get_json::<OrganizerStats>("/organizer/me/stats")
            .await
    }

    /// Создание события: сначала best-effort загрузка баннера и обложки
    /// на хост изображений, затем POST /events. Сбой загрузки картинки
    /// не блокирует создание - поле остаётся пустым.
    pub async fn create_event(
        &mut self,
        mut event: EventCreate,
        banner: Option<(&str, Vec<u8>)>,
        cover: Option<(&str, Vec<u8>)>,
    ) -> Result<Event, ApiError> {
        if event.title.is_empty()
            || event.start_at.is_empty()
            || event.end_at.is_empty()
            || event.city_id.is_empty()
        {
            let message = "Required fields missing";
            self.state.notify(NoticeKind::Error, message);
            return Err(ApiError::Precondition(message.to_string()));
        }

        let uploader = AssetUploader::from_config(&self.state.config.upload);
        if let Some((name, bytes)) = banner {
            if let Ok(url) = uploader.upload_image(name, bytes).await {
                event.banner_image = url;
            }
        }
        if let Some((name, bytes)) = cover {
            if let Ok(url) = uploader.upload_image(name, bytes).await {
                event.cover_image = url;
            }
        }

        match self
            .state
            .api
            .post_json::<CreatedEventPayload>("/events", &event)
            .await
        {
            Ok(payload) => {
                let created = payload.into_event();
                self.state.notify(NoticeKind::Success, "Event created");
                info!("Event created: {}", created.id);
                self.load_events().await.ok();
                Ok(created)
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// POST /organizer/kyc/upload (multipart gstDoc/idDoc)
    pub async fn upload_kyc_docs(
        &self,
        gst_doc: Option<(&str, Vec<u8>)>,
        id_doc: Option<(&str, Vec<u8>)>,
    ) -> Result<(), ApiError> {
        let mut form = Form::new();
        if let Some((name, bytes)) = gst_doc {
            form = form.part("gstDoc", Part::bytes(bytes).file_name(name.to_string()));
        }
        if let Some((name, bytes)) = id_doc {
            form = form.part("idDoc", Part::bytes(bytes).file_name(name.to_string()));
        }

        match self
            .state
            .api
            .post_multipart::<serde_json::Value>("/organizer/kyc/upload", form)
            .await
        {
            Ok(_) => {
                self.state
                    .notify(NoticeKind::Success, "KYC Documents Updated");
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// POST /organizer/stalls
    pub async fn create_stall(&self, stall: &StallCreate) -> Result<(), ApiError> {
        match self
            .state
            .api
            .post_json::<serde_json::Value>("/organizer/stalls", stall)
            .await
        {
            Ok(_) => {
                self.state.notify(NoticeKind::Success, "Stall created");
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// PATCH /organizer/stalls/{id}
    pub async fn update_stall(&self, stall_id: &str, update: &StallUpdate) -> Result<(), ApiError> {
        let path = format!("/organizer/stalls/{}", stall_id);
        match self
            .state
            .api
            .patch_json::<serde_json::Value>(&path, update)
            .await
        {
            Ok(_) => {
                self.state.notify(NoticeKind::Success, "Stall updated");
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// DELETE /organizer/stalls/{id}
    pub async fn delete_stall(&self, stall_id: &str) -> Result<(), ApiError> {
        let path = format!("/organizer/stalls/{}", stall_id);
        match self.state.api.delete::<serde_json::Value>(&path).await {
            Ok(_) => {
                self.state.notify(NoticeKind::Success, "Stall removed");
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// PATCH /organizer/bookings/{id} - смена статуса брони организатором
    pub async fn update_booking_status(
        &mut self,
        booking_id: &str,
        status: &str,
    ) -> Result<(), ApiError> {
        let path = format!("/organizer/bookings/{}", booking_id);
        let request = BookingStatusUpdate { status };
        match self
            .state
            .api
            .patch_json::<serde_json::Value>(&path, &request)
            .await
        {
            Ok(_) => {
                self.state.notify(NoticeKind::Success, "Booking updated");
                self.load_bookings().await.ok();
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// POST /organizer/broadcast - сообщение всем участникам события
    pub async fn send_broadcast(&self, event_id: &str, message: &str) -> Result<(), ApiError> {
        if message.trim().is_empty() {
            let text = "Message is empty";
            self.state.notify(NoticeKind::Error, text);
            return Err(ApiError::Precondition(text.to_string()));
        }

        let request = BroadcastRequest { event_id, message };
        match self
            .state
            .api
            .post_json::<serde_json::Value>("/organizer/broadcast", &request)
            .await
        {
            Ok(_) => {
                self.state.notify(NoticeKind::Success, "Message sent!");
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// GET /organizer/events/{id}/roster - участники события
    pub async fn roster(&self, event_id: &str) -> Result<Vec<RosterEntry>, ApiError> {
        let path = format!("/organizer/events/{}/roster", event_id);
        self.state
            .api
            .get_json::<ListPayload<RosterEntry>>(&path)
            .await
            .map(ListPayload::into_vec)
    }
}
