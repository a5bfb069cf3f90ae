use chrono::NaiveDateTime;
use serde::Serialize;
use std::sync::Arc;

use crate::api::ApiError;
use crate::models::{Booking, Invoice};
use crate::notify::NoticeKind;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRequest<'a> {
    rating: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    review_text: Option<&'a str>,
}

/// Мои брони: список, разбивка на предстоящие/прошедшие, отзыв, счёт.
pub struct MyBookingsView {
    state: Arc<AppState>,
    bookings: Vec<Booking>,
}

impl MyBookingsView {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            bookings: Vec::new(),
        }
    }

    /// GET /bookings/my
    pub async fn load(&mut self) -> Result<(), ApiError> {
        match self.state.api.get_json::<Vec<Booking>>("/bookings/my").await {
            Ok(bookings) => {
                self.bookings = bookings;
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Разбивка: бронь предстоящая, пока событие не закончилось и бронь
    /// не закрыта; дата конца откатывается на дату начала, отсутствие
    /// обеих дат читается как "ещё идёт".
    pub fn split(&self, now: NaiveDateTime) -> (Vec<&Booking>, Vec<&Booking>) {
        let mut upcoming = Vec::new();
        let mut past = Vec::new();

        for booking in &self.bookings {
            let end = booking
                .event_end_at
                .or(booking.event_start_at)
                .unwrap_or(now);

            if end >= now && !booking.status.is_closed() {
                upcoming.push(booking);
            } else {
                past.push(booking);
            }
        }

        (upcoming, past)
    }

    /// POST /bookings/{id}/review. Локальная проекция обновляется после
    /// успешного ответа, отката нет.
    pub async fn submit_review(
        &mut self,
        booking_id: &str,
        rating: i64,
        review_text: Option<&str>,
    ) -> Result<(), ApiError> {
        let request = ReviewRequest {
            rating,
            review_text,
        };
        let path = format!("/bookings/{}/review", booking_id);

        match self
            .state
            .api
            .post_json::<serde_json::Value>(&path, &request)
            .await
        {
            Ok(_) => {
                for booking in &mut self.bookings {
                    if booking.id == booking_id {
                        booking.reviewed = true;
                        booking.rating = rating;
                    }
                }
                self.state
                    .notify(NoticeKind::Success, "Thanks for your review!");
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// GET /bookings/invoice/{id} - ссылка на скачиваемый счёт
    pub async fn invoice(&self, booking_id: &str) -> Result<Invoice, ApiError> {
        let path = format!("/bookings/invoice/{}", booking_id);
        match self.state.api.get_json::<Invoice>(&path).await {
            Ok(invoice) => Ok(invoice),
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }
}
