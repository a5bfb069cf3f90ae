//! booking.rs
//!
//! Мастер бронирования - единственный многошаговый сценарий клиента.
//!
//! Состояния: review -> payment -> success, строго линейно. Назад
//! разрешён только переход payment -> review; из success выхода нет;
//! ни один переход не перепрыгивает состояние.
//!
//! Условие входа - черновик брони в локальном хранилище. Его отсутствие
//! терминально: мастер уведомляет, зовёт callback возврата и не
//! конструируется. Черновик никогда не пересоздаётся по умолчанию.
//!
//! Отправка оплаты выполняет по порядку: проверка сессии (без токена -
//! ни одного сетевого вызова), получение платёжной ссылки, создание
//! брони. Успех сначала удаляет черновик и только потом переводит
//! мастер в success; любой сбой оставляет состояние payment и черновик
//! нетронутыми. Частичных коммитов и автоповторов нет.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::ApiError;
use crate::models::{BookingDraft, Event, Stall, StallsPayload};
use crate::notify::NoticeKind;
use crate::services::payment::PaymentService;
use crate::AppState;

/// Шаг мастера бронирования.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Review,
    Payment,
    Success,
}

/// Сводка суммы. Все три строки показываются даже при нулевых комиссиях.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub base: i64,
    pub platform: i64,
    pub gst: i64,
}

impl Totals {
    pub fn total(&self) -> i64 {
        self.base + self.platform + self.gst
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingRequest {
    event_id: String,
    stall_id: String,
    amount: i64,
    payment_ref: String,
}

/// Мастер бронирования.
pub struct BookingWizard {
    state: Arc<AppState>,
    step: WizardStep,
    draft: BookingDraft,
    event: Option<Event>,
    stall: Option<Stall>,
}

impl BookingWizard {
    /// Вход в мастер. Без черновика мастер не существует: уведомление,
    /// callback возврата, `None`.
    pub async fn mount(state: Arc<AppState>, on_back: impl FnOnce()) -> Option<Self> {
        let Some(draft) = state.store.load_draft() else {
            state.notify(NoticeKind::Error, "No stall selected.");
            on_back();
            return None;
        };

        let mut wizard = Self {
            state,
            step: WizardStep::Review,
            draft,
            event: None,
            stall: None,
        };
        wizard.load_lookups().await;
        Some(wizard)
    }

    // Последовательные зависимые чтения: событие, затем его стенды.
    // Оба lookup-а мягкие - сбой оставляет проекцию пустой, сервер
    // остаётся единственным арбитром при отправке.
    async fn load_lookups(&mut self) {
        let events: Vec<Event> = self
            .state
            .api
            .get_json_public("/events")
            .await
            .unwrap_or_default();
        self.event = events.into_iter().find(|e| e.id == self.draft.event_id);

        let path = format!("/events/{}/stalls", self.draft.event_id);
        let stalls = match self.state.api.get_json_public::<StallsPayload>(&path).await {
            Ok(payload) => payload.into_stalls(),
            Err(e) => {
                warn!("Stall lookup failed: {}", e);
                Vec::new()
            }
        };
        self.stall = stalls.into_iter().find(|s| s.id == self.draft.stall_id);
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn event(&self) -> Option<&Event> {
        self.event.as_ref()
    }

    pub fn stall(&self) -> Option<&Stall> {
        self.stall.as_ref()
    }

    pub fn totals(&self) -> Totals {
        Totals {
            base: self.draft.price,
            platform: self.state.config.fees.platform_fee,
            gst: self.state.config.fees.gst,
        }
    }

    /// Известно ли, что выбранный стенд распродан. Нерезолвленный стенд
    /// не блокирует: локальная проверка - best effort, гонку с другими
    /// покупателями разрешает только сервер.
    pub fn known_sold_out(&self) -> bool {
        self.stall.as_ref().is_some_and(|s| s.qty_left <= 0)
    }

    pub fn can_proceed(&self) -> bool {
        !self.known_sold_out()
    }

    /// review -> payment
    pub fn proceed_to_payment(&mut self) -> bool {
        if self.step == WizardStep::Review && self.can_proceed() {
            self.step = WizardStep::Payment;
            true
        } else {
            false
        }
    }

    /// payment -> review (единственный разрешённый переход назад)
    pub fn back_to_review(&mut self) -> bool {
        if self.step == WizardStep::Payment {
            self.step = WizardStep::Review;
            true
        } else {
            false
        }
    }

    /// payment -> success
    pub async fn submit_payment(&mut self) -> Result<(), ApiError> {
        if self.step != WizardStep::Payment {
            return Err(ApiError::Precondition(
                "Booking is not at the payment step".to_string(),
            ));
        }

        // 1. Сессия обязательна. Без токена - ноль сетевых вызовов.
        if self.state.store.token().is_none() {
            let message = "Please sign in to complete your booking.";
            self.state.notify(NoticeKind::Error, message);
            return Err(ApiError::Precondition(message.to_string()));
        }

        self.state.notify(NoticeKind::Info, "Processing payment…");
        let total = self.totals().total();

        // 2. Платёжная ссылка строго до создания брони
        let payment_ref = match PaymentService::new(self.state.api.clone())
            .acquire_payment_ref()
            .await
        {
            Ok(payment_ref) => payment_ref,
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                return Err(e);
            }
        };

        // 3. Создание брони
        let request = CreateBookingRequest {
            event_id: self.draft.event_id.clone(),
            stall_id: self.draft.stall_id.clone(),
            amount: total,
            payment_ref,
        };

        match self
            .state
            .api
            .post_json::<serde_json::Value>("/bookings", &request)
            .await
        {
            Ok(_) => {
                // 4. Черновик удаляется до перехода в success; success
                // без удалённого черновика не бывает
                self.state.store.clear_draft();
                self.step = WizardStep::Success;
                self.state.notify(NoticeKind::Success, "Payment successful!");
                info!(
                    "Booking created: event={} stall={} amount={}",
                    self.draft.event_id, self.draft.stall_id, total
                );
                Ok(())
            }
            Err(e) => {
                // 5. Остаёмся в payment, черновик не трогаем
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }
}
