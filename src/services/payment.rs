use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::api::{ApiClient, ApiError};

/// Ответ мок-эндпоинта оплаты.
#[derive(Debug, Deserialize)]
pub struct MockPaymentResponse {
    #[serde(rename = "paymentRef")]
    pub payment_ref: String,
}

/// Сервис получения платёжной ссылки. Платёжная ссылка - непрозрачная
/// строка, подтверждающая попытку оплаты; она обязана существовать до
/// создания брони. Канонический путь - серверный POST /payments/mock.
#[derive(Debug, Clone)]
pub struct PaymentService {
    api: ApiClient,
}

impl PaymentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn acquire_payment_ref(&self) -> Result<String, ApiError> {
        let response: MockPaymentResponse =
            self.api.post_json("/payments/mock", &json!({})).await?;
        info!("Acquired payment ref {}", response.payment_ref);
        Ok(response.payment_ref)
    }
}
