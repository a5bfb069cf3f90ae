//! api.rs
//!
//! Этот модуль реализует обёртку над HTTP-шлюзом Sharthi API.
//!
//! Ключевые компоненты:
//! 1.  **ApiError**: единый тип ошибки для всех сетевых вызовов. Любой
//!     сбой - транспортный, HTTP-статус вне 2xx, нечитаемое тело -
//!     сводится к короткому сообщению, которое вьюхи показывают как
//!     уведомление и не роняют интерфейс.
//! 2.  **ApiClient**: клиент, который прикрепляет bearer-токен из
//!     сессии к исходящим запросам, ставит Content-Type: application/json
//!     (кроме multipart, где границу выставляет транспорт) и разбирает
//!     тело ошибки по полям message/error/detail с откатом на статус.

use reqwest::multipart::Form;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::error;

use crate::config::ApiConfig;
use crate::store::StoreService;

/// Ошибки клиентской стороны. Вьюхи не перезапускают запросы и не
/// падают - сообщение уходит в порт уведомлений, состояние вьюхи
/// остаётся прежним.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP-статус вне 200-299 с извлечённым сообщением сервера
    /// (или каноническим текстом статуса, если тело нечитаемо).
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Сетевой сбой: DNS, таймаут, обрыв соединения.
    #[error("network error")]
    Transport(#[source] reqwest::Error),

    /// Успешный статус, но тело не разобралось в ожидаемый тип.
    #[error("invalid response from server")]
    Decode(#[source] reqwest::Error),

    /// Клиентское предусловие не выполнено: нет черновика, нет сессии,
    /// уровень распродан. Терминально для текущей попытки, не для сессии.
    #[error("{0}")]
    Precondition(String),
}

impl ApiError {
    /// Короткое сообщение для порта уведомлений
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Клиент Sharthi API. Дешёвый Clone, общий пул соединений reqwest.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: StoreService,
}

impl ApiClient {
    pub fn from_config(config: &ApiConfig, store: StoreService) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // Authorization: Bearer <token> только при наличии токена,
    // пустое значение не отправляется никогда
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.store.token() {
            Some(token) if !token.is_empty() => builder.bearer_auth(token),
            _ => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|e| {
            error!("Request to Sharthi API failed: {:?}", e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(status, response).await);
        }

        response.json::<T>().await.map_err(ApiError::Decode)
    }

    /// Извлекает человекочитаемое сообщение из тела ошибки.
    /// Порядок полей: message, error, detail (FastAPI пишет detail).
    /// Нечитаемое тело откатывается на канонический текст статуса.
    async fn error_from_response(status: StatusCode, response: reqwest::Response) -> ApiError {
        let fallback = status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();

        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => ["message", "error", "detail"]
                .iter()
                .find_map(|key| body.get(*key).and_then(|v| v.as_str()).map(str::to_string))
                .unwrap_or(fallback),
            Err(_) => fallback,
        };

        ApiError::Api {
            status: status.as_u16(),
            message,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self
            .http
            .get(self.url(path))
            .header("Content-Type", "application/json");
        self.execute(self.authorize(builder)).await
    }

    pub async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let builder = self
            .http
            .get(self.url(path))
            .query(query)
            .header("Content-Type", "application/json");
        self.execute(self.authorize(builder)).await
    }

    // Публичные чтения (список событий, стенды) идут без токена,
    // как и в исходном клиенте
    pub async fn get_json_public<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self
            .http
            .get(self.url(path))
            .header("Content-Type", "application/json");
        self.execute(builder).await
    }

    /// GET с явным токеном - для /auth/me сразу после логина,
    /// пока токен ещё не сохранён в сессии
    pub async fn get_json_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, ApiError> {
        let builder = self
            .http
            .get(self.url(path))
            .header("Content-Type", "application/json")
            .bearer_auth(token);
        self.execute(builder).await
    }

    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let builder = self.http.post(self.url(path)).json(body);
        self.execute(self.authorize(builder)).await
    }

    pub async fn patch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let builder = self.http.patch(self.url(path)).json(body);
        self.execute(self.authorize(builder)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.http.delete(self.url(path));
        self.execute(self.authorize(builder)).await
    }

    // Multipart: Content-Type не ставим, boundary выставит reqwest
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let builder = self.http.post(self.url(path)).multipart(form);
        self.execute(self.authorize(builder)).await
    }
}
