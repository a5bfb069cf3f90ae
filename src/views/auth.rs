use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::api::ApiError;
use crate::models::{AuthUser, Role};
use crate::notify::NoticeKind;
use crate::AppState;

#[derive(Debug, Serialize)]
struct SignupRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    role: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignupResponse {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// Вход, регистрация и восстановление сессии при старте.
pub struct AuthView {
    state: Arc<AppState>,
}

impl AuthView {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// POST /auth/signup. Возвращает id созданного пользователя.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<String, ApiError> {
        if name.is_empty() || email.is_empty() || password.is_empty() {
            let message = "All fields required";
            self.state.notify(NoticeKind::Error, message);
            return Err(ApiError::Precondition(message.to_string()));
        }

        let request = SignupRequest {
            name,
            email,
            password,
            role: role.code(),
        };
        match self
            .state
            .api
            .post_json::<SignupResponse>("/auth/signup", &request)
            .await
        {
            Ok(response) => {
                self.state.notify(NoticeKind::Success, "Account created");
                Ok(response.id)
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// POST /auth/login, затем GET /auth/me с полученным токеном.
    /// Сессия сохраняется только когда удались оба вызова.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, ApiError> {
        if email.is_empty() || password.is_empty() {
            let message = "Email and password required";
            self.state.notify(NoticeKind::Error, message);
            return Err(ApiError::Precondition(message.to_string()));
        }

        let request = LoginRequest { email, password };
        let login = match self
            .state
            .api
            .post_json::<LoginResponse>("/auth/login", &request)
            .await
        {
            Ok(login) => login,
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                return Err(e);
            }
        };

        let me = match self
            .state
            .api
            .get_json_with_token::<AuthUser>("/auth/me", &login.access_token)
            .await
        {
            Ok(me) => me,
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                return Err(e);
            }
        };

        self.state.store.save_auth(&login.access_token, &me);
        self.state.notify(NoticeKind::Success, "Logged in");
        info!("Logged in as {} ({})", me.email, me.role.code());
        Ok(me)
    }

    /// Восстановление сессии при старте приложения: если токен сохранён,
    /// спрашиваем /auth/me. Отказ сервера тихо читается как
    /// "не аутентифицирован" - токен остаётся до явного выхода.
    pub async fn bootstrap(&self) -> Option<AuthUser> {
        self.state.store.token()?;
        self.state.api.get_json::<AuthUser>("/auth/me").await.ok()
    }

    pub fn logout(&self) {
        self.state.store.clear_auth();
        info!("Session cleared");
    }
}
