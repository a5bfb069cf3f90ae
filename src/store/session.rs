use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::AuthUser;
use crate::store::StoreService;

// Единственный канонический ключ сессии (legacy-ключи jwt/sharthi_token
// старого клиента не воспроизводятся)
const SESSION_KEY: &str = "session";

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    user: Option<AuthUser>,
}

impl StoreService {
    /// Сохранить токен и пользователя после входа
    pub fn save_auth(&self, token: &str, user: &AuthUser) {
        let session = StoredSession {
            token: token.to_string(),
            user: Some(user.clone()),
        };
        match serde_json::to_string(&session) {
            Ok(json) => {
                if let Err(e) = self.storage().set(SESSION_KEY, &json) {
                    warn!("Failed to persist session: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize session: {}", e),
        }
    }

    fn load_session(&self) -> Option<StoredSession> {
        let raw = self.storage().get(SESSION_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    // Токен непрозрачный: никакой валидации и отслеживания истечения,
    // сервер сам отвергнет протухший токен со статусом 401
    pub fn token(&self) -> Option<String> {
        self.load_session().map(|s| s.token)
    }

    /// Последний известный пользователь (кеш ответа /auth/me)
    pub fn user(&self) -> Option<AuthUser> {
        self.load_session().and_then(|s| s.user)
    }

    pub fn clear_auth(&self) {
        self.storage().remove(SESSION_KEY);
    }
}
