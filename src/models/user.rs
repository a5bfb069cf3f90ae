use serde::{Deserialize, Deserializer, Serialize};

use super::de_id;

/// Роль пользователя. Бэкенд пишет CREATOR/ORGANIZER/ADMIN,
/// неизвестное значение читается как CREATOR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Creator,
    Organizer,
    Admin,
}

impl Role {
    pub fn parse(raw: &str) -> Role {
        match raw.trim().to_uppercase().as_str() {
            "ORGANIZER" => Role::Organizer,
            "ADMIN" => Role::Admin,
            _ => Role::Creator,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Role::Creator => "CREATOR",
            Role::Organizer => "ORGANIZER",
            Role::Admin => "ADMIN",
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Role::parse(raw.as_deref().unwrap_or("CREATOR")))
    }
}

/// Пользователь из GET /auth/me; кешируется в сессии рядом с токеном.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(default, alias = "_id", deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Creator
}
