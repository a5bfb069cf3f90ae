use serde::{Deserialize, Serialize};

use super::{de_i64, de_id};

/// Уровень стенда. Бэкенд хранит BRONZE/SILVER/GOLD,
/// интерфейс показывает Basic/Premium/VIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Bronze, Tier::Silver, Tier::Gold];

    // Лояльный разбор: регистр не важен, неизвестное значение -> SILVER
    pub fn parse(raw: &str) -> Tier {
        match raw.trim().to_uppercase().as_str() {
            "BRONZE" | "BASIC" => Tier::Bronze,
            "GOLD" | "VIP" => Tier::Gold,
            _ => Tier::Silver,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Bronze => "Basic",
            Tier::Silver => "Premium",
            Tier::Gold => "VIP",
        }
    }

    // Цена по умолчанию для уровня без выставленных стендов
    pub fn default_price(&self) -> i64 {
        match self {
            Tier::Bronze => 5000,
            Tier::Silver => 8000,
            Tier::Gold => 12000,
        }
    }
}

/// Стенд события. Инвентарь (`qty_left`) авторитетен только на сервере,
/// клиент его никогда не уменьшает локально.
#[derive(Debug, Clone, Serialize)]
pub struct Stall {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub price: i64,
    pub qty_total: i64,
    pub qty_left: i64,
    pub specs: Option<String>,
}

// Сырой ответ бэкенда со всеми встречавшимися вариантами ключей
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStall {
    #[serde(default, alias = "_id", deserialize_with = "de_id")]
    id: String,
    #[serde(default, alias = "stallName")]
    name: String,
    #[serde(default, alias = "Tier", alias = "tierName")]
    tier: Option<String>,
    #[serde(default, alias = "amount", deserialize_with = "de_i64")]
    price: i64,
    #[serde(default, alias = "qty_total", alias = "total", deserialize_with = "de_i64")]
    qty_total: i64,
    #[serde(default, alias = "qtyleft", alias = "qty_remaining", deserialize_with = "de_i64")]
    qty_left: i64,
    #[serde(default)]
    specs: Option<String>,
}

impl From<RawStall> for Stall {
    fn from(raw: RawStall) -> Self {
        Stall {
            id: raw.id,
            name: raw.name,
            tier: Tier::parse(raw.tier.as_deref().unwrap_or("SILVER")),
            price: raw.price,
            qty_total: raw.qty_total,
            qty_left: raw.qty_left,
            specs: raw.specs.filter(|s| !s.is_empty()),
        }
    }
}

impl<'de> Deserialize<'de> for Stall {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawStall::deserialize(deserializer).map(Stall::from)
    }
}

/// Список стендов приходит либо голым массивом, либо `{"stalls": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StallsPayload {
    Bare(Vec<Stall>),
    Wrapped { stalls: Vec<Stall> },
}

impl StallsPayload {
    pub fn into_stalls(self) -> Vec<Stall> {
        match self {
            StallsPayload::Bare(list) => list,
            StallsPayload::Wrapped { stalls } => stalls,
        }
    }
}

/// Черновик брони: выбор уровня до оплаты. Живёт только в локальном
/// хранилище; существует ровно между выбором уровня и успешной оплатой.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub event_id: String,
    pub stall_id: String,
    pub tier: String,
    pub price: i64,
}
