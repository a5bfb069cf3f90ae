use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{de_datetime, de_f64, de_i64, de_id};

/// Событие маркетплейса. Создаётся организатором, для клиента read-only.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub city_id: String,
    pub start_at: Option<NaiveDateTime>,
    pub end_at: Option<NaiveDateTime>,
    pub tags: Vec<String>,
    pub description: String,
    pub venue_name: String,
    pub location: String,
    pub status: String,
    pub rating_avg: f64,
    pub rating_count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    #[serde(default, alias = "_id", deserialize_with = "de_id")]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    city_id: String,
    #[serde(default, deserialize_with = "de_datetime")]
    start_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de_datetime")]
    end_at: Option<NaiveDateTime>,
    // Теги: либо массив, либо CSV-строка categoryTagsCsv
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    category_tags_csv: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    venue_name: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, deserialize_with = "de_f64")]
    rating_avg: f64,
    #[serde(default, deserialize_with = "de_i64")]
    rating_count: i64,
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        let tags = match raw.tags {
            Some(tags) if !tags.is_empty() => tags,
            _ => raw
                .category_tags_csv
                .unwrap_or_default()
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        };

        Event {
            id: raw.id,
            title: raw.title,
            city_id: raw.city_id,
            start_at: raw.start_at,
            end_at: raw.end_at,
            tags,
            description: raw.description,
            venue_name: raw.venue_name,
            location: raw.location,
            status: raw.status.unwrap_or_else(|| "active".to_string()),
            rating_avg: raw.rating_avg,
            rating_count: raw.rating_count,
        }
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawEvent::deserialize(deserializer).map(Event::from)
    }
}
