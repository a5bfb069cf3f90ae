use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::ApiError;
use crate::models::{de_i64, Booking};
use crate::notify::NoticeKind;
use crate::AppState;

/// Профиль креатора из GET /creator/me.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub city_id: String,
    #[serde(default, deserialize_with = "de_i64")]
    pub min_price: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub max_price: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, deserialize_with = "de_i64")]
    pub total_bookings: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub profile_complete: i64,
}

/// Изменяемые поля профиля (PATCH /creator/me).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorProfileUpdate {
    pub full_name: String,
    pub phone: String,
    pub bio: String,
    pub city_id: String,
    pub min_price: i64,
    pub max_price: i64,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioItem {
    #[serde(default, deserialize_with = "crate::models::de_id", alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// Заявка KYC: реквизиты, проверяемые администратором асинхронно.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorKyc {
    pub aadhaar: String,
    pub pan: String,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycStatus {
    #[serde(default)]
    pub id: String,
    // None - заявка ещё не подавалась
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub aadhaar: Option<String>,
    #[serde(default)]
    pub pan: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub ifsc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AvatarUploadResponse {
    #[serde(default)]
    url: String,
}

/// Кабинет креатора: профиль, портфолио, брони, KYC.
pub struct CreatorView {
    state: Arc<AppState>,
    profile: Option<CreatorProfile>,
    portfolio: Vec<PortfolioItem>,
    bookings: Vec<Booking>,
    kyc: Option<KycStatus>,
}

impl CreatorView {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            profile: None,
            portfolio: Vec::new(),
            bookings: Vec::new(),
            kyc: None,
        }
    }

    /// Четыре последовательных чтения; сбой первого коротит остальные.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let profile = match self
            .state
            .api
            .get_json::<CreatorProfile>("/creator/me")
            .await
        {
            Ok(profile) => profile,
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                return Err(e);
            }
        };
        self.profile = Some(profile);

        self.portfolio = self
            .state
            .api
            .get_json::<Vec<PortfolioItem>>("/creator/portfolio")
            .await
            .unwrap_or_default();

        self.bookings = self
            .state
            .api
            .get_json::<Vec<Booking>>("/bookings/my")
            .await
            .unwrap_or_default();

        self.kyc = self.state.api.get_json::<KycStatus>("/creator/kyc").await.ok();

        Ok(())
    }

    pub fn profile(&self) -> Option<&CreatorProfile> {
        self.profile.as_ref()
    }

    pub fn portfolio(&self) -> &[PortfolioItem] {
        &self.portfolio
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn kyc(&self) -> Option<&KycStatus> {
        self.kyc.as_ref()
    }

    /// PATCH /creator/me
    pub async fn save_profile(&mut self, update: &CreatorProfileUpdate) -> Result<(), ApiError> {
        match self
            .state
            .api
            .patch_json::<serde_json::Value>("/creator/me", update)
            .await
        {
            Ok(_) => {
                self.state.notify(NoticeKind::Success, "Profile updated!");
                if let Ok(profile) = self
                    .state
                    .api
                    .get_json::<CreatorProfile>("/creator/me")
                    .await
                {
                    self.profile = Some(profile);
                }
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// POST /creator/avatar (multipart "file"). Возвращает URL аватара.
    pub async fn upload_avatar(
        &mut self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        match self
            .state
            .api
            .post_multipart::<AvatarUploadResponse>("/creator/avatar", form)
            .await
        {
            Ok(response) => {
                self.state.notify(NoticeKind::Success, "Avatar updated!");
                if let Some(profile) = &mut self.profile {
                    profile.avatar = response.url.clone();
                }
                Ok(response.url)
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// POST /creator/portfolio (multipart "files"), после успеха
    /// список перечитывается
    pub async fn upload_portfolio(
        &mut self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let form = Form::new().part("files", Part::bytes(bytes).file_name(file_name.to_string()));

        match self
            .state
            .api
            .post_multipart::<serde_json::Value>("/creator/portfolio", form)
            .await
        {
            Ok(_) => {
                self.portfolio = self
                    .state
                    .api
                    .get_json::<Vec<PortfolioItem>>("/creator/portfolio")
                    .await
                    .unwrap_or_default();
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// DELETE /creator/portfolio/{id}
    pub async fn delete_portfolio(&mut self, item_id: &str) -> Result<(), ApiError> {
        let path = format!("/creator/portfolio/{}", item_id);
        match self.state.api.delete::<serde_json::Value>(&path).await {
            Ok(_) => {
                self.portfolio.retain(|item| item.id != item_id);
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }

    /// POST /creator/kyc/submit; статус перечитывается после успеха
    pub async fn submit_kyc(&mut self, kyc: &CreatorKyc) -> Result<(), ApiError> {
        match self
            .state
            .api
            .post_json::<serde_json::Value>("/creator/kyc/submit", kyc)
            .await
        {
            Ok(_) => {
                self.state.notify(NoticeKind::Success, "KYC submitted");
                self.kyc = self.state.api.get_json::<KycStatus>("/creator/kyc").await.ok();
                Ok(())
            }
            Err(e) => {
                self.state.notify(NoticeKind::Error, &e.user_message());
                Err(e)
            }
        }
    }
}
