use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

use crate::api::ApiError;
use crate::config::UploadConfig;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

/// Клиент стороннего хоста изображений (Cloudinary, unsigned upload).
/// Аватары, обложки и баннеры живут вне основного бэкенда.
#[derive(Debug, Clone)]
pub struct AssetUploader {
    http: reqwest::Client,
    base_url: String,
    cloud_name: String,
    upload_preset: String,
}

impl AssetUploader {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            upload_preset: config.upload_preset.clone(),
        }
    }

    /// Загружает изображение и возвращает его публичный URL.
    /// Ответ без secure_url считается неудачей.
    pub async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ApiError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let url = format!("{}/{}/image/upload", self.base_url, self.cloud_name);
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Asset upload request failed: {:?}", e);
                ApiError::Transport(e)
            })?;

        let status = response.status();
        let body: UploadResponse = response.json().await.map_err(ApiError::Decode)?;

        match body.secure_url {
            Some(secure_url) => {
                info!("Uploaded {} to asset host", file_name);
                Ok(secure_url)
            }
            None => Err(ApiError::Api {
                status: status.as_u16(),
                message: "Upload failed".to_string(),
            }),
        }
    }
}
