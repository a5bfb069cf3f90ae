use serde::Deserialize;
use std::env;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub fees: FeeConfig,
    pub upload: UploadConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub rust_log: String,
}

// Настройки бэкенда Sharthi API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

// Настройки локального хранилища (токен, черновик брони)
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub dir: String,
}

// Комиссии платформы. Обе наблюдаемо нулевые, но сумма считается
// как base + platform + gst, и все три строки показываются в сводке.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeConfig {
    pub platform_fee: i64,
    pub gst: i64,
}

// Настройки стороннего хоста изображений (Cloudinary)
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub base_url: String,
    pub cloud_name: String,
    pub upload_preset: String,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "sharthi_client=debug".to_string()),
            },
            api: ApiConfig {
                base_url: env::var("SHARTHI_API_URL")
                    .unwrap_or_else(|_| "https://sharthi-api.onrender.com".to_string()),
                timeout_seconds: env::var("SHARTHI_API_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("SHARTHI_API_TIMEOUT_SECONDS must be a valid number"),
            },
            storage: StorageConfig {
                dir: env::var("SHARTHI_STORAGE_DIR")
                    .unwrap_or_else(|_| ".sharthi".to_string()),
            },
            fees: FeeConfig {
                platform_fee: env::var("SHARTHI_PLATFORM_FEE")
                    .unwrap_or_else(|_| "0".to_string())
                    .parse()
                    .expect("SHARTHI_PLATFORM_FEE must be a valid number"),
                gst: env::var("SHARTHI_GST")
                    .unwrap_or_else(|_| "0".to_string())
                    .parse()
                    .expect("SHARTHI_GST must be a valid number"),
            },
            upload: UploadConfig {
                base_url: env::var("UPLOAD_BASE_URL")
                    .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".to_string()),
                cloud_name: env::var("UPLOAD_CLOUD_NAME")
                    .unwrap_or_else(|_| "dqku1n0xm".to_string()),
                upload_preset: env::var("UPLOAD_PRESET")
                    .unwrap_or_else(|_| "default".to_string()),
            },
        }
    }
}
