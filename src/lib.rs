pub mod api;
pub mod config;
pub mod models;
pub mod notify;
pub mod services;
pub mod storage;
pub mod store;
pub mod views;

use std::sync::Arc;

use crate::api::ApiClient;
use crate::notify::{NoticeKind, Notifier, TracingNotifier};
use crate::storage::LocalStorage;
use crate::store::StoreService;

// Shared state для всего клиента
#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub store: StoreService,
    pub config: config::Config,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        Self::with_notifier(config, Arc::new(TracingNotifier))
    }

    pub fn with_notifier(config: config::Config, notifier: Arc<dyn Notifier>) -> Arc<Self> {
        let storage = LocalStorage::new(&config.storage.dir);
        let store = StoreService::new(storage);
        let api = ApiClient::from_config(&config.api, store.clone());

        Arc::new(Self {
            api,
            store,
            config,
            notifier,
        })
    }

    pub fn notify(&self, kind: NoticeKind, message: &str) {
        self.notifier.notify(kind, message);
    }
}
