use crate::storage::LocalStorage;

pub mod draft;
pub mod session;

/// Типизированный слой над локальным хранилищем: сессия и черновик брони.
/// Ключи канонические, по одному файлу на значение.
#[derive(Debug, Clone)]
pub struct StoreService {
    storage: LocalStorage,
}

impl StoreService {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &LocalStorage {
        &self.storage
    }
}
