use tracing::warn;

use crate::models::BookingDraft;
use crate::store::StoreService;

// Один общеизвестный ключ черновика брони
const DRAFT_KEY: &str = "booking_draft";

impl StoreService {
    /// Записать черновик. Прежний черновик перезаписывается целиком,
    /// слияния нет.
    pub fn save_draft(&self, draft: &BookingDraft) {
        match serde_json::to_string(draft) {
            Ok(json) => {
                if let Err(e) = self.storage().set(DRAFT_KEY, &json) {
                    warn!("Failed to persist booking draft: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize booking draft: {}", e),
        }
    }

    /// Черновик есть только между выбором уровня и завершением оплаты.
    /// Отсутствие - терминальное состояние мастера, значения по умолчанию
    /// здесь не восстанавливаются.
    pub fn load_draft(&self) -> Option<BookingDraft> {
        let raw = self.storage().get(DRAFT_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    pub fn clear_draft(&self) {
        self.storage().remove(DRAFT_KEY);
    }
}
