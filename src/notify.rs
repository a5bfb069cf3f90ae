use std::sync::Mutex;
use tracing::{error, info};

/// Вид уведомления (аналог toast-сообщений исходного интерфейса)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Порт уведомлений. Вьюхи сообщают пользователю об исходе действия
/// только через него; конкретный UI подставляет свою реализацию.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Реализация по умолчанию - пишет уведомления в лог
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Error => error!("notice: {}", message),
            NoticeKind::Success | NoticeKind::Info => info!("notice: {}", message),
        }
    }
}

/// Накапливает уведомления в памяти - для тестов и встраивающих UI,
/// которым нужно показать очередь сообщений
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<(NoticeKind, String)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<(NoticeKind, String)> {
        std::mem::take(&mut self.notices.lock().unwrap())
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((kind, message.to_string()));
    }
}
