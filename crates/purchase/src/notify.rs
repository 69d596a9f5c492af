//! Notice sinks.
//!
//! Every user-visible outcome of the purchase flow is a [`Notice`] handed to
//! a [`Notifier`]. The UI layer renders them as toasts; the CLI logs and
//! prints them.

use std::sync::Mutex;

use item_purchase_core::{Notice, Severity};

/// Receives user-visible notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Logs notices through `tracing` at a level matching their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Error => {
                tracing::error!(title = %notice.title, "{}", notice.message);
            }
            Severity::Warning => {
                tracing::warn!(title = %notice.title, "{}", notice.message);
            }
            Severity::Success | Severity::Info => {
                tracing::info!(title = %notice.title, "{}", notice.message);
            }
        }
    }
}

/// Collects notices in memory, in emission order.
#[derive(Debug, Default)]
pub struct NoticeBuffer {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every notice collected so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    /// Remove and return every collected notice.
    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut notices| std::mem::take(&mut *notices))
            .unwrap_or_default()
    }

    /// Number of collected notices with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.notices
            .lock()
            .map(|notices| notices.iter().filter(|n| n.severity == severity).count())
            .unwrap_or(0)
    }
}

impl Notifier for NoticeBuffer {
    fn notify(&self, notice: Notice) {
        tracing::debug!(%notice, "notice");
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}
