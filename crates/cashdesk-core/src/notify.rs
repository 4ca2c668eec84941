//! User-facing notification channel
//!
//! Transient success/error messages, optionally updated in place (a
//! "Deleting..." notice that turns into the final result).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Fixed notification texts
pub mod messages {
    pub const CREATED: &str = "Record created successfully!";
    pub const UPDATED: &str = "Record updated successfully!";
    pub const CREATE_FAILED: &str = "Could not create this record!";
    pub const UPDATE_FAILED: &str = "Could not update this record!";
    pub const DELETING: &str = "Deleting...";
    pub const DELETED: &str = "Record deleted successfully!";
    pub const DELETE_FAILED: &str = "Could not delete this record!";
    pub const LOAD_FAILED: &str = "Could not load data from the server.";
}

/// Notice level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Loading,
    Success,
    Error,
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeLevel::Loading => write!(f, "loading"),
            NoticeLevel::Success => write!(f, "success"),
            NoticeLevel::Error => write!(f, "error"),
        }
    }
}

/// Identifies a shown notice so it can be updated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(pub u64);

/// Notification capability injected into the core
pub trait Notifier: Send + Sync {
    /// Show a notice and return its id
    fn notify(&self, level: NoticeLevel, message: &str) -> NoticeId;

    /// Replace the level and text of a notice already shown
    fn update(&self, id: NoticeId, level: NoticeLevel, message: &str);

    fn success(&self, message: &str) -> NoticeId {
        self.notify(NoticeLevel::Success, message)
    }

    fn error(&self, message: &str) -> NoticeId {
        self.notify(NoticeLevel::Error, message)
    }

    fn loading(&self, message: &str) -> NoticeId {
        self.notify(NoticeLevel::Loading, message)
    }
}

/// Notifier reference type
pub type NotifierRef = Arc<dyn Notifier>;

/// Notifier that writes notices to the log
#[derive(Debug, Default)]
pub struct LogNotifier {
    next_id: AtomicU64,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) -> NoticeId {
        let id = NoticeId(self.next_id.fetch_add(1, Ordering::Relaxed));
        match level {
            NoticeLevel::Error => log::error!(target: "cashdesk::notice", "{}", message),
            _ => log::info!(target: "cashdesk::notice", "{}", message),
        }
        id
    }

    fn update(&self, id: NoticeId, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Error => log::error!(target: "cashdesk::notice", "[{}] {}", id.0, message),
            _ => log::info!(target: "cashdesk::notice", "[{}] {}", id.0, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_notifier_ids_increase() {
        let notifier = LogNotifier::new();
        let first = notifier.loading(messages::DELETING);
        let second = notifier.success(messages::CREATED);
        assert_ne!(first, second);
        notifier.update(first, NoticeLevel::Success, messages::DELETED);
    }

    #[test]
    fn test_level_display() {
        assert_eq!(NoticeLevel::Loading.to_string(), "loading");
        assert_eq!(NoticeLevel::Error.to_string(), "error");
    }
}
