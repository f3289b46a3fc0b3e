//! Transient user-facing notifications
//!
//! Recoverable failures (a source write that did not land, for example) are
//! reported here instead of interrupting the edit. The host UI drains the
//! buffer and shows each entry as a toast.

use parking_lot::RwLock;
use std::sync::Arc;

/// Default number of notifications retained
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 50;

/// Severity of a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warn,
    Error,
}

impl NotificationLevel {
    /// Short prefix for display
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// A single notification
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    /// Seconds since UNIX epoch
    pub timestamp_secs: u64,
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp_secs: Self::current_timestamp(),
            level,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warn, message)
    }

    fn current_timestamp() -> u64 {
        use std::time::SystemTime;
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Bounded, thread-safe notification buffer
///
/// Clones share the same entries.
#[derive(Clone, Debug)]
pub struct Notifications {
    entries: Arc<RwLock<Vec<Notification>>>,
    limit: usize,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::with_limit(DEFAULT_NOTIFICATION_LIMIT)
    }
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` entries (at least one)
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: Arc::new(RwLock::new(Vec::with_capacity(limit))),
            limit,
        }
    }

    /// Add a notification, dropping the oldest ones over the limit
    pub fn push(&self, notification: Notification) {
        let mut entries = self.entries.write();
        entries.push(notification);

        if entries.len() > self.limit {
            let excess = entries.len() - self.limit;
            entries.drain(0..excess);
        }
    }

    /// Take every pending notification
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.write())
    }

    /// Copy of the pending notifications
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_snapshot() {
        let notifications = Notifications::new();
        notifications.push(Notification::error("Failed to write code"));

        let snapshot = notifications.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].level, NotificationLevel::Error);
        assert_eq!(snapshot[0].message, "Failed to write code");
        assert!(snapshot[0].timestamp_secs > 0);
    }

    #[test]
    fn test_drain_empties_buffer() {
        let notifications = Notifications::new();
        notifications.push(Notification::warn("one"));
        notifications.push(Notification::error("two"));

        let drained = notifications.drain();
        assert_eq!(drained.len(), 2);
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_oldest_entries_are_trimmed() {
        let notifications = Notifications::with_limit(3);
        for i in 0..5 {
            notifications.push(Notification::warn(format!("Message {i}")));
        }

        let snapshot = notifications.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].message, "Message 2");
    }

    #[test]
    fn test_clones_share_entries() {
        let notifications = Notifications::new();
        let shared = notifications.clone();
        shared.push(Notification::error("boom"));
        assert_eq!(notifications.len(), 1);
        notifications.clear();
        assert!(shared.is_empty());
    }

    #[test]
    fn test_level_prefix() {
        assert_eq!(NotificationLevel::Error.prefix(), "ERROR");
        assert_eq!(NotificationLevel::Info.prefix(), "INFO");
    }
}
