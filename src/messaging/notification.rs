// Notifications from the audio thread to the controlling thread

use std::time::{SystemTime, UNIX_EPOCH};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Notification source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    Audio,
    Instrument,
    Generic,
}

/// A notification with timestamp and metadata
///
/// Error-level Audio/Instrument notifications mean the stream is dead:
/// there is no in-stream recovery, the session must be rebuilt.
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub category: NotificationCategory,
    pub message: String,
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
}

impl Notification {
    pub fn new(level: NotificationLevel, category: NotificationCategory, message: String) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            level,
            category,
            message,
            timestamp,
        }
    }

    pub fn info(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Info, category, message)
    }

    pub fn warning(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Warning, category, message)
    }

    pub fn error(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Error, category, message)
    }

    pub fn is_fatal(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}
