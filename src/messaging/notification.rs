// Notifications surfaced to the UI from background threads

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::game::Feedback;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Which subsystem raised the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    Capture,
    Game,
    Generic,
}

/// A timestamped message for the UI surface. Device errors and game
/// feedback both travel this way so the UI has a single inbox.
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

    /// Game feedback as a notification.
    pub fn from_feedback(feedback: Feedback) -> Self {
        let level = match feedback {
            Feedback::Success => NotificationLevel::Info,
            Feedback::TryAgain | Feedback::NoAttemptsLeft => NotificationLevel::Warning,
            Feedback::MicrophoneError => NotificationLevel::Error,
        };
        Self::new(level, NotificationCategory::Game, feedback.text().to_string())
    }

    /// True when the notification is younger than `max_age_ms`.
    pub fn is_recent(&self, max_age_ms: u64) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        now.saturating_sub(self.timestamp) < max_age_ms
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}/{:?}] {}", self.level, self.category, self.message)
    }
}
