//! Transient, dismissible user notifications.

use std::time::Duration;

use web_time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub expires_at: Instant,
    dismissed: bool,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        message: impl Into<String>,
        now: Instant,
        ttl: Duration,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            expires_at: now + ttl,
            dismissed: false,
        }
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    /// Whether the notification should still be shown
    pub fn is_active(&self, now: Instant) -> bool {
        !self.dismissed && now < self.expires_at
    }
}
