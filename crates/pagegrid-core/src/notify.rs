//! Transient, auto-dismissing user notifications.

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

/// Default lifetime of a notification.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Most notifications held at once. The oldest is dropped first.
pub const MAX_NOTIFICATIONS: usize = 5;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A message shown to the user until it expires.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    created: Instant,
    ttl: Duration,
}

impl Notification {
    /// Whether the notification is still visible at `now`.
    pub fn is_active(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) < self.ttl
    }
}

/// Queue of live notifications.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    entries: Vec<Notification>,
    next_id: u64,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notification created now with the default lifetime.
    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) -> u64 {
        self.push_at(level, message, Instant::now(), DEFAULT_NOTIFICATION_TTL)
    }

    /// Add a notification with an explicit creation time and lifetime.
    pub fn push_at(
        &mut self,
        level: NotificationLevel,
        message: impl Into<String>,
        created: Instant,
        ttl: Duration,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Notification {
            id,
            level,
            message: message.into(),
            created,
            ttl,
        });
        if self.entries.len() > MAX_NOTIFICATIONS {
            self.entries.remove(0);
        }
        id
    }

    /// Notifications still visible at `now`.
    pub fn active(&self, now: Instant) -> impl Iterator<Item = &Notification> {
        self.entries.iter().filter(move |n| n.is_active(now))
    }

    /// Drop expired notifications. Returns true if any were removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.is_active(now));
        self.entries.len() != before
    }

    /// Dismiss a notification early.
    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|n| n.id != id);
    }

    /// Every held notification, oldest first, expired or not.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
