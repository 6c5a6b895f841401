//! Transient notification queue
//!
//! Bounded FIFO of display messages. Each entry expires a fixed TTL after it
//! was pushed; expiry is applied by one sweep pass over the queue instead of
//! a timer per entry. Pushing into a full queue evicts the oldest entry.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use uuid::Uuid;

/// Default number of visible notifications
pub const DEFAULT_CAPACITY: usize = 5;

/// Default time-to-live of a notification
pub const DEFAULT_TTL_MS: u64 = 3000;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Info => write!(f, "INFO"),
            NotificationLevel::Success => write!(f, "OK"),
            NotificationLevel::Warning => write!(f, "WARN"),
            NotificationLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// One queued message
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: DateTime<Utc>,
    pub expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Bounded queue of self-expiring notifications
#[derive(Debug)]
pub struct NotificationQueue {
    entries: VecDeque<Notification>,
    capacity: usize,
    ttl: Duration,
}

impl NotificationQueue {
    /// `capacity` is clamped to at least one entry
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            ttl,
        }
    }

    /// Append a message, evicting the oldest when full
    pub fn push(&mut self, message: impl Into<String>, level: NotificationLevel, now: Instant) -> Uuid {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }

        let id = Uuid::new_v4();
        self.entries.push_back(Notification {
            id,
            message: message.into(),
            level,
            created_at: Utc::now(),
            expires_at: now + self.ttl,
        });
        id
    }

    /// Remove every expired entry, returning them oldest first
    pub fn sweep(&mut self, now: Instant) -> Vec<Notification> {
        let mut expired = Vec::new();
        self.entries.retain(|entry| {
            if entry.is_expired(now) {
                expired.push(entry.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    /// Drop a notification before it expires
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, Duration::from_millis(DEFAULT_TTL_MS))
    }
}

/// Queue shared between producers and one sweeper task
#[derive(Clone, Default)]
pub struct SharedNotifications {
    queue: Arc<Mutex<NotificationQueue>>,
}

impl SharedNotifications {
    pub fn new(queue: NotificationQueue) -> Self {
        Self {
            queue: Arc::new(Mutex::new(queue)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NotificationQueue> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, message: impl Into<String>, level: NotificationLevel) -> Uuid {
        self.lock().push(message, level, Instant::now())
    }

    pub fn sweep(&self) -> Vec<Notification> {
        self.lock().sweep(Instant::now())
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        self.lock().dismiss(id)
    }

    /// Messages currently visible, oldest first
    pub fn active(&self) -> Vec<Notification> {
        self.lock().active().cloned().collect()
    }

    /// Sweep on one interval until the handle is aborted
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let notifications = self.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(period);
            loop {
                interval.tick().await;
                let expired = notifications.sweep();
                if !expired.is_empty() {
                    tracing::trace!(count = expired.len(), "expired notifications");
                }
            }
        })
    }
}
