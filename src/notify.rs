//! User-facing notification service.
//!
//! An explicit publish/subscribe instance passed by dependency injection
//! rather than a process-wide bus, so lifecycle and test isolation stay
//! explicit. The engine publishes transport failures here; payload decode
//! failures are recovered locally and never surfaced.

use tokio::sync::broadcast;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// One user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Broadcast-backed notifier. Cloning shares the underlying channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    /// Create a notifier buffering up to `capacity` undelivered entries
    /// per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to notifications published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Publish an informational notification.
    pub fn info(&self, message: impl Into<String>) {
        self.publish(NotificationLevel::Info, message.into());
    }

    /// Publish an error notification.
    pub fn error(&self, message: impl Into<String>) {
        self.publish(NotificationLevel::Error, message.into());
    }

    fn publish(&self, level: NotificationLevel, message: String) {
        tracing::debug!(?level, %message, "notification published");
        // Send fails only when nobody is subscribed; that is fine.
        let _ = self.tx.send(Notification { level, message });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(16)
    }
}
