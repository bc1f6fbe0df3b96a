//! Cooperative cancellation token.
//!
//! One token is associated with exactly one in-flight stream. `cancel()` is
//! idempotent and a no-op once the stream has reached a terminal state (the
//! state machine guards terminal transitions itself). The token takes effect
//! at the reader's next suspension point; it never interrupts in-progress
//! synchronous processing of an already-received chunk.

use std::sync::Arc;

use tokio::sync::watch;

/// Cloneable cancellation handle backed by a watch channel.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request cancellation. Idempotent; safe to call with no waiters.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once cancellation is requested.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // wait_for only errs if the sender is dropped, and we hold it.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
