//! Conversation state: message lifecycle and snapshot publication.
//!
//! The message list is the only shared mutable resource. It is mutated
//! exclusively through "update message by id" operations, so two overlapping
//! streams touching distinct messages never conflict. Every publish sends an
//! immutable `Arc<Vec<Message>>` snapshot through a watch channel; callers
//! batch publishes per processed chunk.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::models::{Message, MessageStatus, ERROR_APOLOGY};

/// Owns the message list and its snapshot channel.
pub struct ConversationState {
    messages: Mutex<Vec<Message>>,
    tx: watch::Sender<Arc<Vec<Message>>>,
}

impl ConversationState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Vec::new()));
        Self {
            messages: Mutex::new(Vec::new()),
            tx,
        }
    }

    /// Subscribe to published snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Message>>> {
        self.tx.subscribe()
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Arc<Vec<Message>> {
        self.tx.borrow().clone()
    }

    /// Append a message without publishing.
    pub fn append(&self, message: Message) {
        self.lock().push(message);
    }

    /// Publish an immutable snapshot of the current message list.
    pub fn publish(&self) {
        let snapshot = Arc::new(self.lock().clone());
        self.tx.send_replace(snapshot);
    }

    /// Apply a mutation to the message with the given id.
    ///
    /// Returns false when the id is unknown. Does not publish.
    pub fn update<F>(&self, id: &str, mutate: F) -> bool
    where
        F: FnOnce(&mut Message),
    {
        let mut messages = self.lock();
        match messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                mutate(message);
                true
            }
            None => false,
        }
    }

    /// Transition `Pending -> Streaming` for the first processed delta.
    ///
    /// Returns true only on the transition itself; callers use this to force
    /// the immediate snapshot publish that clears the loading indicator.
    pub fn mark_streaming(&self, id: &str) -> bool {
        let mut transitioned = false;
        self.update(id, |message| {
            if message.status == MessageStatus::Pending {
                message.status = MessageStatus::Streaming;
                transitioned = true;
            }
        });
        transitioned
    }

    /// Terminal transition to `Success`, preserving accumulated content.
    ///
    /// Used for both clean stream end and cooperative cancellation;
    /// cancellation is explicitly not a failure. No-op once terminal.
    pub fn complete(&self, id: &str) -> bool {
        let mut transitioned = false;
        self.update(id, |message| {
            if !message.status.is_terminal() {
                message.status = MessageStatus::Success;
                transitioned = true;
            }
        });
        transitioned
    }

    /// Terminal transition to `Error`.
    ///
    /// Replaces the displayed content with the fixed apology string and
    /// discards partial accumulation. No-op once terminal.
    pub fn fail(&self, id: &str) -> bool {
        let mut transitioned = false;
        self.update(id, |message| {
            if !message.status.is_terminal() {
                message.status = MessageStatus::Error;
                message.content = ERROR_APOLOGY.to_string();
                message.display_content = ERROR_APOLOGY.to_string();
                message.thinking = None;
                message.tool_names.clear();
                transitioned = true;
            }
        });
        transitioned
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Message>> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}
