//! Conversation engine: the surface the UI collaborator drives.
//!
//! `submit()` appends a completed user message plus a pending assistant
//! placeholder and spawns a task that pumps the backend stream into the
//! conversation state. `cancel()` cooperatively stops the in-flight stream,
//! preserving whatever partial content has accumulated.

mod session;
mod state;
mod stream;

pub use state::ConversationState;

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::cancel::CancelToken;
use crate::error::{ChatError, ChatResult};
use crate::models::{Message, SubmitOptions};
use crate::notify::{Notification, Notifier};
use crate::sse::StreamReader;
use crate::traits::transport::StreamTransport;

use session::StreamSession;

/// Drives one conversation against a streaming backend.
pub struct ChatEngine {
    transport: Arc<dyn StreamTransport>,
    state: Arc<ConversationState>,
    notifier: Notifier,
    /// Opaque server-assigned session id, created on first submit.
    session_id: tokio::sync::Mutex<Option<String>>,
    /// Token of the current in-flight stream, if any.
    active: Mutex<Option<CancelToken>>,
}

impl ChatEngine {
    pub fn new(transport: Arc<dyn StreamTransport>, notifier: Notifier) -> Self {
        Self {
            transport,
            state: Arc::new(ConversationState::new()),
            notifier,
            session_id: tokio::sync::Mutex::new(None),
            active: Mutex::new(None),
        }
    }

    /// Subscribe to message-list snapshots. The receiver always holds the
    /// latest published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Message>>> {
        self.state.subscribe()
    }

    /// Subscribe to user-facing notifications (transport failures etc).
    pub fn notifications(&self) -> tokio::sync::broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    /// Current snapshot of the message list.
    pub fn messages(&self) -> Arc<Vec<Message>> {
        self.state.snapshot()
    }

    /// Submit a prompt and start streaming the assistant response.
    ///
    /// Appends the user message and a pending assistant placeholder, then
    /// returns the placeholder's id; the stream itself runs on a spawned
    /// task. A submission while a stream is still in flight auto-cancels the
    /// previous stream first, so its message completes with partial content
    /// preserved.
    ///
    /// Session-creation failure aborts the submission before any message is
    /// appended and is surfaced through the notification service.
    pub async fn submit(&self, prompt: &str, options: SubmitOptions) -> ChatResult<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ChatError::EmptyPrompt);
        }

        let session_id = self.ensure_session().await?;

        // Auto-cancel any stream still in flight for this session.
        let cancel = CancelToken::new();
        let previous = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(cancel.clone());
        if let Some(previous) = previous {
            if !previous.is_cancelled() {
                tracing::debug!("auto-cancelling previous in-flight stream");
                previous.cancel();
            }
        }

        self.state.append(Message::user(prompt));
        let placeholder = Message::assistant_placeholder();
        let message_id = placeholder.id.clone();
        self.state.append(placeholder);
        self.state.publish();

        let request = options.to_request(&session_id, prompt);

        let transport = Arc::clone(&self.transport);
        let state = Arc::clone(&self.state);
        let notifier = self.notifier.clone();
        let task_message_id = message_id.clone();
        tokio::spawn(async move {
            match transport.open_stream(&request).await {
                Ok(bytes) => {
                    tracing::debug!(session_id = %request.session_id, "stream opened");
                    let session =
                        StreamSession::new(request.session_id.clone(), task_message_id, cancel);
                    let reader = StreamReader::new(bytes, session.cancel.clone());
                    stream::run_stream(state, notifier, reader, session).await;
                }
                Err(err) => {
                    tracing::warn!(%err, "failed to open stream");
                    state.fail(&task_message_id);
                    state.publish();
                    notifier.error(format!("Failed to reach the model backend: {err}"));
                }
            }
        });

        Ok(message_id)
    }

    /// Cooperatively cancel the in-flight stream.
    ///
    /// Idempotent, and a no-op when no stream is in flight or the stream
    /// already reached a terminal state.
    pub fn cancel(&self) {
        let token = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(token) = token {
            tracing::debug!("cancel requested");
            token.cancel();
        }
    }

    async fn ensure_session(&self) -> ChatResult<String> {
        let mut guard = self.session_id.lock().await;
        if let Some(id) = guard.as_ref() {
            return Ok(id.clone());
        }
        match self.transport.create_session().await {
            Ok(id) => {
                tracing::info!(session_id = %id, "session created");
                *guard = Some(id.clone());
                Ok(id)
            }
            Err(err) => {
                tracing::warn!(%err, "session creation failed");
                self.notifier
                    .error(format!("Failed to start a conversation: {err}"));
                Err(err.into())
            }
        }
    }
}
