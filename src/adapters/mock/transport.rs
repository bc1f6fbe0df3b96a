//! Scripted transport for tests.
//!
//! Replays a fixed sequence of chunks (or errors) as the stream body, with
//! optional stalling at the end so cancellation paths can be exercised
//! deterministically.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt};

use crate::models::StreamRequest;
use crate::traits::transport::{ByteStream, StreamTransport, TransportError};

/// Test double implementing [`StreamTransport`] from a script.
pub struct MockTransport {
    chunks: Vec<Result<Bytes, TransportError>>,
    /// Never complete the stream after the scripted chunks; the reader stays
    /// suspended until cancelled.
    hang_after_chunks: bool,
    fail_session: Option<TransportError>,
    fail_open: Option<TransportError>,
    sessions_created: AtomicUsize,
    requests: Mutex<Vec<StreamRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            hang_after_chunks: false,
            fail_session: None,
            fail_open: None,
            sessions_created: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script the stream body from string chunks.
    pub fn with_chunks<I, S>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chunks = chunks
            .into_iter()
            .map(|c| Ok(Bytes::from(c.into())))
            .collect();
        self
    }

    /// Script the stream body from raw byte chunks (for mid-character
    /// splits).
    pub fn with_byte_chunks<I>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        self.chunks = chunks.into_iter().map(|c| Ok(Bytes::from(c))).collect();
        self
    }

    /// Append a read error after the scripted chunks.
    pub fn with_read_error(mut self, message: impl Into<String>) -> Self {
        self.chunks.push(Err(TransportError::Read(message.into())));
        self
    }

    /// Keep the stream open (pending) after the scripted chunks.
    pub fn hanging(mut self) -> Self {
        self.hang_after_chunks = true;
        self
    }

    /// Fail session creation.
    pub fn failing_session(mut self, message: impl Into<String>) -> Self {
        self.fail_session = Some(TransportError::SessionCreate(message.into()));
        self
    }

    /// Fail stream open.
    pub fn failing_open(mut self, message: impl Into<String>) -> Self {
        self.fail_open = Some(TransportError::Connect(message.into()));
        self
    }

    /// Number of sessions created so far.
    pub fn session_count(&self) -> usize {
        self.sessions_created.load(Ordering::SeqCst)
    }

    /// Requests passed to `open_stream`, in order.
    pub fn requests(&self) -> Vec<StreamRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StreamTransport for MockTransport {
    async fn create_session(&self) -> Result<String, TransportError> {
        if let Some(err) = &self.fail_session {
            return Err(err.clone());
        }
        let n = self.sessions_created.fetch_add(1, Ordering::SeqCst);
        Ok(format!("mock-session-{n}"))
    }

    async fn open_stream(&self, request: &StreamRequest) -> Result<ByteStream, TransportError> {
        if let Some(err) = &self.fail_open {
            return Err(err.clone());
        }
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let scripted = stream::iter(self.chunks.clone());
        if self.hang_after_chunks {
            Ok(Box::pin(scripted.chain(stream::pending())))
        } else {
            Ok(Box::pin(scripted))
        }
    }
}
