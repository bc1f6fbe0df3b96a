//! Transport trait abstraction.
//!
//! The backend is an external collaborator: it creates opaque session ids
//! and serves the streaming response body. Implementations include the
//! production reqwest-based adapter and scripted mocks for tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

use crate::models::StreamRequest;

/// Raw byte stream produced by a transport. Chunk boundaries are arbitrary
/// and may split multi-byte characters or in-band tags.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Errors raised by transport implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Session creation with the backend failed.
    #[error("session creation failed: {0}")]
    SessionCreate(String),

    /// Opening the stream failed before any bytes arrived.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Reading from an open stream failed.
    #[error("stream read failed: {0}")]
    Read(String),

    /// Server returned a non-success status.
    #[error("server error ({status}): {message}")]
    Status { status: u16, message: String },
}

/// Trait for the streaming backend collaborator.
#[async_trait]
pub trait StreamTransport: Send + Sync {
    /// Create a conversation session, returning an opaque server-assigned id.
    async fn create_session(&self) -> Result<String, TransportError>;

    /// Open the streaming response for one submission.
    async fn open_stream(&self, request: &StreamRequest) -> Result<ByteStream, TransportError>;
}
