//! Cancellable chunk reader over a transport byte stream.
//!
//! The reader is the pipeline's only suspension point: it waits for the next
//! transport chunk or end-of-stream, racing the stream's cancellation token.
//! Cancellation surfaces as a distinguishable [`ReadError::Cancelled`] so the
//! state machine can treat it differently from a transport failure.

use futures_util::StreamExt;
use thiserror::Error;

use crate::cancel::CancelToken;
use crate::sse::decode::Utf8Decoder;
use crate::traits::transport::{ByteStream, TransportError};

/// One successful read step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadEvent {
    /// Decoded text from one transport chunk (may be empty when the chunk
    /// ended mid multi-byte character).
    Chunk(String),
    /// Physical end of stream.
    End,
}

/// Read failures; cancellation is not a transport error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("stream cancelled")]
    Cancelled,
    #[error(transparent)]
    Transport(TransportError),
}

/// Pulls raw bytes from the transport and yields boundary-safe decoded text.
pub struct StreamReader {
    stream: ByteStream,
    decoder: Utf8Decoder,
    cancel: CancelToken,
    done: bool,
}

impl StreamReader {
    pub fn new(stream: ByteStream, cancel: CancelToken) -> Self {
        Self {
            stream,
            decoder: Utf8Decoder::new(),
            cancel,
            done: false,
        }
    }

    /// Await the next decoded chunk, end of stream, or interruption.
    ///
    /// An incomplete trailing byte sequence is carried into the next read;
    /// at physical end of stream a dangling carry is flushed as one final
    /// chunk before [`ReadEvent::End`].
    pub async fn next_chunk(&mut self) -> Result<ReadEvent, ReadError> {
        if self.done {
            return Ok(ReadEvent::End);
        }
        if self.cancel.is_cancelled() {
            return Err(ReadError::Cancelled);
        }

        tokio::select! {
            _ = self.cancel.cancelled() => Err(ReadError::Cancelled),
            next = self.stream.next() => match next {
                Some(Ok(bytes)) => Ok(ReadEvent::Chunk(self.decoder.decode(&bytes))),
                Some(Err(err)) => Err(ReadError::Transport(err)),
                None => {
                    self.done = true;
                    match self.decoder.finish() {
                        Some(tail) => Ok(ReadEvent::Chunk(tail)),
                        None => Ok(ReadEvent::End),
                    }
                }
            },
        }
    }
}
