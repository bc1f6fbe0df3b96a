//! Crate-level error types.
//!
//! Transport and read errors are defined next to the seams that produce them
//! ([`crate::traits::transport::TransportError`], [`crate::sse::ReadError`]);
//! this module provides the unified error the public surface returns.

use thiserror::Error;

use crate::traits::transport::TransportError;

/// Result alias for fallible kbchat operations.
pub type ChatResult<T> = Result<T, ChatError>;

/// Errors surfaced by the engine's public surface.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Submitted prompt was empty or whitespace-only.
    #[error("prompt is empty")]
    EmptyPrompt,

    /// The transport collaborator failed before any message was appended.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}
