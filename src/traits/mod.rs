//! Trait abstractions for external collaborators.
//!
//! The streaming core never talks to a backend directly; it goes through
//! [`transport::StreamTransport`], enabling dependency injection and mocking
//! in tests.

pub mod transport;

pub use transport::{ByteStream, StreamTransport, TransportError};
