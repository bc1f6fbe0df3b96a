//! kbchat - streaming ingestion core for a knowledge-base chat client
//!
//! This library turns a live token stream from a generation backend into
//! consistent, incrementally updated conversation state. The surrounding
//! application (screens, rendering, settings) is an external collaborator:
//! it calls [`engine::ChatEngine::submit`] / [`engine::ChatEngine::cancel`]
//! and renders whatever message-list snapshots the engine publishes.

pub mod adapters;
pub mod cancel;
pub mod engine;
pub mod error;
pub mod models;
pub mod notify;
pub mod sse;
pub mod traits;

pub use cancel::CancelToken;
pub use engine::{ChatEngine, ConversationState};
pub use error::{ChatError, ChatResult};
pub use models::{Message, MessageStatus, RetrieveResult, Role, StreamRequest, SubmitOptions};
pub use notify::{Notification, NotificationLevel, Notifier};
