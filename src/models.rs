//! Core data models: conversation messages, retrieval results, and the
//! wire-level stream request.
//!
//! Message snapshots are serialized for the UI collaborator, so the wire
//! names follow the backend's camelCase convention (including its literal
//! `chunkIndexs` spelling, which we must match byte-for-byte).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed apology text shown when a stream fails for a non-cancellation
/// reason. Partial content accumulated before the failure is discarded.
pub const ERROR_APOLOGY: &str =
    "Sorry, something went wrong while generating a response. Please try again.";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Lifecycle status of a message.
///
/// `Pending -> Streaming -> {Success | Error | Cancelled}`; all terminal
/// states are absorbing. Cooperative cancellation lands in `Success` with
/// partial content preserved; `Cancelled` is kept for consumers that record
/// externally-cancelled history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Pending,
    Streaming,
    Success,
    Error,
    Cancelled,
}

impl MessageStatus {
    /// Terminal statuses absorb all further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MessageStatus::Success | MessageStatus::Error | MessageStatus::Cancelled
        )
    }
}

/// One knowledge-base retrieval hit attached to an assistant message.
/// Immutable once attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveResult {
    #[serde(rename = "docId")]
    pub doc_id: String,
    pub title: String,
    #[serde(rename = "kbId")]
    pub kb_id: i64,
    /// Backend sends this field as `chunkIndexs` (sic).
    #[serde(rename = "chunkIndexs")]
    pub chunk_indexes: Vec<String>,
}

/// A single conversation message.
///
/// For assistant messages, `content` is the raw accumulated text and only
/// grows until a terminal transition rewrites it (error path);
/// `display_content` is the tag-stripped view; `thinking` concatenates wire
/// thinking deltas and tag-extracted inner texts with no separator;
/// `tool_names` is deduplicated in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub display_content: String,
    #[serde(default)]
    pub thinking: Option<String>,
    #[serde(default)]
    pub tool_names: Vec<String>,
    #[serde(default)]
    pub retrieve_mode: bool,
    #[serde(default)]
    pub kb_name: Option<String>,
    #[serde(default)]
    pub retrieves: Vec<RetrieveResult>,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a completed user message.
    pub fn user(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            display_content: content.clone(),
            content,
            thinking: None,
            tool_names: Vec::new(),
            retrieve_mode: false,
            kb_name: None,
            retrieves: Vec::new(),
            status: MessageStatus::Success,
            created_at: Utc::now(),
        }
    }

    /// Create an empty assistant placeholder in `Pending`.
    pub fn assistant_placeholder() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: String::new(),
            display_content: String::new(),
            thinking: None,
            tool_names: Vec::new(),
            retrieve_mode: false,
            kb_name: None,
            retrieves: Vec::new(),
            status: MessageStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Wire-level request posted to the streaming endpoint by the transport
/// adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRequest {
    pub session_id: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default)]
    pub search_enabled: bool,
    #[serde(default)]
    pub rag_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kb_id: Option<i64>,
}

impl StreamRequest {
    /// Create a request with just a session and a prompt.
    pub fn new(session_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            prompt: prompt.into(),
            provider_id: None,
            model_name: None,
            search_enabled: false,
            rag_enabled: false,
            kb_id: None,
        }
    }

    pub fn with_model(mut self, provider_id: Option<String>, model_name: Option<String>) -> Self {
        self.provider_id = provider_id;
        self.model_name = model_name;
        self
    }

    pub fn with_search(mut self, enabled: bool) -> Self {
        self.search_enabled = enabled;
        self
    }

    pub fn with_knowledge_base(mut self, kb_id: Option<i64>) -> Self {
        self.rag_enabled = kb_id.is_some();
        self.kb_id = kb_id;
        self
    }
}

/// Model selection forwarded verbatim to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSelection {
    pub provider_id: Option<String>,
    pub model_name: Option<String>,
}

/// Knowledge-base selection enabling retrieval-augmented generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBaseSelection {
    pub kb_id: i64,
    pub kb_name: String,
}

/// Options accompanying a [`crate::engine::ChatEngine::submit`] call.
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    pub model: ModelSelection,
    pub search_enabled: bool,
    pub knowledge_base: Option<KnowledgeBaseSelection>,
}

impl SubmitOptions {
    /// Build the wire request for this submission.
    pub(crate) fn to_request(&self, session_id: &str, prompt: &str) -> StreamRequest {
        StreamRequest::new(session_id, prompt)
            .with_model(
                self.model.provider_id.clone(),
                self.model.model_name.clone(),
            )
            .with_search(self.search_enabled)
            .with_knowledge_base(self.knowledge_base.as_ref().map(|kb| kb.kb_id))
    }
}
