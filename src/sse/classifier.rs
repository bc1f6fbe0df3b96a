//! Payload classification.
//!
//! A payload is parsed into exactly one semantic delta. Precedence is
//! authoritative for payloads that would satisfy more than one rule:
//! retrieval flag, then content, then thinking. A payload that is not valid
//! JSON is never dropped; it falls back to a content delta carrying the raw
//! text verbatim.

use serde::Deserialize;

use crate::models::RetrieveResult;

/// One classified increment from the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamDelta {
    /// Knowledge-base retrieval metadata for the in-flight message.
    Retrieval {
        kb_name: Option<String>,
        retrieves: Vec<RetrieveResult>,
    },
    /// Fragment of answer text (may contain embedded tags).
    Content(String),
    /// Fragment of out-of-band reasoning text.
    Thinking(String),
}

/// Structured form of a data payload. All fields optional; classification
/// decides which one wins.
#[derive(Debug, Deserialize)]
struct ChunkPayload {
    #[serde(default, rename = "retrieveMode")]
    retrieve_mode: bool,
    #[serde(default, rename = "kbName")]
    kb_name: Option<String>,
    #[serde(default)]
    retrieves: Vec<RetrieveResult>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    thinking: Option<String>,
}

/// Classify one payload string.
///
/// Returns `None` for a payload that parses as JSON but carries none of the
/// classified fields (nothing to apply). Unparseable payloads become literal
/// content.
pub fn classify_payload(payload: &str) -> Option<StreamDelta> {
    let parsed: ChunkPayload = match serde_json::from_str(payload) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::debug!(%err, "non-JSON payload, passing through as content");
            return Some(StreamDelta::Content(payload.to_string()));
        }
    };

    if parsed.retrieve_mode {
        return Some(StreamDelta::Retrieval {
            kb_name: parsed.kb_name,
            retrieves: parsed.retrieves,
        });
    }
    if let Some(content) = parsed.content.filter(|c| !c.is_empty()) {
        return Some(StreamDelta::Content(content));
    }
    if let Some(thinking) = parsed.thinking.filter(|t| !t.is_empty()) {
        return Some(StreamDelta::Thinking(thinking));
    }
    None
}
