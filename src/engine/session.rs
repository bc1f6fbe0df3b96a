//! Per-submit stream session.
//!
//! One `StreamSession` exists per `submit()` call. It owns the transient
//! pipeline state: the line framer, the cancellation token, and the raw
//! accumulators that deltas are folded into. It is discarded when the stream
//! terminates, errors, or is cancelled.

use crate::cancel::CancelToken;
use crate::engine::state::ConversationState;
use crate::sse::{extract_tags, LineFramer, StreamDelta};

pub(crate) struct StreamSession {
    pub session_id: String,
    pub message_id: String,
    pub cancel: CancelToken,
    pub framer: LineFramer,
    /// Raw accumulated content text; only ever grows.
    raw_content: String,
    /// Thinking text carried by dedicated wire deltas (as opposed to
    /// tag-extracted thinking, which is recomputed from `raw_content`).
    wire_thinking: String,
    /// Cached tag-extracted thinking from the last content update.
    tag_thinking: String,
}

impl StreamSession {
    pub fn new(session_id: String, message_id: String, cancel: CancelToken) -> Self {
        Self {
            session_id,
            message_id,
            cancel,
            framer: LineFramer::new(),
            raw_content: String::new(),
            wire_thinking: String::new(),
            tag_thinking: String::new(),
        }
    }

    /// Fold one classified delta into the owning message.
    ///
    /// Content deltas re-run tag extraction over the full accumulated buffer,
    /// which keeps tags split across chunk boundaries correct. Returns true
    /// when the message changed.
    pub fn apply_delta(&mut self, state: &ConversationState, delta: StreamDelta) -> bool {
        match delta {
            StreamDelta::Content(text) => {
                self.raw_content.push_str(&text);
                let extraction = extract_tags(&self.raw_content);
                self.tag_thinking = extraction.thinking;
                let thinking = self.combined_thinking();
                let raw = self.raw_content.clone();
                state.update(&self.message_id, move |message| {
                    message.content = raw;
                    message.display_content = extraction.display;
                    message.thinking = thinking;
                    message.tool_names = extraction.tool_names;
                })
            }
            StreamDelta::Thinking(text) => {
                self.wire_thinking.push_str(&text);
                let thinking = self.combined_thinking();
                state.update(&self.message_id, move |message| {
                    message.thinking = thinking;
                })
            }
            StreamDelta::Retrieval { kb_name, retrieves } => {
                state.update(&self.message_id, move |message| {
                    message.retrieve_mode = true;
                    if kb_name.is_some() {
                        message.kb_name = kb_name;
                    }
                    message.retrieves = retrieves;
                })
            }
        }
    }

    /// Wire thinking deltas first, then tag-extracted inner texts, joined
    /// with no separator; `None` when both are empty.
    fn combined_thinking(&self) -> Option<String> {
        if self.wire_thinking.is_empty() && self.tag_thinking.is_empty() {
            return None;
        }
        Some(format!("{}{}", self.wire_thinking, self.tag_thinking))
    }
}
