//! Per-stream pump: chunks in, state transitions out.
//!
//! All parsing, classification, extraction, and state updates for a chunk
//! run to completion before the next read suspension; cancellation only
//! takes effect between chunks. Snapshot publishes are batched to at most
//! one per chunk, except the very first delta of a message, which publishes
//! immediately to clear the loading indicator.

use std::sync::Arc;

use crate::engine::session::StreamSession;
use crate::engine::state::ConversationState;
use crate::notify::Notifier;
use crate::sse::{classify_payload, parse_sse_line, ReadError, ReadEvent, SseLine, StreamReader};

pub(crate) async fn run_stream(
    state: Arc<ConversationState>,
    notifier: Notifier,
    mut reader: StreamReader,
    mut session: StreamSession,
) {
    loop {
        match reader.next_chunk().await {
            Ok(ReadEvent::Chunk(text)) => {
                let lines = session.framer.push(&text);
                let mut dirty = false;
                for line in lines {
                    dirty |= handle_line(&state, &mut session, &line);
                }
                if dirty {
                    state.publish();
                }
            }
            Ok(ReadEvent::End) => {
                // A trailing event without a terminating newline still counts.
                if let Some(line) = session.framer.finish() {
                    handle_line(&state, &mut session, &line);
                }
                state.complete(&session.message_id);
                state.publish();
                tracing::debug!(session_id = %session.session_id, "stream completed");
                break;
            }
            Err(ReadError::Cancelled) => {
                // Not a failure: keep partial content, land in success.
                state.complete(&session.message_id);
                state.publish();
                tracing::info!(session_id = %session.session_id, "stream cancelled");
                break;
            }
            Err(ReadError::Transport(err)) => {
                state.fail(&session.message_id);
                state.publish();
                tracing::warn!(session_id = %session.session_id, %err, "stream read failed");
                notifier.error(format!("The response stream failed: {err}"));
                break;
            }
        }
    }
}

/// Process one framed line. Returns true when the message changed and a
/// batched publish is still owed; the first delta publishes eagerly and
/// reports false.
fn handle_line(state: &ConversationState, session: &mut StreamSession, line: &str) -> bool {
    let payload = match parse_sse_line(line) {
        SseLine::Data(payload) => payload,
        SseLine::Done => {
            tracing::debug!(session_id = %session.session_id, "received [DONE] sentinel");
            return false;
        }
        SseLine::Ignored => return false,
    };

    let Some(delta) = classify_payload(&payload) else {
        return false;
    };

    let first = state.mark_streaming(&session.message_id);
    let changed = session.apply_delta(state, delta);
    if first {
        // Clear the loading indicator promptly, even mid-chunk.
        state.publish();
        return false;
    }
    changed
}
