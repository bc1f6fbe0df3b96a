//! Event-line recognition.
//!
//! The backend emits one event per line: `data: <payload>`. Anything else
//! (comments, keep-alives, blank lines) carries no payload and is ignored.
//! A payload equal to the `[DONE]` sentinel signals logical completion but
//! carries no content; physical end of stream is an equally valid
//! terminator.

/// Prefix marking an event line.
pub const EVENT_PREFIX: &str = "data:";

/// Termination sentinel payload.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Result of classifying one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// Event payload to classify further.
    Data(String),
    /// The `[DONE]` sentinel; produces no delta.
    Done,
    /// Comment, keep-alive, or blank line.
    Ignored,
}

/// Parse a single line from the stream.
pub fn parse_sse_line(line: &str) -> SseLine {
    let Some(rest) = line.strip_prefix(EVENT_PREFIX) else {
        return SseLine::Ignored;
    };
    let payload = rest.trim_start();
    if payload.trim_end() == DONE_SENTINEL {
        return SseLine::Done;
    }
    SseLine::Data(payload.to_string())
}
