//! Streaming ingestion pipeline.
//!
//! Data flows strictly downward, once per received chunk:
//! - `reader` - pulls transport bytes, boundary-safe text decoding,
//!   cancellation suspension point
//! - `framer` - reassembles decoded text into newline-delimited lines
//! - `parser` - recognizes `data:`-prefixed event lines and the `[DONE]`
//!   sentinel
//! - `classifier` - parses a payload into a [`StreamDelta`], with a raw-text
//!   fallback for non-conforming payloads
//! - `tags` - extracts in-band `<think>`/`<tool>` regions from accumulated
//!   content

mod classifier;
mod decode;
mod framer;
mod parser;
mod reader;
mod tags;

pub use classifier::{classify_payload, StreamDelta};
pub use decode::Utf8Decoder;
pub use framer::LineFramer;
pub use parser::{parse_sse_line, SseLine, DONE_SENTINEL, EVENT_PREFIX};
pub use reader::{ReadError, ReadEvent, StreamReader};
pub use tags::{extract_tags, TagExtraction};
