//! Newline framing across arbitrary chunk boundaries.
//!
//! Decoded text fragments are appended to a single buffer; complete lines
//! are split off as they become available and the remainder after the last
//! newline is retained for the next call. At stream end a non-empty
//! remainder is flushed as one final line, so a trailing event emitted
//! without a terminating newline is not lost.

/// Stateful line reassembler.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: String,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decoded fragment and drain every complete line.
    ///
    /// Lines are `\n`-delimited; a trailing `\r` is trimmed to tolerate
    /// CRLF framing.
    pub fn push(&mut self, fragment: &str) -> Vec<String> {
        self.buffer.push_str(fragment);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let rest = self.buffer.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.buffer, rest);
            line.truncate(line.len() - 1); // drop '\n'
            if line.ends_with('\r') {
                line.truncate(line.len() - 1);
            }
            lines.push(line);
        }
        lines
    }

    /// Flush the remainder at end of stream, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let mut line = std::mem::take(&mut self.buffer);
        if line.ends_with('\r') {
            line.truncate(line.len() - 1);
        }
        Some(line)
    }
}
