//! Boundary-safe streaming UTF-8 decoding.
//!
//! Transport chunks arrive at arbitrary byte offsets, so a multi-byte
//! character can be split across two reads. The decoder carries any
//! incomplete trailing sequence over to the next call; invalid interior
//! bytes are replaced with U+FFFD rather than aborting the stream.

/// Incremental UTF-8 decoder with a partial-sequence carry.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    carry: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk, prefixing any carried bytes from the previous call.
    ///
    /// An incomplete multi-byte sequence at the end of the combined input is
    /// retained for the next call instead of being emitted.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.carry);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut input = bytes.as_slice();
        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        // Invalid sequence mid-stream: substitute and move on.
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[len..];
                        }
                        // Incomplete trailing sequence: carry it over.
                        None => {
                            self.carry = rest.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush a dangling carry at end of stream.
    ///
    /// A truncated final sequence decodes lossily; returns `None` when there
    /// is nothing pending.
    pub fn finish(&mut self) -> Option<String> {
        if self.carry.is_empty() {
            return None;
        }
        let carry = std::mem::take(&mut self.carry);
        Some(String::from_utf8_lossy(&carry).into_owned())
    }

    /// Whether bytes are pending from an incomplete sequence.
    pub fn has_pending(&self) -> bool {
        !self.carry.is_empty()
    }
}
