//! Frame decoder
//!
//! Turns arbitrarily split byte fragments into complete lines. Fragment
//! boundaries are never assumed to line up with line boundaries or with
//! UTF-8 character boundaries.

use memchr::memchr;

/// Incremental byte-to-line decoder
///
/// Holds back an incomplete UTF-8 sequence at the end of a fragment until
/// the next fragment completes it, and holds back an unterminated line until
/// its newline arrives.
#[derive(Debug, Default)]
pub struct LineDecoder {
    /// Undecoded bytes (at most one partial UTF-8 sequence)
    pending: Vec<u8>,
    /// Decoded text not yet terminated by a newline
    buffer: String,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a fragment and return every line it completes
    ///
    /// Lines are returned without their `\n` terminator (and without a
    /// preceding `\r`, so CRLF streams split the same way as LF streams).
    pub fn push(&mut self, fragment: &[u8]) -> Vec<String> {
        self.decode(fragment);

        let mut lines = Vec::new();
        while let Some(pos) = memchr(b'\n', self.buffer.as_bytes()) {
            let mut line: String = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            lines.push(line);
        }
        lines
    }

    /// Signal end of stream
    ///
    /// An unterminated trailing line is not a complete event and is dropped.
    pub fn finish(&mut self) {
        if !self.buffer.is_empty() || !self.pending.is_empty() {
            log::debug!(
                "Discarding {} bytes of unterminated trailing line",
                self.buffer.len() + self.pending.len()
            );
        }
        self.buffer.clear();
        self.pending.clear();
    }

    /// Bytes held back waiting for more input
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() + self.pending.len()
    }

    fn decode(&mut self, fragment: &[u8]) {
        self.pending.extend_from_slice(fragment);

        loop {
            let (valid, invalid_len) = match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    (self.pending.len(), None)
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    if let Ok(text) = std::str::from_utf8(&self.pending[..valid]) {
                        self.buffer.push_str(text);
                    }
                    (valid, err.error_len())
                }
            };

            match invalid_len {
                // Everything decoded, or only an incomplete sequence remains
                None => {
                    self.pending.drain(..valid);
                    return;
                }
                Some(len) => {
                    self.buffer.push(char::REPLACEMENT_CHARACTER);
                    self.pending.drain(..valid + len);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod decoder_tests;
