//! Streaming response parsing
//!
//! Bytes → lines → frames → notifications. The pipeline is pure: it mutates
//! nothing outside itself, so the session controller is the only consumer
//! that touches the message list.

mod decoder;
mod framer;
mod interpreter;

pub use decoder::LineDecoder;
pub use framer::{EventFramer, StreamFrame};
pub use interpreter::{ParsedNotification, interpret};

/// Byte-fragment to notification parser
///
/// Carries the partial-line buffer and the pending event name across
/// fragments for a single response body. Create one per turn.
#[derive(Debug, Default)]
pub struct NotificationParser {
    decoder: LineDecoder,
    framer: EventFramer,
}

impl NotificationParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a fragment, returning notifications in arrival order
    ///
    /// `Unknown` notifications are filtered out; they carry nothing the
    /// accumulator can use.
    pub fn parse_chunk(&mut self, fragment: &[u8]) -> Vec<ParsedNotification> {
        self.decoder
            .push(fragment)
            .iter()
            .filter_map(|line| self.framer.push_line(line))
            .map(|frame| interpret(&frame))
            .filter(|n| *n != ParsedNotification::Unknown)
            .collect()
    }

    /// Signal end of body; an unterminated trailing line is discarded
    pub fn finish(&mut self) {
        self.decoder.finish();
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod stream_tests;
