//! Event framer
//!
//! Classifies decoded lines into `event:` names and `data:` payloads. One
//! `data:` line produces one frame; multi-line payloads are not coalesced.

/// One named event payload reconstructed from the line stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame {
    pub event_name: Option<String>,
    pub payload: String,
}

/// Line classifier holding the pending event name
#[derive(Debug, Default)]
pub struct EventFramer {
    current_event: Option<String>,
}

impl EventFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line, returning a frame if the line carried a payload
    pub fn push_line(&mut self, line: &str) -> Option<StreamFrame> {
        if line.trim().is_empty() {
            // Blank line ends the current event's scope
            self.current_event = None;
            return None;
        }

        if let Some(name) = line.strip_prefix("event:") {
            self.current_event = Some(name.trim().to_string());
            return None;
        }

        if let Some(payload) = line.strip_prefix("data:") {
            return Some(StreamFrame {
                event_name: self.current_event.clone(),
                payload: payload.trim().to_string(),
            });
        }

        // id:, retry:, comments and anything else
        None
    }

    pub fn current_event(&self) -> Option<&str> {
        self.current_event.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_then_data_emits_named_frame() {
        let mut framer = EventFramer::new();
        assert_eq!(framer.push_line("event: chunk"), None);
        assert_eq!(framer.current_event(), Some("chunk"));

        let frame = framer.push_line("data: {\"delta\":\"hi\"}").unwrap();
        assert_eq!(frame.event_name.as_deref(), Some("chunk"));
        assert_eq!(frame.payload, "{\"delta\":\"hi\"}");
    }

    #[test]
    fn test_data_without_event_has_no_name() {
        let mut framer = EventFramer::new();
        let frame = framer.push_line("data: {}").unwrap();
        assert_eq!(frame.event_name, None);
    }

    #[test]
    fn test_blank_line_resets_event_name() {
        let mut framer = EventFramer::new();
        framer.push_line("event: metadata");
        assert_eq!(framer.push_line(""), None);
        assert_eq!(framer.current_event(), None);

        let frame = framer.push_line("data: {}").unwrap();
        assert_eq!(frame.event_name, None);
    }

    #[test]
    fn test_each_data_line_is_its_own_frame() {
        let mut framer = EventFramer::new();
        framer.push_line("event: chunk");
        let first = framer.push_line("data: one").unwrap();
        let second = framer.push_line("data: two").unwrap();
        assert_eq!(first.payload, "one");
        assert_eq!(second.payload, "two");
        assert_eq!(second.event_name.as_deref(), Some("chunk"));
    }

    #[test]
    fn test_prefix_without_space_is_accepted() {
        let mut framer = EventFramer::new();
        framer.push_line("event:chunk");
        let frame = framer.push_line("data:{}").unwrap();
        assert_eq!(frame.event_name.as_deref(), Some("chunk"));
        assert_eq!(frame.payload, "{}");
    }

    #[test]
    fn test_other_lines_are_ignored() {
        let mut framer = EventFramer::new();
        framer.push_line("event: chunk");
        assert_eq!(framer.push_line(": keep-alive"), None);
        assert_eq!(framer.push_line("id: 42"), None);
        assert_eq!(framer.current_event(), Some("chunk"));
    }
}
