//! Chat data model
//!
//! Messages, the conversation thread identity and the visible message list
//! that the session controller mutates.

use chrono::{DateTime, Utc};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "you",
            Sender::Assistant => "assistant",
        }
    }
}

/// One entry in the visible message list
///
/// Only `content` changes after creation, and only by appending while the
/// assistant reply is still streaming. The id changes once, when a
/// placeholder is reconciled to the server-issued id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: new_client_id(),
            content: content.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            sender: Sender::Assistant,
            timestamp: Utc::now(),
        }
    }
}

/// Generate a client-side message id
pub fn new_client_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Server-side conversation identity
///
/// `None` until the first turn completes; stable afterwards until the user
/// explicitly starts a new conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationThread {
    pub thread_id: Option<String>,
}

impl ConversationThread {
    /// Adopt a server-issued thread id if none is set yet
    ///
    /// Returns true when the id was adopted.
    pub fn adopt(&mut self, thread_id: &str) -> bool {
        match &self.thread_id {
            None => {
                self.thread_id = Some(thread_id.to_string());
                true
            }
            Some(current) if current == thread_id => false,
            Some(current) => {
                log::warn!(
                    "Ignoring thread id {} for conversation already bound to {}",
                    thread_id,
                    current
                );
                false
            }
        }
    }

    pub fn reset(&mut self) {
        self.thread_id = None;
    }
}

/// The observable state: thread identity plus the visible message list
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    pub thread: ConversationThread,
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a message by id, newest first
    pub fn message_mut(&mut self, id: &str) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().rev().find(|m| m.id == id)
    }

    pub fn message(&self, id: &str) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.id == id)
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.thread.reset();
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adopt_sets_thread_id_once() {
        let mut thread = ConversationThread::default();
        assert!(thread.adopt("t1"));
        assert!(!thread.adopt("t1"));
        assert!(!thread.adopt("t2"));
        assert_eq!(thread.thread_id.as_deref(), Some("t1"));
    }

    #[test]
    fn test_reset_allows_new_thread() {
        let mut thread = ConversationThread::default();
        thread.adopt("t1");
        thread.reset();
        assert!(thread.adopt("t2"));
        assert_eq!(thread.thread_id.as_deref(), Some("t2"));
    }

    #[test]
    fn test_client_ids_are_unique() {
        assert_ne!(ChatMessage::user("a").id, ChatMessage::user("a").id);
    }

    #[test]
    fn test_message_mut_finds_newest_match() {
        let mut conversation = Conversation::new();
        conversation.push(ChatMessage::assistant("dup", "old"));
        conversation.push(ChatMessage::assistant("dup", "new"));
        conversation.message_mut("dup").unwrap().content.push('!');
        assert_eq!(conversation.messages[0].content, "old");
        assert_eq!(conversation.messages[1].content, "new!");
    }
}
