//! Message accumulator
//!
//! Owns the in-progress assistant reply for one turn: appends the
//! placeholder, grows its content chunk by chunk and swaps in the
//! server-issued id when the turn ends.

use super::message::{ChatMessage, Conversation};
use super::stream::ParsedNotification;

#[derive(Debug)]
pub struct MessageAccumulator {
    placeholder_id: String,
    server_message_id: Option<String>,
}

impl MessageAccumulator {
    /// Append an empty assistant placeholder to the conversation
    pub fn begin(conversation: &mut Conversation, placeholder_id: impl Into<String>) -> Self {
        let placeholder_id = placeholder_id.into();
        conversation.push(ChatMessage::assistant(placeholder_id.clone(), ""));
        Self {
            placeholder_id,
            server_message_id: None,
        }
    }

    pub fn placeholder_id(&self) -> &str {
        &self.placeholder_id
    }

    pub fn server_message_id(&self) -> Option<&str> {
        self.server_message_id.as_deref()
    }

    /// Dispatch a notification; returns false when it changed nothing
    pub fn apply(&mut self, conversation: &mut Conversation, notification: ParsedNotification) -> bool {
        match notification {
            ParsedNotification::Metadata {
                thread_id,
                server_message_id,
            } => self.apply_metadata(conversation, server_message_id, &thread_id),
            ParsedNotification::Chunk { delta } => self.apply_chunk(conversation, &delta),
            ParsedNotification::Unknown => false,
        }
    }

    /// Append reply text to the in-progress message
    pub fn apply_chunk(&self, conversation: &mut Conversation, delta: &str) -> bool {
        match conversation.message_mut(&self.placeholder_id) {
            Some(message) => {
                message.content.push_str(delta);
                true
            }
            None => {
                log::warn!(
                    "In-progress message {} is no longer in the conversation",
                    self.placeholder_id
                );
                false
            }
        }
    }

    /// Record server identities
    ///
    /// The message id is only remembered here; the visible message keeps its
    /// placeholder id until `finish` so nothing keyed on it changes while
    /// content is still arriving.
    pub fn apply_metadata(
        &mut self,
        conversation: &mut Conversation,
        server_message_id: String,
        thread_id: &str,
    ) -> bool {
        conversation.thread.adopt(thread_id);

        if let Some(existing) = &self.server_message_id {
            log::debug!(
                "Ignoring repeated metadata {} (already have {})",
                server_message_id,
                existing
            );
            return false;
        }
        self.server_message_id = Some(server_message_id);
        true
    }

    /// Reconcile the visible message's id and return its final id
    pub fn finish(self, conversation: &mut Conversation) -> String {
        let Some(server_id) = self.server_message_id else {
            log::debug!(
                "No metadata received, keeping placeholder id {}",
                self.placeholder_id
            );
            return self.placeholder_id;
        };

        match conversation.message_mut(&self.placeholder_id) {
            Some(message) => {
                message.id = server_id.clone();
                server_id
            }
            None => self.placeholder_id,
        }
    }
}

#[cfg(test)]
#[path = "accumulator_tests.rs"]
mod accumulator_tests;
