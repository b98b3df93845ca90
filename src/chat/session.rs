//! Session controller
//!
//! Orchestrates conversation turns: owns the conversation, the single active
//! `TurnSession` and its cancellation token. Every mutation coming from a
//! turn is checked against the active turn id first, so bytes that arrive
//! for a superseded turn are dropped instead of applied.

use tokio_util::sync::CancellationToken;

use super::accumulator::MessageAccumulator;
use super::message::{ChatMessage, Conversation};
use super::stream::NotificationParser;
use crate::error::ChatError;

mod driver;
mod lifecycle;

/// Turn lifecycle state
///
/// `Idle → Requesting → Streaming → Reconciling → Idle` on success.
/// `Cancelled` and `Failed` are where an interrupted turn comes to rest;
/// the next `begin_turn` leaves them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnState {
    #[default]
    Idle,
    Requesting,
    Streaming,
    Reconciling,
    Cancelled,
    Failed,
}

/// How a turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Reply finished; `message_id` is the server id when one was received,
    /// otherwise the placeholder id
    Completed { message_id: String },
    Cancelled,
    /// Transport failure; a notice was appended to the conversation
    Failed(ChatError),
}

/// Caller-side reference to a started turn
#[derive(Debug, Clone)]
pub struct TurnHandle {
    pub turn_id: u64,
    pub placeholder_id: String,
    cancel: CancellationToken,
}

impl TurnHandle {
    /// Request cancellation; takes effect at the next check
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Mutable state of the one in-flight turn
#[derive(Debug)]
pub(crate) struct TurnSession {
    pub(crate) turn_id: u64,
    pub(crate) cancel: CancellationToken,
    pub(crate) parser: NotificationParser,
    pub(crate) accumulator: MessageAccumulator,
}

/// Owner of the conversation and the active turn
#[derive(Debug, Default)]
pub struct SessionController {
    pub(crate) conversation: Conversation,
    pub(crate) active: Option<TurnSession>,
    pub(crate) state: TurnState,
    /// Incremented for every turn; identifies stale callbacks
    pub(crate) turn_counter: u64,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.conversation.messages
    }

    pub fn message(&self, id: &str) -> Option<&ChatMessage> {
        self.conversation.message(id)
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.conversation.thread.thread_id.as_deref()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn has_active_turn(&self) -> bool {
        self.active.is_some()
    }

    /// Whether `turn_id` is the turn currently allowed to mutate state
    pub fn is_active(&self, turn_id: u64) -> bool {
        self.active
            .as_ref()
            .is_some_and(|s| s.turn_id == turn_id && !s.cancel.is_cancelled())
    }

    /// The in-progress assistant message of the active turn
    pub fn in_progress(&self) -> Option<&ChatMessage> {
        let session = self.active.as_ref()?;
        self.conversation
            .message(session.accumulator.placeholder_id())
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(session) = &self.active {
            log::debug!("Controller dropped, cancelling turn {}", session.turn_id);
            session.cancel.cancel();
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
