//! Turn lifecycle transitions
//!
//! Step-wise API used by the async driver and directly by callers that pump
//! bytes themselves. Every method taking a `turn_id` ignores the call when
//! that turn is no longer the active one.

use tokio_util::sync::CancellationToken;

use super::{SessionController, TurnHandle, TurnOutcome, TurnSession, TurnState};
use crate::chat::accumulator::MessageAccumulator;
use crate::chat::message::{ChatMessage, new_client_id};
use crate::chat::stream::NotificationParser;
use crate::error::ChatError;
use crate::transport::ThreadResponse;

impl SessionController {
    /// Start a new turn for a user message
    ///
    /// Any turn still in flight is cancelled first so its late bytes can no
    /// longer reach the message list. Appends the user message and the
    /// assistant placeholder.
    pub fn begin_turn(&mut self, text: impl Into<String>) -> TurnHandle {
        self.cancel_active();

        self.turn_counter = self.turn_counter.wrapping_add(1);
        let turn_id = self.turn_counter;

        self.conversation.push(ChatMessage::user(text));
        let placeholder_id = new_client_id();
        let accumulator = MessageAccumulator::begin(&mut self.conversation, placeholder_id.clone());

        let cancel = CancellationToken::new();
        self.active = Some(TurnSession {
            turn_id,
            cancel: cancel.clone(),
            parser: NotificationParser::new(),
            accumulator,
        });
        self.state = TurnState::Requesting;
        log::debug!("Turn {} started (placeholder {})", turn_id, placeholder_id);

        TurnHandle {
            turn_id,
            placeholder_id,
            cancel,
        }
    }

    /// Feed one body fragment of a streaming turn
    ///
    /// Returns the number of notifications applied. Fragments for inactive
    /// or cancelled turns are dropped.
    pub fn apply_fragment(&mut self, turn_id: u64, fragment: &[u8]) -> usize {
        if !self.check_active(turn_id) {
            log::debug!(
                "Dropping {} bytes for inactive turn {}",
                fragment.len(),
                turn_id
            );
            return 0;
        }
        let Some(session) = self.active.as_mut() else {
            return 0;
        };
        self.state = TurnState::Streaming;

        let mut applied = 0;
        for notification in session.parser.parse_chunk(fragment) {
            if session.cancel.is_cancelled() {
                break;
            }
            if session.accumulator.apply(&mut self.conversation, notification) {
                applied += 1;
            }
        }

        // Cancellation may have landed between notifications
        self.check_active(turn_id);
        applied
    }

    /// Single-shot path: apply a complete reply in one step
    ///
    /// The last message of the response is the assistant reply. The end
    /// state matches a streaming turn that received the same metadata and
    /// content.
    pub fn apply_response(&mut self, turn_id: u64, response: ThreadResponse) -> TurnOutcome {
        if !self.check_active(turn_id) {
            log::debug!("Dropping response for inactive turn {}", turn_id);
            return TurnOutcome::Cancelled;
        }
        let Some(reply) = response.messages.last() else {
            return self.fail_turn(
                turn_id,
                ChatError::Parse("response contained no messages".to_string()),
            );
        };
        let Some(session) = self.active.as_mut() else {
            return TurnOutcome::Cancelled;
        };

        session.accumulator.apply_metadata(
            &mut self.conversation,
            reply.message_id.clone(),
            &response.thread_id,
        );
        session
            .accumulator
            .apply_chunk(&mut self.conversation, &reply.content);

        self.complete_turn(turn_id)
    }

    /// End of stream: reconcile the placeholder id and go idle
    pub fn complete_turn(&mut self, turn_id: u64) -> TurnOutcome {
        if !self.check_active(turn_id) {
            return TurnOutcome::Cancelled;
        }
        let Some(mut session) = self.active.take() else {
            return TurnOutcome::Cancelled;
        };

        self.state = TurnState::Reconciling;
        session.parser.finish();
        let message_id = session.accumulator.finish(&mut self.conversation);
        self.state = TurnState::Idle;
        log::debug!("Turn {} completed as {}", turn_id, message_id);

        TurnOutcome::Completed { message_id }
    }

    /// Transport failure: keep the partial reply and append a notice
    pub fn fail_turn(&mut self, turn_id: u64, error: ChatError) -> TurnOutcome {
        if !self.check_active(turn_id) {
            log::debug!("Ignoring failure for inactive turn {}: {}", turn_id, error);
            return TurnOutcome::Cancelled;
        }
        let Some(session) = self.active.take() else {
            return TurnOutcome::Cancelled;
        };

        log::warn!("Turn {} failed: {}", turn_id, error);
        session.accumulator.finish(&mut self.conversation);
        self.conversation.push(ChatMessage::assistant(
            new_client_id(),
            format!("Sorry, something went wrong: {}", error),
        ));
        self.state = TurnState::Failed;

        TurnOutcome::Failed(error)
    }

    /// Cancel the active turn, if any
    ///
    /// The turn's messages stay exactly as they were; nothing else from it
    /// is applied. Returns true if a turn was cancelled.
    pub fn cancel_active(&mut self) -> bool {
        let Some(session) = self.active.take() else {
            return false;
        };
        session.cancel.cancel();
        self.state = TurnState::Cancelled;
        log::debug!("Turn {} cancelled", session.turn_id);
        true
    }

    /// Start over: cancel any turn, clear messages and the thread id
    pub fn new_conversation(&mut self) {
        self.cancel_active();
        self.conversation.clear();
        self.state = TurnState::Idle;
    }

    /// Replace the conversation with a persisted thread's history
    pub fn replace_history(&mut self, response: ThreadResponse) {
        self.cancel_active();
        self.conversation.clear();
        self.conversation.thread.adopt(&response.thread_id);
        self.conversation.messages = response
            .messages
            .iter()
            .map(|m| m.to_chat_message())
            .collect();
        self.state = TurnState::Idle;
    }

    /// True when `turn_id` may still mutate state
    ///
    /// A turn whose token was cancelled from outside (e.g. through a
    /// `TurnHandle`) is retired here, the first time anyone looks at it.
    pub(crate) fn check_active(&mut self, turn_id: u64) -> bool {
        let cancelled = match &self.active {
            Some(session) if session.turn_id == turn_id => session.cancel.is_cancelled(),
            _ => return false,
        };
        if cancelled {
            self.cancel_active();
        }
        !cancelled
    }
}
