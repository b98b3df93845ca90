//! Streaming chat core
//!
//! Transport bytes flow one way: `stream` turns them into typed
//! notifications, `accumulator` folds those into the in-progress reply, and
//! `session` supervises the turn and owns all cross-turn state.

pub mod accumulator;
pub mod message;
pub mod session;
pub mod stream;

pub use accumulator::MessageAccumulator;
pub use message::{ChatMessage, Conversation, ConversationThread, Sender};
pub use session::{SessionController, TurnHandle, TurnOutcome, TurnState};
pub use stream::{NotificationParser, ParsedNotification, StreamFrame};
