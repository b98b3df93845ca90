//! dashchat - chat with the dashboard assistant about calendar, email,
//! drafts and meetings
//!
//! The library exposes the streaming chat core (`chat`), the server
//! transport (`transport`) and configuration loading (`config`).

pub mod chat;
pub mod config;
pub mod error;
pub mod transcript;
pub mod transport;

#[cfg(test)]
mod test_utils;

pub use chat::{ChatMessage, SessionController, TurnOutcome, TurnState};
pub use error::ChatError;
pub use transport::{ChatTransport, HttpTransport};
