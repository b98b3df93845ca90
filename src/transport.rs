//! Chat server transport
//!
//! The session controller only sees this trait. `HttpTransport` is the
//! production implementation; tests substitute an in-memory one.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, Sender};
use crate::error::ChatError;

mod http;

pub use http::HttpTransport;

/// Raw response body of a streaming turn
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ChatError>> + Send>>;

/// What the server handed back for one user message
pub enum TurnResponse {
    /// Event stream to be parsed incrementally
    Stream(ByteStream),
    /// Single-shot reply carrying the final state
    Complete(ThreadResponse),
}

impl std::fmt::Debug for TurnResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnResponse::Stream(_) => f.write_str("TurnResponse::Stream(..)"),
            TurnResponse::Complete(body) => f.debug_tuple("TurnResponse::Complete").field(body).finish(),
        }
    }
}

/// Request body for both chat endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessageRequest<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<&'a str>,
}

/// A persisted message as the server reports it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerMessage {
    pub message_id: String,
    pub thread_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub llm_generated: bool,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ServerMessage {
    /// Convert to a visible message, keeping the server id
    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage {
            id: self.message_id.clone(),
            content: self.content.clone(),
            sender: if self.llm_generated {
                Sender::Assistant
            } else {
                Sender::User
            },
            timestamp: self
                .created_at
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or_else(Utc::now),
        }
    }
}

/// Thread id plus its messages, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThreadResponse {
    pub thread_id: String,
    #[serde(default)]
    pub messages: Vec<ServerMessage>,
}

/// One entry of the thread list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThreadSummary {
    pub thread_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Accepts RFC 3339 as well as naive `YYYY-MM-DDTHH:MM:SS[.f]` (taken as UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Server operations the chat core depends on
pub trait ChatTransport {
    /// Send one user message, optionally continuing an existing thread
    fn send_message(
        &self,
        text: &str,
        thread_id: Option<&str>,
    ) -> impl Future<Output = Result<TurnResponse, ChatError>> + Send;

    fn list_threads(&self) -> impl Future<Output = Result<Vec<ThreadSummary>, ChatError>> + Send;

    /// Full history of a thread, same shape as a single-shot reply
    fn thread_history(
        &self,
        thread_id: &str,
    ) -> impl Future<Output = Result<ThreadResponse, ChatError>> + Send;
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod transport_tests;
