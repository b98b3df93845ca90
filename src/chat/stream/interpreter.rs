//! Payload interpreter
//!
//! Maps a frame to one of a closed set of notifications. Bad payloads are
//! logged and degrade to `Unknown`; nothing here can fail a turn.

use serde::Deserialize;

use super::framer::StreamFrame;

const METADATA_EVENT: &str = "metadata";
const CHUNK_EVENT: &str = "chunk";

/// Typed notification handed to the message accumulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedNotification {
    /// Server identities for the conversation and the reply being streamed
    Metadata {
        thread_id: String,
        server_message_id: String,
    },
    /// Next piece of reply text
    Chunk { delta: String },
    /// Anything else; ignored
    Unknown,
}

#[derive(Deserialize)]
struct MetadataPayload {
    thread_id: String,
    message_id: String,
}

#[derive(Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    delta: Option<String>,
}

/// Interpret one frame
pub fn interpret(frame: &StreamFrame) -> ParsedNotification {
    match frame.event_name.as_deref() {
        Some(METADATA_EVENT) => match serde_json::from_str::<MetadataPayload>(&frame.payload) {
            Ok(meta) => ParsedNotification::Metadata {
                thread_id: meta.thread_id,
                server_message_id: meta.message_id,
            },
            Err(e) => {
                log::warn!("Dropping malformed metadata payload: {}", e);
                ParsedNotification::Unknown
            }
        },
        Some(CHUNK_EVENT) => match serde_json::from_str::<ChunkPayload>(&frame.payload) {
            Ok(ChunkPayload {
                delta: Some(delta),
            }) if !delta.is_empty() => ParsedNotification::Chunk { delta },
            Ok(_) => ParsedNotification::Unknown,
            Err(e) => {
                log::warn!("Dropping malformed chunk payload: {}", e);
                ParsedNotification::Unknown
            }
        },
        other => {
            log::debug!("Ignoring frame for event {:?}", other);
            ParsedNotification::Unknown
        }
    }
}

#[cfg(test)]
#[path = "interpreter_tests.rs"]
mod interpreter_tests;
