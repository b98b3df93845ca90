use thiserror::Error;

/// Errors surfaced by the chat client
///
/// Decoding, framing and payload errors never appear here: those degrade to
/// ignored notifications inside the stream pipeline. Only transport-level
/// failures and configuration problems reach callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Client is missing something it needs to talk to the server
    #[error("Chat not configured: {0}")]
    NotConfigured(String),

    /// Connection failed or the body stream broke mid-read
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    /// A response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// The turn was superseded or cancelled by the user
    #[error("Request cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ChatError::Api {
                code: status.as_u16(),
                message: err.to_string(),
            },
            None if err.is_decode() => ChatError::Parse(err.to_string()),
            None => ChatError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        ChatError::Io(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
