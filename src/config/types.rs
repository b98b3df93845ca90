// Configuration type definitions

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Chat server connection section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as a bearer token when present
    #[serde(default)]
    pub api_token: Option<String>,
    /// Use the streaming endpoint; false falls back to single-shot requests
    #[serde(default = "default_streaming")]
    pub streaming: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_streaming() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            base_url: default_base_url(),
            api_token: None,
            streaming: default_streaming(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}
