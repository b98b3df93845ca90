//! HTTP transport for the dashboard chat API

use futures::StreamExt;

use super::{
    ChatTransport, SendMessageRequest, ThreadResponse, ThreadSummary, TurnResponse,
};
use crate::config::ServerConfig;
use crate::error::ChatError;

const STREAM_PATH: &str = "/chat/stream";
const CHAT_PATH: &str = "/chat";
const THREADS_PATH: &str = "/threads";

/// reqwest-backed `ChatTransport`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    streaming: bool,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>, streaming: bool) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_token: api_token.filter(|t| !t.trim().is_empty()),
            streaming,
        }
    }

    /// Build a transport from the `[server]` config section
    pub fn from_config(config: &ServerConfig) -> Result<Self, ChatError> {
        if config.base_url.trim().is_empty() {
            return Err(ChatError::NotConfigured(
                "Missing or empty base_url in [server] config".to_string(),
            ));
        }
        Ok(Self::new(
            config.base_url.clone(),
            config.api_token.clone(),
            config.streaming,
        ))
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn history_url(&self, thread_id: &str) -> String {
        self.url(&format!("{}/{}/messages", THREADS_PATH, thread_id))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Turn a non-success status into `ChatError::Api` with the body text
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ChatError::Api {
            code: status.as_u16(),
            message,
        })
    }
}

impl ChatTransport for HttpTransport {
    async fn send_message(
        &self,
        text: &str,
        thread_id: Option<&str>,
    ) -> Result<TurnResponse, ChatError> {
        let body = SendMessageRequest {
            message: text,
            thread_id,
        };
        let path = if self.streaming { STREAM_PATH } else { CHAT_PATH };
        log::debug!("POST {} (thread {:?})", path, thread_id);

        let response = self
            .authorize(self.client.post(self.url(path)))
            .json(&body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        if self.streaming {
            let stream = response.bytes_stream().map(|r| r.map_err(ChatError::from));
            Ok(TurnResponse::Stream(Box::pin(stream)))
        } else {
            Ok(TurnResponse::Complete(response.json().await?))
        }
    }

    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, ChatError> {
        let response = self
            .authorize(self.client.get(self.url(THREADS_PATH)))
            .send()
            .await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    async fn thread_history(&self, thread_id: &str) -> Result<ThreadResponse, ChatError> {
        let response = self
            .authorize(self.client.get(self.history_url(thread_id)))
            .send()
            .await?;
        Ok(Self::check_status(response).await?.json().await?)
    }
}
