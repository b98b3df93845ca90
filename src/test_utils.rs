#[cfg(test)]
pub mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use bytes::Bytes;
    use futures::StreamExt;

    use crate::error::ChatError;
    use crate::transport::{
        ChatTransport, ServerMessage, ThreadResponse, ThreadSummary, TurnResponse,
    };

    pub const SCENARIO_STREAM: &str = "event: metadata\ndata: {\"thread_id\":\"t1\",\"message_id\":\"m1\"}\n\nevent: chunk\ndata: {\"delta\":\"Hel\"}\n\nevent: chunk\ndata: {\"delta\":\"lo!\"}\n\n";

    /// Canned reply for one `send_message` call
    pub enum MockReply {
        /// Body fragments, then end of stream
        Stream(Vec<Result<Bytes, ChatError>>),
        /// Body fragments, then a body that never ends
        StreamThenHang(Vec<Result<Bytes, ChatError>>),
        Complete(ThreadResponse),
        Error(ChatError),
    }

    /// In-memory transport returning queued replies in order
    #[derive(Default)]
    pub struct MockTransport {
        replies: Mutex<VecDeque<MockReply>>,
        requests: Mutex<Vec<(String, Option<String>)>>,
        pub threads: Vec<ThreadSummary>,
        pub history: Option<ThreadResponse>,
    }

    impl MockTransport {
        pub fn with_replies(replies: Vec<MockReply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                ..Self::default()
            }
        }

        /// `(text, thread_id)` of every message sent so far
        pub fn requests(&self) -> Vec<(String, Option<String>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ChatTransport for MockTransport {
        async fn send_message(
            &self,
            text: &str,
            thread_id: Option<&str>,
        ) -> Result<TurnResponse, ChatError> {
            self.requests
                .lock()
                .unwrap()
                .push((text.to_string(), thread_id.map(str::to_string)));

            let reply = self.replies.lock().unwrap().pop_front();
            match reply {
                Some(MockReply::Stream(fragments)) => Ok(TurnResponse::Stream(Box::pin(
                    futures::stream::iter(fragments),
                ))),
                Some(MockReply::StreamThenHang(fragments)) => Ok(TurnResponse::Stream(Box::pin(
                    futures::stream::iter(fragments).chain(futures::stream::pending()),
                ))),
                Some(MockReply::Complete(body)) => Ok(TurnResponse::Complete(body)),
                Some(MockReply::Error(err)) => Err(err),
                None => Err(ChatError::Network("no reply queued".to_string())),
            }
        }

        async fn list_threads(&self) -> Result<Vec<ThreadSummary>, ChatError> {
            Ok(self.threads.clone())
        }

        async fn thread_history(&self, thread_id: &str) -> Result<ThreadResponse, ChatError> {
            self.history
                .clone()
                .filter(|h| h.thread_id == thread_id)
                .ok_or_else(|| ChatError::Api {
                    code: 404,
                    message: format!("thread {} not found", thread_id),
                })
        }
    }

    /// Split a body into fragments of `size` bytes
    pub fn fragments(body: &str, size: usize) -> Vec<Result<Bytes, ChatError>> {
        body.as_bytes()
            .chunks(size.max(1))
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect()
    }

    pub fn server_message(id: &str, thread_id: &str, llm_generated: bool, content: &str) -> ServerMessage {
        ServerMessage {
            message_id: id.to_string(),
            thread_id: thread_id.to_string(),
            user_id: Some("u".to_string()),
            llm_generated,
            content: content.to_string(),
            created_at: Some("2024-05-01T10:00:00Z".to_string()),
        }
    }

    /// Single-shot reply equivalent to `SCENARIO_STREAM`
    pub fn scenario_response() -> ThreadResponse {
        ThreadResponse {
            thread_id: "t1".to_string(),
            messages: vec![
                server_message("u1", "t1", false, "hi"),
                server_message("m1", "t1", true, "Hello!"),
            ],
        }
    }
}
