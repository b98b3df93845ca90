//! Async turn driver
//!
//! Issues the transport request and pumps the response body through the
//! lifecycle API. One task drives everything: the only suspension points are
//! the request itself and each read of the next body fragment, and both race
//! against the turn's cancellation token.

use futures::StreamExt;

use super::{SessionController, TurnHandle, TurnOutcome};
use crate::chat::message::ChatMessage;
use crate::error::ChatError;
use crate::transport::{ByteStream, ChatTransport, TurnResponse};

impl SessionController {
    /// Run a full turn for `text`
    pub async fn run_turn<T: ChatTransport>(&mut self, transport: &T, text: &str) -> TurnOutcome {
        self.run_turn_with(transport, text, |_| {}).await
    }

    /// Run a full turn, calling `observer` with the in-progress reply after
    /// every fragment that changed it
    pub async fn run_turn_with<T, F>(&mut self, transport: &T, text: &str, observer: F) -> TurnOutcome
    where
        T: ChatTransport,
        F: FnMut(&ChatMessage),
    {
        let handle = self.begin_turn(text);
        self.drive_turn(transport, text, &handle, observer).await
    }

    /// Drive an already-begun turn to completion
    pub async fn drive_turn<T, F>(
        &mut self,
        transport: &T,
        text: &str,
        handle: &TurnHandle,
        observer: F,
    ) -> TurnOutcome
    where
        T: ChatTransport,
        F: FnMut(&ChatMessage),
    {
        let thread_id = self.thread_id().map(str::to_string);

        let response = tokio::select! {
            biased;
            _ = handle.cancel.cancelled() => {
                self.check_active(handle.turn_id);
                return TurnOutcome::Cancelled;
            }
            response = transport.send_message(text, thread_id.as_deref()) => response,
        };

        match response {
            Ok(TurnResponse::Stream(stream)) => self.pump(handle, stream, observer).await,
            Ok(TurnResponse::Complete(body)) => self.apply_response(handle.turn_id, body),
            Err(err) => self.fail_turn(handle.turn_id, err),
        }
    }

    async fn pump<F>(&mut self, handle: &TurnHandle, mut stream: ByteStream, mut observer: F) -> TurnOutcome
    where
        F: FnMut(&ChatMessage),
    {
        loop {
            tokio::select! {
                biased;
                _ = handle.cancel.cancelled() => {
                    self.check_active(handle.turn_id);
                    return TurnOutcome::Cancelled;
                }
                next = stream.next() => match next {
                    Some(Ok(fragment)) => {
                        let applied = self.apply_fragment(handle.turn_id, &fragment);
                        if !self.is_active(handle.turn_id) {
                            return TurnOutcome::Cancelled;
                        }
                        if applied > 0
                            && let Some(message) = self.in_progress()
                        {
                            observer(message);
                        }
                    }
                    Some(Err(err)) => return self.fail_turn(handle.turn_id, err),
                    None => return self.complete_turn(handle.turn_id),
                },
            }
        }
    }

    /// Load a persisted thread and make it the current conversation
    pub async fn load_thread<T: ChatTransport>(
        &mut self,
        transport: &T,
        thread_id: &str,
    ) -> Result<(), ChatError> {
        self.cancel_active();
        let history = transport.thread_history(thread_id).await?;
        log::debug!(
            "Loaded thread {} with {} messages",
            history.thread_id,
            history.messages.len()
        );
        self.replace_history(history);
        Ok(())
    }
}
