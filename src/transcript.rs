//! Plain-text rendering of a conversation for the terminal client

use crate::chat::ChatMessage;
use crate::transport::ThreadSummary;

/// One line per message, `label: content`; continuation lines are indented
pub fn render_messages(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_message(message: &ChatMessage) -> String {
    let label = message.sender.label();
    let indent = " ".repeat(label.len() + 2);
    let body = message.content.trim_end().replace('\n', &format!("\n{}", indent));
    format!("{}: {}", label, body)
}

pub fn render_threads(threads: &[ThreadSummary]) -> String {
    threads
        .iter()
        .map(|t| {
            format!(
                "{}  {}  {}",
                t.thread_id,
                t.created_at.as_deref().unwrap_or("-"),
                t.title.as_deref().unwrap_or("(untitled)")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
