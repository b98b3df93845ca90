//! Tests for transport wire types and URL construction

use super::*;
use crate::config::ServerConfig;

#[test]
fn test_request_body_omits_missing_thread() {
    let body = SendMessageRequest {
        message: "hi",
        thread_id: None,
    };
    assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"message":"hi"}"#);
}

#[test]
fn test_request_body_includes_thread() {
    let body = SendMessageRequest {
        message: "hi",
        thread_id: Some("t1"),
    };
    assert_eq!(
        serde_json::to_string(&body).unwrap(),
        r#"{"message":"hi","thread_id":"t1"}"#
    );
}

#[test]
fn test_thread_response_decodes() {
    let json = r#"{
        "thread_id": "t1",
        "messages": [
            {"message_id": "u1", "thread_id": "t1", "user_id": "alice", "llm_generated": false,
             "content": "hi", "created_at": "2024-05-01T10:00:00Z"},
            {"message_id": "m1", "thread_id": "t1", "user_id": null, "llm_generated": true,
             "content": "Hello!", "created_at": "2024-05-01T10:00:02.123456"}
        ]
    }"#;

    let response: ThreadResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.thread_id, "t1");
    assert_eq!(response.messages.len(), 2);

    let reply = response.messages[1].to_chat_message();
    assert_eq!(reply.id, "m1");
    assert_eq!(reply.content, "Hello!");
    assert_eq!(reply.sender, Sender::Assistant);
    assert_eq!(response.messages[0].to_chat_message().sender, Sender::User);
}

#[test]
fn test_thread_summaries_decode_with_optional_fields() {
    let json = r#"[{"thread_id":"t1","title":"Standup","created_at":"2024-05-01T10:00:00Z"},{"thread_id":"t2"}]"#;
    let threads: Vec<ThreadSummary> = serde_json::from_str(json).unwrap();
    assert_eq!(threads[0].title.as_deref(), Some("Standup"));
    assert_eq!(threads[1].title, None);
}

#[test]
fn test_parse_timestamp_formats() {
    let rfc = parse_timestamp("2024-05-01T10:00:00+02:00").unwrap();
    assert_eq!(rfc.to_rfc3339(), "2024-05-01T08:00:00+00:00");

    let naive = parse_timestamp("2024-05-01T10:00:00.5").unwrap();
    assert_eq!(naive.timestamp(), rfc.timestamp() + 2 * 3600);

    assert!(parse_timestamp("yesterday").is_none());
}

#[test]
fn test_http_transport_urls() {
    let transport = HttpTransport::new("http://localhost:8000/api/", None, true);
    assert_eq!(transport.url("/chat"), "http://localhost:8000/api/chat");
    assert_eq!(
        transport.history_url("t1"),
        "http://localhost:8000/api/threads/t1/messages"
    );
    assert!(transport.is_streaming());
}

#[test]
fn test_http_transport_rejects_empty_base_url() {
    let config = ServerConfig {
        base_url: "  ".to_string(),
        ..ServerConfig::default()
    };
    assert!(matches!(
        HttpTransport::from_config(&config),
        Err(ChatError::NotConfigured(_))
    ));
}

#[test]
fn test_http_transport_from_config_respects_streaming_flag() {
    let config = ServerConfig {
        streaming: false,
        ..ServerConfig::default()
    };
    let transport = HttpTransport::from_config(&config).unwrap();
    assert!(!transport.is_streaming());
}
