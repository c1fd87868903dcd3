//! `OllamaClient` against a mock model server.

mod common;

use futures::StreamExt;
use llamenu::catalog::format_model_details;
use llamenu::client::types::ChatMessage;
use llamenu::error::{CatalogError, ChatError};
use llamenu::OllamaClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{chat_body, chat_line, mount_tags, ndjson, tag};

#[tokio::test]
async fn test_list_models_parses_catalog() {
    let server = MockServer::start().await;
    mount_tags(
        &server,
        vec![
            tag("llama3:8b", "8.0B", 4_661_224_676),
            json!({
                "name": "foo",
                "size": 4_294_967_296u64,
                "details": { "family": "llama", "parameter_size": "7000000000", "quantization_level": "Q4" }
            }),
        ],
    )
    .await;

    let client = OllamaClient::new(format!("{}/", server.uri()));
    let models = client.list_models().await.unwrap();

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].name, "llama3:8b");
    assert_eq!(models[0].parameter_size, "8.0B");
    assert_eq!(models[0].size_bytes, 4_661_224_676);

    let formatted = format_model_details(&models[1]);
    assert_eq!(formatted.name, "foo");
    assert_eq!(formatted.family, "llama");
    assert_eq!(formatted.parameter_size, "6.52 GB");
    assert_eq!(formatted.quantization_level, "Q4");
    assert_eq!(formatted.size, "4.0 GB");
}

#[tokio::test]
async fn test_list_models_tolerates_missing_fields() {
    let server = MockServer::start().await;
    mount_tags(
        &server,
        vec![
            json!({ "name": "bare" }),
            json!({ "name": "numeric", "size": 1, "details": { "parameter_size": 7000000000u64 } }),
        ],
    )
    .await;

    let models = OllamaClient::new(server.uri()).list_models().await.unwrap();
    assert_eq!(models[0].family, "");
    assert_eq!(models[0].size_bytes, 0);
    assert_eq!(models[1].parameter_size, "7000000000");
}

#[tokio::test]
async fn test_list_models_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let models = OllamaClient::new(server.uri()).list_models().await.unwrap();
    assert!(models.is_empty());
}

#[tokio::test]
async fn test_list_models_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = OllamaClient::new(server.uri()).list_models().await.unwrap_err();
    assert!(matches!(err, CatalogError::Status(status) if status.as_u16() == 503));
}

#[tokio::test]
async fn test_list_models_bad_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = OllamaClient::new(server.uri()).list_models().await.unwrap_err();
    assert!(matches!(err, CatalogError::Decode(_)));
}

#[tokio::test]
async fn test_list_models_unreachable() {
    let err = OllamaClient::new("http://127.0.0.1:1").list_models().await.unwrap_err();
    assert!(matches!(err, CatalogError::Transport(_)));
}

#[tokio::test]
async fn test_chat_stream_sends_single_user_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3",
            "stream": true,
            "messages": [{ "role": "user", "content": "Why is the sky blue?" }]
        })))
        .respond_with(ndjson(chat_body(&["Rayleigh", " scattering", "."])))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri());
    let messages = [ChatMessage::user("Why is the sky blue?")];
    let fragments: Vec<String> = client
        .chat_stream("llama3", &messages)
        .map(|item| item.unwrap())
        .collect()
        .await;

    assert_eq!(fragments, vec!["Rayleigh", " scattering", "."]);
}

#[tokio::test]
async fn test_chat_stream_yields_fragments_before_error() {
    let server = MockServer::start().await;
    let body = format!("{}{}{{\"error\":\"out of memory\"}}\n", chat_line("one", false), chat_line("two", false));
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ndjson(body))
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri());
    let messages = [ChatMessage::user("hi")];
    let items: Vec<Result<String, ChatError>> = client.chat_stream("llama3", &messages).collect().await;

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_deref().unwrap(), "one");
    assert_eq!(items[1].as_deref().unwrap(), "two");
    assert!(matches!(&items[2], Err(ChatError::Server(msg)) if msg == "out of memory"));
}

#[tokio::test]
async fn test_chat_stream_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"error\":\"model 'nope' not found\"}"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri());
    let messages = [ChatMessage::user("hi")];
    let items: Vec<Result<String, ChatError>> = client.chat_stream("nope", &messages).collect().await;

    assert_eq!(items.len(), 1);
    match &items[0] {
        Err(ChatError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 404);
            assert!(body.contains("not found"));
        }
        other => panic!("unexpected item: {other:?}"),
    }
}
