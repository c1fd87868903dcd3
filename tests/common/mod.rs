//! Helpers shared by the integration tests.
#![allow(dead_code)]

use std::io::Cursor;

use llamenu::console::PipedInput;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Scripted console input, one entry per line.
pub fn scripted(lines: &[&str]) -> PipedInput<Cursor<String>> {
    let mut text = lines.join("\n");
    text.push('\n');
    PipedInput::quiet(Cursor::new(text))
}

pub fn tag(name: &str, parameter_size: &str, size: u64) -> Value {
    json!({
        "name": name,
        "model": name,
        "modified_at": "2024-05-01T10:00:00Z",
        "size": size,
        "digest": "sha256:0000",
        "details": {
            "format": "gguf",
            "family": "llama",
            "parameter_size": parameter_size,
            "quantization_level": "Q4_0"
        }
    })
}

pub async fn mount_tags(server: &MockServer, models: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": models })))
        .mount(server)
        .await;
}

/// One NDJSON line of a chat stream.
pub fn chat_line(content: &str, done: bool) -> String {
    format!(
        "{}\n",
        json!({
            "model": "llama3",
            "created_at": "2024-05-01T10:00:00Z",
            "message": { "role": "assistant", "content": content },
            "done": done
        })
    )
}

/// A complete streamed reply made of `fragments`.
pub fn chat_body(fragments: &[&str]) -> String {
    let mut body: String = fragments.iter().map(|f| chat_line(f, false)).collect();
    body.push_str(&chat_line("", true));
    body
}

pub fn ndjson(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into().into_bytes(), "application/x-ndjson")
}

/// Console output with colour codes removed.
pub fn plain(out: Vec<u8>) -> String {
    let text = String::from_utf8(out).unwrap();
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            plain.push(c);
        }
    }
    plain
}
