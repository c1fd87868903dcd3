use serde::{Deserialize, Serialize};

/// Body of `GET /api/tags/`
#[derive(Deserialize, Debug, Default)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

/// One installed model as reported by the server
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ModelTag {
    #[serde(default)]
    pub name: String,
    /// Size on disk in bytes
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub details: ModelTagDetails,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ModelTagDetails {
    #[serde(default)]
    pub family: String,
    /// Either a byte count or a label such as "7B"; some servers send a number
    #[serde(default, deserialize_with = "string_or_number")]
    pub parameter_size: String,
    #[serde(default)]
    pub quantization_level: String,
}

/// A single chat message
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST /api/chat`
#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub stream: bool,
}

/// One NDJSON line of a streaming chat response
#[derive(Deserialize, Debug)]
pub struct ChatChunk {
    #[serde(default)]
    pub message: Option<ChatMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
