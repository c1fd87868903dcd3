mod decoder;
pub mod types;

pub use decoder::ChunkDecoder;

use async_stream::stream;
use futures::{Stream, StreamExt};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::catalog::ModelSummary;
use crate::error::{CatalogError, ChatError};
use types::{ChatMessage, ChatRequest, TagsResponse};

/// HTTP client for a local model server.
///
/// Covers the two endpoints the menu needs: the installed model list and
/// the streaming chat call.
#[derive(Clone, Debug)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the installed models.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the server is unreachable, answers
    /// with a non-success status, or sends a body that is not a model list.
    pub async fn list_models(&self) -> Result<Vec<ModelSummary>, CatalogError> {
        let url = format!("{}/api/tags/", self.base_url);
        debug!("Requesting model list from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Model list request returned {}", status);
            return Err(CatalogError::Status(status));
        }

        let body = response.text().await?;
        let tags: TagsResponse = serde_json::from_str(&body)?;
        let models: Vec<ModelSummary> = tags.models.into_iter().map(ModelSummary::from).collect();
        info!("Fetched {} installed models", models.len());
        Ok(models)
    }

    /// Opens a streaming chat call and yields content fragments as they arrive.
    ///
    /// The stream is lazy: nothing is sent until it is first polled. It ends
    /// after the server's final chunk, or after yielding the first error.
    pub fn chat_stream<'a>(
        &'a self,
        model: &'a str,
        messages: &'a [ChatMessage],
    ) -> impl Stream<Item = Result<String, ChatError>> + 'a {
        let client = &self.client;
        let url = format!("{}/api/chat", self.base_url);

        stream! {
            let request = ChatRequest { model, messages, stream: true };
            info!("Starting chat stream with model {}", model);

            let response = match client.post(&url).json(&request).send().await {
                Ok(response) => response,
                Err(e) => {
                    yield Err(ChatError::Transport(e));
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                yield Err(ChatError::Status { status, body });
                return;
            }

            let mut decoder = ChunkDecoder::new();
            let mut byte_stream = response.bytes_stream();

            while let Some(chunk_result) = byte_stream.next().await {
                match chunk_result {
                    Ok(bytes) => {
                        for item in decoder.push_bytes(&bytes) {
                            yield item;
                        }
                        if decoder.is_done() {
                            break;
                        }
                    }
                    Err(e) => {
                        yield Err(ChatError::Transport(e));
                        return;
                    }
                }
            }

            for item in decoder.finish() {
                yield item;
            }
            debug!("Chat stream with model {} finished", model);
        }
    }
}
