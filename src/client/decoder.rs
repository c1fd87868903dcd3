use crate::client::types::ChatChunk;
use crate::error::ChatError;

/// Splits a streaming chat body into content fragments.
///
/// The body is newline-delimited JSON and network chunks can end anywhere,
/// including inside a multi-byte character, so bytes are buffered until a
/// full line is available.
#[derive(Default, Debug)]
pub struct ChunkDecoder {
    buffer: Vec<u8>,
    done: bool,
}

impl ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the stream has ended, either normally or with an error.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feeds raw bytes and returns every item completed by them, in order.
    /// A decode or server error is always the last item; the decoder
    /// ignores everything after it.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Vec<Result<String, ChatError>> {
        let mut items = Vec::new();
        if self.done || bytes.is_empty() {
            return items;
        }

        self.buffer.extend_from_slice(bytes);

        while let Some(newline_index) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_index).collect();
            self.process_line(&line, &mut items);

            if self.done {
                self.buffer.clear();
                break;
            }
        }

        items
    }

    /// Flushes a trailing line that arrived without a newline.
    pub fn finish(&mut self) -> Vec<Result<String, ChatError>> {
        let line = std::mem::take(&mut self.buffer);
        let mut items = Vec::new();
        if !self.done {
            self.process_line(&line, &mut items);
        }
        items
    }

    fn process_line(&mut self, raw: &[u8], items: &mut Vec<Result<String, ChatError>>) {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let chunk: ChatChunk = match serde_json::from_str(line) {
            Ok(chunk) => chunk,
            Err(source) => {
                self.done = true;
                items.push(Err(ChatError::Decode {
                    line: line.to_string(),
                    source,
                }));
                return;
            }
        };

        if let Some(error) = chunk.error {
            self.done = true;
            items.push(Err(ChatError::Server(error)));
            return;
        }

        if let Some(message) = chunk.message {
            if !message.content.is_empty() {
                items.push(Ok(message.content));
            }
        }

        if chunk.done {
            self.done = true;
        }
    }
}
