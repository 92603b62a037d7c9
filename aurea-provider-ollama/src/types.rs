//! Ollama `/api/chat` request/response types.
//!
//! The same [`OllamaChunk`] shape covers both the single non-streaming reply
//! and each line of the NDJSON stream:
//! ```text
//! {"model":"gemma3:4b","message":{"role":"assistant","content":"Hi"},"done":false}
//! ```

use serde::{Deserialize, Serialize};

/// Ollama `/api/chat` request body.
#[derive(Debug, Serialize)]
pub struct OllamaRequest {
    /// Model identifier (e.g. "gemma3:4b").
    pub model: String,
    /// Conversation messages. Always a single user turn here.
    pub messages: Vec<OllamaMessage>,
    /// Whether the backend should stream NDJSON.
    pub stream: bool,
    /// How long to keep the model loaded in memory (e.g. "5m", "0").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

impl OllamaRequest {
    /// A single-turn user request.
    pub fn single_turn(
        model: impl Into<String>,
        content: impl Into<String>,
        stream: bool,
        keep_alive: Option<String>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![OllamaMessage {
                role: "user".into(),
                content: content.into(),
            }],
            stream,
            keep_alive,
        }
    }
}

/// A message in the Ollama `/api/chat` format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaMessage {
    /// Role: "system", "user" or "assistant".
    pub role: String,
    /// Message text content.
    pub content: String,
}

/// One Ollama reply object: the whole non-streaming body, or one NDJSON line.
#[derive(Debug, Default, Deserialize)]
pub struct OllamaChunk {
    /// Model that produced the chunk.
    #[serde(default)]
    pub model: Option<String>,
    /// Partial (streaming) or full (non-streaming) assistant message.
    #[serde(default)]
    pub message: Option<OllamaChunkMessage>,
    /// `true` on the last object of a reply.
    #[serde(default)]
    pub done: bool,
    /// Why generation stopped, present when `done` is true.
    #[serde(default)]
    pub done_reason: Option<String>,
    /// Output token count, present when `done` is true.
    #[serde(default)]
    pub eval_count: Option<u64>,
    /// Prompt token count, present when `done` is true.
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    /// Error reported by the backend instead of a message.
    #[serde(default)]
    pub error: Option<String>,
}

/// The `message` object inside an [`OllamaChunk`].
#[derive(Debug, Default, Deserialize)]
pub struct OllamaChunkMessage {
    /// Role of the author, normally "assistant".
    #[serde(default)]
    pub role: Option<String>,
    /// Text content of this chunk.
    #[serde(default)]
    pub content: Option<String>,
}

impl OllamaChunk {
    /// Take the `message.content` field, if present.
    pub fn into_content(self) -> Option<String> {
        self.message?.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_turn_request_shape() {
        let req = OllamaRequest::single_turn("gemma3:4b", "hello", true, None);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gemma3:4b",
                "messages": [{ "role": "user", "content": "hello" }],
                "stream": true
            })
        );
    }

    #[test]
    fn keep_alive_serialized_when_set() {
        let req = OllamaRequest::single_turn("m", "x", false, Some("5m".into()));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["keep_alive"], "5m");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn chunk_parses_final_line() {
        let chunk: OllamaChunk = serde_json::from_str(
            r#"{"model":"gemma3:4b","message":{"role":"assistant","content":""},"done":true,"done_reason":"stop","eval_count":10,"prompt_eval_count":20}"#,
        )
        .unwrap();
        assert!(chunk.done);
        assert_eq!(chunk.eval_count, Some(10));
        assert_eq!(chunk.prompt_eval_count, Some(20));
        assert_eq!(chunk.done_reason.as_deref(), Some("stop"));
        assert_eq!(chunk.into_content().as_deref(), Some(""));
    }

    #[test]
    fn chunk_without_message_has_no_content() {
        let chunk: OllamaChunk = serde_json::from_str(r#"{"error":"model not found"}"#).unwrap();
        assert_eq!(chunk.error.as_deref(), Some("model not found"));
        assert!(chunk.into_content().is_none());
    }
}
