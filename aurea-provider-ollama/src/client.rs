//! Ollama API client struct and builder.

use std::future::Future;

use aurea_types::{ChatRequest, FragmentStream, Provider, ProviderError};

use crate::error::{map_http_status, map_reqwest_error};
use crate::streaming::stream_fragments;
use crate::types::{OllamaChunk, OllamaRequest};

/// Default model.
pub const DEFAULT_MODEL: &str = "gemma3:4b";

/// Default Ollama API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Client for the Ollama Chat API.
///
/// # Example
///
/// ```no_run
/// use aurea_provider_ollama::Ollama;
///
/// let client = Ollama::new()
///     .model("gemma3:4b")
///     .base_url("http://localhost:11434");
/// ```
#[derive(Debug, Clone)]
pub struct Ollama {
    /// Model identifier sent with every request.
    pub(crate) model: String,
    /// API base URL (override for testing or remote Ollama instances).
    pub(crate) base_url: String,
    /// Optional keep_alive duration string (e.g. "5m", "0" to unload).
    pub(crate) keep_alive: Option<String>,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl Ollama {
    /// Create a new client with defaults.
    ///
    /// Default model: `gemma3:4b`.
    /// Default base URL: `http://localhost:11434`.
    /// No authentication required (Ollama is local).
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            keep_alive: None,
            client: reqwest::Client::new(),
        }
    }

    /// Override the model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL. A trailing `/` is ignored.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the keep_alive duration for model memory residency.
    ///
    /// Examples: `"5m"` (keep for 5 minutes), `"0"` (unload immediately after request).
    /// When not set, Ollama uses its server default.
    #[must_use]
    pub fn keep_alive(mut self, duration: impl Into<String>) -> Self {
        self.keep_alive = Some(duration.into());
        self
    }

    /// Build the chat endpoint URL.
    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn request_body(&self, request: ChatRequest, stream: bool) -> OllamaRequest {
        OllamaRequest::single_turn(
            self.model.clone(),
            request.message,
            stream,
            self.keep_alive.clone(),
        )
    }
}

impl Default for Ollama {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for Ollama {
    /// Send a chat request with `stream: false` and return `message.content`.
    fn complete(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send {
        let url = self.chat_url();
        let body = self.request_body(request, false);
        let http_client = self.client.clone();

        async move {
            tracing::debug!(url = %url, model = %body.model, "sending chat request to Ollama");

            let response = http_client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            let response_text = response.text().await.map_err(map_reqwest_error)?;

            if !status.is_success() {
                return Err(map_http_status(status, &response_text));
            }

            let chunk: OllamaChunk = serde_json::from_str(&response_text)
                .map_err(|e| ProviderError::InvalidResponse(format!("invalid JSON response: {e}")))?;

            if let Some(error) = chunk.error {
                return Err(ProviderError::Upstream(error));
            }

            chunk
                .into_content()
                .ok_or_else(|| ProviderError::InvalidResponse("missing message.content".into()))
        }
    }

    /// Send a chat request with `stream: true`.
    ///
    /// Ollama streams NDJSON rather than SSE; the returned [`FragmentStream`]
    /// yields each non-empty `message.content`.
    fn complete_stream(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<FragmentStream, ProviderError>> + Send {
        let url = self.chat_url();
        let body = self.request_body(request, true);
        let http_client = self.client.clone();

        async move {
            tracing::debug!(url = %url, model = %body.model, "sending streaming chat request to Ollama");

            let response = http_client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            if !status.is_success() {
                let body_text = response.text().await.map_err(map_reqwest_error)?;
                return Err(map_http_status(status, &body_text));
            }

            Ok(stream_fragments(response))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_set() {
        let client = Ollama::new();
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[test]
    fn default_base_url_is_set() {
        let client = Ollama::new();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn builder_overrides_model() {
        let client = Ollama::new().model("mistral");
        assert_eq!(client.model, "mistral");
    }

    #[test]
    fn builder_overrides_base_url() {
        let client = Ollama::new().base_url("http://remote:11434");
        assert_eq!(client.base_url, "http://remote:11434");
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let client = Ollama::new().base_url("http://remote:11434/");
        assert_eq!(client.chat_url(), "http://remote:11434/api/chat");
    }

    #[test]
    fn builder_sets_keep_alive() {
        let client = Ollama::new().keep_alive("5m");
        assert_eq!(client.keep_alive, Some("5m".to_string()));
    }

    #[test]
    fn keep_alive_defaults_to_none() {
        let client = Ollama::new();
        assert!(client.keep_alive.is_none());
    }

    #[test]
    fn chat_url_includes_path() {
        let client = Ollama::new().base_url("http://localhost:9999");
        assert_eq!(client.chat_url(), "http://localhost:9999/api/chat");
    }

    #[test]
    fn request_body_is_single_user_turn() {
        let client = Ollama::new().model("llama3.2").keep_alive("0");
        let body = client.request_body(ChatRequest::new("hello"), true);
        assert_eq!(body.model, "llama3.2");
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].role, "user");
        assert_eq!(body.messages[0].content, "hello");
        assert!(body.stream);
        assert_eq!(body.keep_alive.as_deref(), Some("0"));
    }
}
