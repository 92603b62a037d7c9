//! HTTP client for `POST /api/chat`.

use std::pin::Pin;

use aurea_types::{ChatRequest, ChatResponse, ErrorBody};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::CONTENT_TYPE;

use crate::error::ClientError;
use crate::frames::FrameDecoder;

/// Default proxy URL.
pub const DEFAULT_URL: &str = "http://127.0.0.1:3000";

/// Fragments decoded from a streamed reply. An `Err` ends the sequence.
pub type Fragments = Pin<Box<dyn Stream<Item = Result<String, ClientError>> + Send>>;

/// A reply from the proxy.
pub enum Reply {
    /// `text/event-stream` reply, decoded into fragments.
    Stream(Fragments),
    /// Non-streaming `{ "response": ... }` reply.
    Complete(String),
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stream(_) => f.write_str("Reply::Stream(..)"),
            Self::Complete(text) => f.debug_tuple("Reply::Complete").field(text).finish(),
        }
    }
}

/// Client for the proxy.
///
/// ```no_run
/// use aurea_client::ChatClient;
///
/// let client = ChatClient::new("http://127.0.0.1:3000");
/// ```
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
    client: reqwest::Client,
}

impl ChatClient {
    /// Client for the proxy at `base_url`. A trailing `/` is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// The chat endpoint URL.
    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    /// Send `message`. Streamed replies come back before the body is read.
    pub async fn send(&self, message: &str) -> Result<Reply, ClientError> {
        let response = self
            .client
            .post(self.chat_url())
            .json(&ChatRequest::new(message))
            .send()
            .await?;

        let status = response.status();
        let streamed = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("text/event-stream"));

        if status.is_success() && streamed {
            return Ok(Reply::Stream(Box::pin(decode_frames(response.bytes_stream()))));
        }

        let text = response.text().await?;
        if !status.is_success() {
            let error = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(ClientError::Server {
                status: status.as_u16(),
                error,
            });
        }

        let body: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(Reply::Complete(body.response))
    }
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

fn decode_frames(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<String, ClientError>> + Send + 'static {
    async_stream::stream! {
        let mut bytes_stream = std::pin::pin!(byte_stream);
        let mut decoder = FrameDecoder::new();

        while let Some(chunk_result) = bytes_stream.next().await {
            match chunk_result {
                Ok(chunk) => {
                    for fragment in decoder.push(&chunk) {
                        yield Ok(fragment);
                    }
                }
                Err(e) => {
                    yield Err(ClientError::Network(e));
                    return;
                }
            }
        }

        let tail = decoder.finish();
        for fragment in tail.fragments {
            yield Ok(fragment);
        }
        if let Some(reason) = tail.error {
            yield Err(ClientError::Upstream(reason));
        }
    }
}
