//! NDJSON streaming support for the Ollama Chat API.
//!
//! Ollama emits one JSON object per line:
//! ```text
//! {"model":"gemma3:4b","message":{"role":"assistant","content":"Hello"},"done":false}
//! {"model":"gemma3:4b","message":{"role":"assistant","content":" world"},"done":false}
//! {"model":"gemma3:4b","message":{"role":"assistant","content":""},"done":true,"done_reason":"stop","eval_count":10,"prompt_eval_count":20}
//! ```
//!
//! Each non-empty `message.content` becomes one fragment. Lines that fail to
//! parse are logged and skipped.
//!
//! Reference: <https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-chat-completion>

use std::fmt::Display;

use aurea_types::{FragmentStream, ProviderError};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Response;

use crate::types::OllamaChunk;

/// Wrap an HTTP response body into a [`FragmentStream`].
pub(crate) fn stream_fragments(response: Response) -> FragmentStream {
    FragmentStream::from_stream(parse_ndjson_stream(response.bytes_stream()))
}

/// Parse a raw byte stream of NDJSON into content fragments.
///
/// Partial lines are buffered across byte chunks as raw bytes, so a UTF-8
/// sequence split between chunks decodes correctly. The stream ends when the
/// byte stream ends, on a read error, or on a backend-reported error.
pub(crate) fn parse_ndjson_stream<E>(
    byte_stream: impl Stream<Item = Result<Bytes, E>> + Send + 'static,
) -> impl Stream<Item = Result<String, ProviderError>> + Send + 'static
where
    E: Display + Send + 'static,
{
    async_stream::stream! {
        let mut bytes_stream = std::pin::pin!(byte_stream);
        let mut line_buf: Vec<u8> = Vec::new();
        let mut fragments = 0usize;
        let mut failed = false;

        'read: while let Some(chunk_result) = bytes_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    yield Err(ProviderError::StreamError(format!("stream read error: {e}")));
                    failed = true;
                    break 'read;
                }
            };

            line_buf.extend_from_slice(&chunk);

            while let Some(newline_pos) = line_buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = line_buf.drain(..=newline_pos).collect();
                match process_line(&line[..newline_pos]) {
                    LineOutcome::Fragment(text) => {
                        fragments += 1;
                        yield Ok(text);
                    }
                    LineOutcome::Skip => {}
                    LineOutcome::Failed(err) => {
                        yield Err(err);
                        failed = true;
                        break 'read;
                    }
                }
            }
        }

        if !failed {
            // Last line may arrive without a trailing newline.
            match process_line(&line_buf) {
                LineOutcome::Fragment(text) => {
                    fragments += 1;
                    yield Ok(text);
                }
                LineOutcome::Skip => {}
                LineOutcome::Failed(err) => {
                    yield Err(err);
                }
            }
            tracing::debug!(fragments, "Ollama stream ended");
        }
    }
}

/// What a single NDJSON line contributes to the fragment stream.
#[derive(Debug)]
enum LineOutcome {
    /// Non-empty assistant text.
    Fragment(String),
    /// Blank, malformed, or content-free line.
    Skip,
    /// The backend reported an error; the stream ends.
    Failed(ProviderError),
}

fn process_line(raw: &[u8]) -> LineOutcome {
    let line = match std::str::from_utf8(raw) {
        Ok(s) => s.trim(),
        Err(e) => {
            tracing::warn!(error = %e, "skipping NDJSON line with invalid UTF-8");
            return LineOutcome::Skip;
        }
    };

    if line.is_empty() {
        return LineOutcome::Skip;
    }

    let chunk: OllamaChunk = match serde_json::from_str(line) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, line, "skipping malformed NDJSON line");
            return LineOutcome::Skip;
        }
    };

    if let Some(error) = chunk.error {
        return LineOutcome::Failed(ProviderError::Upstream(error));
    }

    if chunk.done {
        tracing::debug!(
            model = chunk.model.as_deref().unwrap_or_default(),
            done_reason = chunk.done_reason.as_deref().unwrap_or_default(),
            eval_count = chunk.eval_count.unwrap_or(0),
            prompt_eval_count = chunk.prompt_eval_count.unwrap_or(0),
            "Ollama generation finished"
        );
    }

    match chunk.into_content() {
        Some(content) if !content.is_empty() => LineOutcome::Fragment(content),
        _ => LineOutcome::Skip,
    }
}
