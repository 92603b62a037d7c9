//! `data:` frame encoding and the fragment relay.
//!
//! Frames are written by hand rather than with `axum::response::sse`: the
//! fragment goes out verbatim as `data: <fragment>\n\n`, even when it holds
//! newlines, and the client strips them on its side.

use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

use aurea_types::{ChatRequest, Provider};
use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::AppState;

/// Encode one fragment frame.
pub fn frame(text: &str) -> Bytes {
    Bytes::from(format!("data: {text}\n\n"))
}

/// Encode the terminal error frame.
pub fn error_frame(err: &dyn Display) -> Bytes {
    frame(&format!("Error: {err}"))
}

/// Open the upstream stream for `request` and relay it as frames.
///
/// Always ends normally. Failures become one final error frame.
pub fn relay<P: Provider>(
    state: Arc<AppState<P>>,
    request: ChatRequest,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    async_stream::stream! {
        let mut fragments = match state.provider.complete_stream(request).await {
            Ok(fragments) => fragments,
            Err(e) => {
                tracing::error!(error = %e, "failed to open upstream stream");
                yield Ok::<_, Infallible>(error_frame(&e));
                return;
            }
        };

        let mut sent = 0usize;
        while let Some(item) = fragments.next().await {
            match item {
                Ok(fragment) => {
                    sent += 1;
                    yield Ok::<_, Infallible>(frame(&fragment));
                }
                Err(e) => {
                    tracing::error!(error = %e, frames = sent, "upstream stream failed");
                    yield Ok::<_, Infallible>(error_frame(&e));
                    return;
                }
            }
        }

        tracing::debug!(frames = sent, "chat stream complete");
    }
}
