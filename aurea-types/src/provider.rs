//! The model backend seam.
//!
//! [`Provider`] uses RPITIT (return-position `impl Trait` in traits) and is
//! not object-safe. Compose it with generics: the proxy is `AppState<P: Provider>`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};

use crate::error::ProviderError;
use crate::types::ChatRequest;

/// A model backend that answers single-turn chat requests.
pub trait Provider: Send + Sync + 'static {
    /// Send `request` and wait for the full reply text.
    fn complete(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;

    /// Send `request` and return the reply as a stream of fragments.
    ///
    /// Errors that happen before the first byte arrives are returned here;
    /// errors after that are yielded by the stream.
    fn complete_stream(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<FragmentStream, ProviderError>> + Send;
}

/// Ordered, finite sequence of assistant text fragments for one request.
///
/// Every `Ok` item is non-empty. An `Err` item ends the sequence: nothing is
/// yielded after it.
pub struct FragmentStream {
    /// The underlying stream. Consume with `StreamExt::next()`.
    pub receiver: Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>,
}

impl FragmentStream {
    /// Wrap any fragment stream.
    pub fn from_stream(
        stream: impl Stream<Item = Result<String, ProviderError>> + Send + 'static,
    ) -> Self {
        Self {
            receiver: Box::pin(stream),
        }
    }

    /// Drain the stream, concatenating every fragment.
    pub async fn collect_text(mut self) -> Result<String, ProviderError> {
        let mut text = String::new();
        while let Some(fragment) = self.next().await {
            text.push_str(&fragment?);
        }
        Ok(text)
    }
}

impl Stream for FragmentStream {
    type Item = Result<String, ProviderError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for FragmentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentStream").finish_non_exhaustive()
    }
}
