//! Error types shared by providers and the proxy.

/// Errors from model backend operations.
///
/// The `Display` text is what callers see: it becomes the `error` field of a
/// failed non-streaming reply and the body of a streaming error frame.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Network-level error (connection refused, reset, DNS failure, etc.).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Backend is temporarily unavailable (5xx).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Malformed or rejected request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Requested model does not exist on the backend.
    #[error("model not found: {0}")]
    ModelNotFound(String),
    /// The backend replied with something that could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The backend reported an error in its reply body.
    #[error("backend error: {0}")]
    Upstream(String),
    /// Reading the response stream failed part way through.
    #[error("stream error: {0}")]
    StreamError(String),
}
