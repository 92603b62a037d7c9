//! Client error type.

use thiserror::Error;

/// Errors talking to the proxy.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the body could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The proxy answered with an error status.
    #[error("server returned {status}: {error}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the reply, or the raw body.
        error: String,
    },

    /// The reply stream ended with an `Error: ` frame.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The proxy answered with a body that is neither a stream nor `{ response }`.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
