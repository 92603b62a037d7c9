//! Internal error helpers for mapping HTTP/reqwest errors to [`ProviderError`].

use aurea_types::ProviderError;

/// Map an HTTP status code (from the Ollama API) to a [`ProviderError`].
///
/// Ollama reports failures as `{"error": "..."}`; when the body has that
/// shape only the message is kept.
///
/// Reference: <https://github.com/ollama/ollama/blob/main/docs/api.md>
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let message = error_message(body);
    match status.as_u16() {
        404 => ProviderError::ModelNotFound(message),
        400 => ProviderError::InvalidRequest(message),
        500..=599 => ProviderError::ServiceUnavailable(message),
        _ => ProviderError::InvalidRequest(format!("HTTP {status}: {message}")),
    }
}

/// Map a [`reqwest::Error`] to a [`ProviderError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    ProviderError::Network(Box::new(err))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
