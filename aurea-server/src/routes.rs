//! HTTP handlers.

use std::sync::Arc;

use aurea_types::{ChatRequest, ChatResponse, ErrorBody, Provider};
use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

use crate::{AppState, ChatMode, sse};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// `GET /`: the browser chat page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /health`.
pub async fn health() -> &'static str {
    "ok"
}

/// `POST /api/chat`.
///
/// The body is parsed leniently (no `Content-Type` requirement). A body that
/// is not `{ "message": string }` gets `400 { error }`.
pub async fn chat<P: Provider>(State(state): State<Arc<AppState<P>>>, body: Bytes) -> Response {
    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting malformed chat request");
            return error_response(StatusCode::BAD_REQUEST, format!("invalid request body: {e}"));
        }
    };

    tracing::debug!(mode = %state.mode, chars = request.message.len(), "chat request");

    match state.mode {
        ChatMode::Batch => complete(&state, request).await,
        ChatMode::Stream => stream(state, request),
    }
}

async fn complete<P: Provider>(state: &AppState<P>, request: ChatRequest) -> Response {
    match state.provider.complete(request).await {
        Ok(response) => Json(ChatResponse { response }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "chat completion failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn stream<P: Provider>(state: Arc<AppState<P>>, request: ChatRequest) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(sse::relay(state, request)),
    )
        .into_response()
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}
