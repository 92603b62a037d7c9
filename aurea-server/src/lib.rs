#![deny(missing_docs)]
//! Aurea chat proxy.
//!
//! Serves a browser chat page and relays `POST /api/chat` to a model backend.
//! In [`ChatMode::Stream`] the reply is a `text/event-stream` body of
//! `data: <fragment>\n\n` frames; in [`ChatMode::Batch`] it is
//! `{ "response": ... }` or `{ "error": ... }`.
//!
//! ```no_run
//! # async fn run() -> Result<(), aurea_server::ServerError> {
//! use aurea_server::{AppState, ServerConfig};
//!
//! let config = ServerConfig::load()?;
//! let listener = tokio::net::TcpListener::bind(config.bind).await?;
//! aurea_server::serve(listener, AppState::from_config(&config)).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod sse;

use std::future::Future;
use std::sync::Arc;

use aurea_provider_ollama::Ollama;
use aurea_types::Provider;
use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{ChatMode, ServerConfig};
pub use error::{ConfigError, ServerError};

/// Shared, immutable per-server state.
#[derive(Debug)]
pub struct AppState<P> {
    /// Model backend.
    pub provider: P,
    /// Reply variant for `POST /api/chat`.
    pub mode: ChatMode,
}

impl AppState<Ollama> {
    /// State backed by the Ollama server described in `config`.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            provider: config.provider(),
            mode: config.mode,
        }
    }
}

/// Build the router.
pub fn router<P: Provider>(state: AppState<P>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/api/chat", post(routes::chat::<P>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve until the process is interrupted.
pub async fn serve<P: Provider>(
    listener: TcpListener,
    state: AppState<P>,
) -> Result<(), ServerError> {
    serve_with_shutdown(listener, state, shutdown_signal()).await
}

/// Serve until `shutdown` resolves.
pub async fn serve_with_shutdown<P: Provider>(
    listener: TcpListener,
    state: AppState<P>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
