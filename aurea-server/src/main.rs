//! `aurea-server`: serve the chat page and relay `/api/chat` to Ollama.
//!
//! Configure with `AUREA_CONFIG` (TOML file) and `AUREA_*` overrides; see
//! [`aurea_server::config`]. Log verbosity follows `RUST_LOG`.

use aurea_server::{AppState, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load()?;
    let listener = tokio::net::TcpListener::bind(config.bind).await?;

    tracing::info!(
        addr = %listener.local_addr()?,
        upstream = %config.ollama_url,
        model = %config.model,
        mode = %config.mode,
        "aurea listening"
    );

    aurea_server::serve(listener, AppState::from_config(&config)).await?;
    Ok(())
}
