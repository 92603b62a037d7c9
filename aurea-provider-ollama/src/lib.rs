#![deny(missing_docs)]
//! Ollama chat backend for the Aurea chat proxy.
//!
//! Implements [`aurea_types::Provider`] for Ollama's
//! [`/api/chat`](https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-chat-completion)
//! endpoint. Every request is a single user turn.
//!
//! # Usage
//!
//! ```no_run
//! use aurea_provider_ollama::Ollama;
//!
//! let provider = Ollama::new()
//!     .model("gemma3:4b")
//!     .base_url("http://localhost:11434");
//! ```
//!
//! - Non-streaming replies return `message.content` in one piece.
//! - Streaming replies are NDJSON (not SSE) and come back as a
//!   [`FragmentStream`](aurea_types::FragmentStream).
//! - HTTP status codes map to [`ProviderError`](aurea_types::ProviderError) variants.

pub mod client;
mod error;
mod streaming;
pub mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, Ollama};
