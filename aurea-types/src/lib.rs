#![deny(missing_docs)]
//! Shared types for the Aurea chat proxy.
//!
//! The browser client, the proxy endpoint and the model backend all speak in
//! terms of the types defined here:
//!
//! - [`Message`]: one entry in a conversation, authored by the user or the assistant.
//! - [`ChatRequest`] / [`ChatResponse`] / [`ErrorBody`]: the `POST /api/chat` wire format.
//! - [`Provider`]: the seam between the proxy and a model backend.
//! - [`FragmentStream`]: the pull-based sequence of assistant text fragments.

pub mod error;
pub mod provider;
pub mod types;

pub use error::ProviderError;
pub use provider::{FragmentStream, Provider};
pub use types::{ChatRequest, ChatResponse, ErrorBody, Message};
