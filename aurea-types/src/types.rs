//! Message and wire types.

use serde::{Deserialize, Serialize};

/// One message in a conversation.
///
/// Assistant messages start out empty and grow in place as fragments arrive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message text.
    pub text: String,
    /// Whether the user authored this message.
    pub is_user: bool,
}

impl Message {
    /// A user-authored message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
        }
    }

    /// An assistant-authored message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message, forwarded as a single-turn chat.
    pub message: String,
}

impl ChatRequest {
    /// Build a request for `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Successful non-streaming reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant's full reply.
    pub response: String,
}

/// Failure reply, returned with an error status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error text.
    pub error: String,
}
