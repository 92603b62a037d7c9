#![deny(missing_docs)]
//! Client side of the Aurea chat proxy.
//!
//! The pieces are independent of any UI toolkit:
//!
//! - [`FrameDecoder`] turns the proxy's `data: <fragment>\n\n` body into
//!   fragments and spots a terminal `Error: ` frame.
//! - [`ChatClient`] sends `POST /api/chat` and returns a [`Reply`].
//! - [`Conversation`] holds the messages and the per-submission state machine.
//! - [`consume`] / [`run_turn`] feed a reply into a conversation, calling back
//!   after every change.
//!
//! ```no_run
//! # async fn demo() -> Result<(), aurea_client::ClientError> {
//! use aurea_client::{ChatClient, Conversation, run_turn};
//!
//! let client = ChatClient::new("http://127.0.0.1:3000");
//! let mut conversation = Conversation::new();
//! run_turn(&client, &mut conversation, "hello", |c| {
//!     println!("{:?}", c.messages().last());
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod conversation;
pub mod error;
pub mod frames;
pub mod render;

pub use client::{ChatClient, DEFAULT_URL, Fragments, Reply};
pub use conversation::{APOLOGY, Conversation, Phase};
pub use error::ClientError;
pub use frames::{FrameDecoder, Tail};
pub use render::{consume, run_turn};
