//! Feeding replies into a [`Conversation`].
//!
//! `on_update` is called after every change so a UI can re-render and scroll.

use futures::StreamExt;

use crate::client::{ChatClient, Reply};
use crate::conversation::Conversation;
use crate::error::ClientError;

/// Apply `reply` to the outstanding submission in `conversation`.
///
/// Each fragment is appended to the assistant placeholder. A stream error
/// ends the turn with [`Conversation::fail`] and is returned.
pub async fn consume(
    conversation: &mut Conversation,
    reply: Reply,
    mut on_update: impl FnMut(&Conversation),
) -> Result<(), ClientError> {
    match reply {
        Reply::Complete(text) => {
            conversation.receive(text);
            on_update(conversation);
            Ok(())
        }
        Reply::Stream(mut fragments) => {
            while let Some(item) = fragments.next().await {
                match item {
                    Ok(fragment) => {
                        conversation.append_fragment(&fragment);
                        on_update(conversation);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "reply stream failed");
                        conversation.fail();
                        on_update(conversation);
                        return Err(e);
                    }
                }
            }
            conversation.finish();
            on_update(conversation);
            Ok(())
        }
    }
}

/// Submit `text` and play the reply into `conversation`.
///
/// Returns `Ok(false)` when nothing was submitted (blank input, or a request
/// already outstanding). Failures leave the apology in the conversation and
/// are also returned.
pub async fn run_turn(
    client: &ChatClient,
    conversation: &mut Conversation,
    text: impl Into<String>,
    mut on_update: impl FnMut(&Conversation),
) -> Result<bool, ClientError> {
    conversation.set_input(text);
    let Some(message) = conversation.submit() else {
        return Ok(false);
    };
    on_update(conversation);

    let reply = match client.send(&message).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "chat request failed");
            conversation.fail();
            on_update(conversation);
            return Err(e);
        }
    };

    consume(conversation, reply, on_update).await?;
    Ok(true)
}
