//! Conversation state for one chat session.
//!
//! Per submission the conversation moves through
//! `Idle → AwaitingResponse → (Streaming → Complete) | Error`.
//! Nothing here knows about HTTP or rendering; callers feed fragments in
//! and read [`Conversation::messages`] back out.

use aurea_types::Message;

/// Assistant message shown when a request fails.
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Where the current submission is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Request sent, no output yet.
    AwaitingResponse,
    /// At least one fragment has arrived.
    Streaming,
    /// The reply finished.
    Complete,
    /// The request failed and the apology was shown.
    Error,
}

/// Ordered messages plus the pending input line.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    input: String,
    phase: Phase,
    accumulated: String,
}

impl Conversation {
    /// An empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Current input text.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a request is outstanding.
    pub fn in_flight(&self) -> bool {
        matches!(self.phase, Phase::AwaitingResponse | Phase::Streaming)
    }

    /// Whether the loading indicator should show: a request is outstanding
    /// and no output has arrived yet.
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::AwaitingResponse
    }

    /// Whether the input field accepts typing.
    pub fn input_enabled(&self) -> bool {
        !self.is_loading()
    }

    /// Whether the empty-state logo should show.
    pub fn shows_logo(&self) -> bool {
        self.messages.is_empty()
    }

    /// Submit the current input.
    ///
    /// Returns the text to send, or `None` (changing nothing) when the input
    /// is blank or a request is already outstanding. On success the user
    /// message and an empty assistant placeholder are appended, in that
    /// order, and the input is cleared.
    pub fn submit(&mut self) -> Option<String> {
        if self.input.trim().is_empty() || self.in_flight() {
            return None;
        }
        let text = std::mem::take(&mut self.input);
        self.messages.push(Message::user(text.clone()));
        self.messages.push(Message::assistant(""));
        self.accumulated.clear();
        self.phase = Phase::AwaitingResponse;
        Some(text)
    }

    /// Append one streamed fragment to the assistant placeholder.
    ///
    /// Newlines are stripped. Ignored when no request is outstanding.
    pub fn append_fragment(&mut self, fragment: &str) {
        if !self.in_flight() {
            return;
        }
        self.accumulated
            .extend(fragment.chars().filter(|c| !matches!(c, '\n' | '\r')));
        if let Some(last) = self.messages.last_mut() {
            last.text.clone_from(&self.accumulated);
        }
        self.phase = Phase::Streaming;
    }

    /// Fill the placeholder with a whole non-streamed reply and finish.
    ///
    /// Ignored when no request is outstanding.
    pub fn receive(&mut self, text: impl Into<String>) {
        if !self.in_flight() {
            return;
        }
        let text = text.into();
        if let Some(last) = self.messages.last_mut() {
            last.text.clone_from(&text);
        }
        self.accumulated = text;
        self.phase = Phase::Complete;
    }

    /// Mark the reply finished.
    pub fn finish(&mut self) {
        if self.in_flight() {
            self.phase = Phase::Complete;
        }
    }

    /// Record a failed request.
    ///
    /// An empty assistant placeholder is removed; the apology is appended.
    pub fn fail(&mut self) {
        if self
            .messages
            .last()
            .is_some_and(|m| !m.is_user && m.text.is_empty())
        {
            self.messages.pop();
        }
        self.messages.push(Message::assistant(APOLOGY));
        self.phase = Phase::Error;
    }
}
