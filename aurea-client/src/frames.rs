//! Incremental decoder for the proxy's `data: <fragment>\n\n` frames.
//!
//! The body is split on the `data: ` marker and newlines are stripped from
//! what lies between markers. Transport chunking is irrelevant: the text is
//! emitted as soon as it cannot be the start of a marker, so concatenating
//! every output gives the same result however the bytes were split.
//!
//! A failed upstream stream ends with one `data: Error: <reason>\n\n` frame.
//! A frame that starts like that is held until it ends. If another frame
//! follows it was an ordinary fragment. If the body ends there it is reported
//! in [`Tail::error`].

const MARKER: &str = "data: ";
const ERROR_PREFIX: &str = "Error: ";

/// Stateful `data:` frame decoder for one response body.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Bytes not yet decoded (an incomplete UTF-8 sequence).
    bytes: Vec<u8>,
    /// Decoded text not yet emitted.
    pending: String,
    /// Whether the first marker has been seen.
    started: bool,
    /// Whether the current frame might still be a terminal error frame.
    holding: bool,
    /// Cleaned text of the current frame, kept while `holding`.
    frame: String,
}

/// What is left at end of body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tail {
    /// Fragments not yet emitted.
    pub fragments: Vec<String>,
    /// Reason carried by a terminal `Error: ` frame.
    pub error: Option<String>,
}

impl FrameDecoder {
    /// A decoder at the start of a body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one body chunk and return the fragments it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.bytes.extend_from_slice(chunk);
        let text = self.take_decodable();
        self.pending.push_str(&text);
        self.drain()
    }

    /// Flush everything held back at end of body.
    pub fn finish(&mut self) -> Tail {
        if !self.bytes.is_empty() {
            let rest = String::from_utf8_lossy(&self.bytes).into_owned();
            self.bytes.clear();
            self.pending.push_str(&rest);
        }
        let mut fragments = self.drain();
        let rest = std::mem::take(&mut self.pending);
        if self.started {
            self.emit(&mut fragments, &rest);
        }

        let frame = std::mem::take(&mut self.frame);
        self.holding = false;
        let error = match frame.strip_prefix(ERROR_PREFIX) {
            Some(reason) => Some(reason.to_owned()),
            None => {
                if !frame.is_empty() {
                    fragments.push(frame);
                }
                None
            }
        };
        Tail { fragments, error }
    }

    /// Remove and return the longest decodable prefix of `bytes`.
    ///
    /// Invalid sequences become U+FFFD; an incomplete sequence at the end is
    /// kept for the next chunk.
    fn take_decodable(&mut self) -> String {
        let mut text = String::new();
        loop {
            match std::str::from_utf8(&self.bytes) {
                Ok(valid) => {
                    text.push_str(valid);
                    self.bytes.clear();
                    return text;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(&self.bytes[..valid_up_to]));
                    match e.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            self.bytes.drain(..valid_up_to + len);
                        }
                        None => {
                            self.bytes.drain(..valid_up_to);
                            return text;
                        }
                    }
                }
            }
        }
    }

    fn drain(&mut self) -> Vec<String> {
        let mut out = Vec::new();

        while let Some(idx) = self.pending.find(MARKER) {
            let text: String = self.pending.drain(..idx).collect();
            if self.started {
                self.emit(&mut out, &text);
                self.end_frame(&mut out);
            }
            self.pending.drain(..MARKER.len());
            self.started = true;
            self.holding = true;
        }

        let emit = self.pending.len() - held_marker_prefix(&self.pending);
        let text: String = self.pending.drain(..emit).collect();
        if self.started {
            self.emit(&mut out, &text);
        }
        out
    }

    /// Add text of the current frame, releasing it once it cannot be an error frame.
    fn emit(&mut self, out: &mut Vec<String>, text: &str) {
        let cleaned = clean(text);
        if cleaned.is_empty() {
            return;
        }
        if !self.holding {
            out.push(cleaned);
            return;
        }
        self.frame.push_str(&cleaned);
        if !could_be_error(&self.frame) {
            self.holding = false;
            out.push(std::mem::take(&mut self.frame));
        }
    }

    /// A marker followed the current frame, so it was not terminal.
    fn end_frame(&mut self, out: &mut Vec<String>) {
        if !self.frame.is_empty() {
            out.push(std::mem::take(&mut self.frame));
        }
    }
}

/// Length of the longest proper prefix of the marker that `text` ends with.
fn held_marker_prefix(text: &str) -> usize {
    (1..MARKER.len())
        .rev()
        .find(|&n| text.ends_with(&MARKER[..n]))
        .unwrap_or(0)
}

fn could_be_error(frame: &str) -> bool {
    frame.starts_with(ERROR_PREFIX) || ERROR_PREFIX.starts_with(frame)
}

fn clean(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}
