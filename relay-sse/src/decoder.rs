//! Blank-line-delimited event frame decoder.
//!
//! The proxy streams frames of the form:
//!
//! ```text
//! event: message
//! data: {"text":"Hel"}
//!
//! data: {"text":"lo"}
//!
//! event: done
//! data: {}
//!
//! ```
//!
//! Chunks handed to [`FrameDecoder::feed`] may split a frame, a line or the
//! blank line between frames anywhere; incomplete text stays buffered until
//! the rest arrives.

use serde_json::Value;

/// Event name used when a frame has no `event:` line.
pub const DEFAULT_EVENT: &str = "message";

/// Event name the proxy sends after the last delta.
pub const DONE_EVENT: &str = "done";

const EVENT_PREFIX: &str = "event:";
const DATA_PREFIX: &str = "data:";
const FRAME_DELIMITER: &str = "\n\n";

/// One decoded event.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Event name, trimmed. A frame with no `event:` line, or one whose
    /// value is empty or whitespace, is named [`DEFAULT_EVENT`]; an empty
    /// name is never produced.
    pub event: String,
    /// Parsed `data:` payload, or `{"text": <raw>}` when it was not JSON.
    pub payload: Value,
}

impl Frame {
    /// The incremental text carried by the payload's `text` field.
    ///
    /// Returns `""` when the field is missing or not a string.
    #[must_use]
    pub fn text_delta(&self) -> &str {
        self.payload
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Whether this is the stream's completion marker.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.event == DONE_EVENT
    }
}

/// Incremental frame decoder.
///
/// Each instance owns its pending buffer; use one decoder per response
/// body. Decoding never fails: unknown lines are skipped, frames without
/// data are dropped and non-JSON data is wrapped as `{"text": ...}`.
///
/// # Example
///
/// ```
/// use relay_sse::FrameDecoder;
///
/// let mut decoder = FrameDecoder::new();
/// let mut texts = Vec::new();
/// decoder.feed("data: {\"text\":\"He\"}\n", |f| texts.push(f.text_delta().to_owned()));
/// decoder.feed("\ndata: {\"text\":\"llo\"}\n\n", |f| texts.push(f.text_delta().to_owned()));
/// assert_eq!(texts, ["He", "llo"]);
/// ```
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: String,
}

impl FrameDecoder {
    /// Create a decoder with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` and invoke `on_frame` for every frame it completes,
    /// in arrival order.
    pub fn feed(&mut self, chunk: &str, mut on_frame: impl FnMut(Frame)) {
        self.push_normalized(chunk);

        let Some(last) = self.buffer.rfind(FRAME_DELIMITER) else {
            return;
        };
        let rest = self.buffer.split_off(last + FRAME_DELIMITER.len());
        let complete = std::mem::replace(&mut self.buffer, rest);

        for block in complete.split(FRAME_DELIMITER) {
            if let Some(frame) = parse_frame(block) {
                on_frame(frame);
            }
        }
    }

    /// Like [`feed`](Self::feed), collecting the completed frames.
    pub fn frames(&mut self, chunk: &str) -> Vec<Frame> {
        let mut out = Vec::new();
        self.feed(chunk, |frame| out.push(frame));
        out
    }

    /// Text received but not yet terminated by a blank line.
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Append `chunk` with CRLF folded to LF, including a CRLF whose CR
    /// ended the previous chunk.
    fn push_normalized(&mut self, chunk: &str) {
        if self.buffer.ends_with('\r') && chunk.starts_with('\n') {
            self.buffer.pop();
        }
        if chunk.contains('\r') {
            self.buffer.push_str(&chunk.replace("\r\n", "\n"));
        } else {
            self.buffer.push_str(chunk);
        }
    }
}

fn parse_frame(block: &str) -> Option<Frame> {
    let mut event: Option<&str> = None;
    let mut data = String::new();

    for line in block.split('\n') {
        let line = line.trim_end_matches('\r');
        if let Some(name) = line.strip_prefix(EVENT_PREFIX) {
            event = Some(name.trim());
        } else if let Some(value) = line.strip_prefix(DATA_PREFIX) {
            data.push_str(value.strip_prefix(' ').unwrap_or(value));
        }
        // Comments (":"), id:, retry: and anything else are skipped.
    }

    if data.is_empty() {
        return None;
    }

    let payload = match serde_json::from_str(&data) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, len = data.len(), "frame data is not JSON, wrapping as text");
            serde_json::json!({ "text": data })
        }
    };

    Some(Frame {
        event: event
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_EVENT)
            .to_string(),
        payload,
    })
}
