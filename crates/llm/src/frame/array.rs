//! Bracketed JSON array framing (Gemini `streamGenerateContent`).

use super::{Frame, LineBuffer};
use serde_json::Value;

/// Reassembles a streamed, pretty-printed JSON array.
///
/// The opening `[` is stripped from the first line; every other line is
/// buffered until a line holding exactly `,` or `]` closes the element.
#[derive(Debug, Default)]
pub struct ArrayReassembler {
    lines: LineBuffer,
    buffer: String,
    leftover: String,
    started: bool,
}

impl ArrayReassembler {
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Frame> {
        let mut frames = Vec::new();
        for line in self.lines.push(bytes) {
            self.line(&line, &mut frames);
        }
        frames
    }

    pub fn finish(&mut self) -> Vec<Frame> {
        let mut frames = Vec::new();
        if let Some(rest) = self.lines.take_rest() {
            self.line(&rest, &mut frames);
        }

        let text = self.buffer.trim().to_owned();
        self.buffer.clear();
        if text.is_empty() {
            return frames;
        }

        if let Ok(value) = serde_json::from_str::<Value>(element(&text)) {
            frames.push(Frame::Json(value));
        } else if let Some(values) = as_array(&text) {
            frames.extend(values.into_iter().map(Frame::Json));
        } else {
            tracing::warn!("unterminated array element: {text}");
            self.leftover = text;
        }
        frames
    }

    pub fn leftover(&self) -> &str {
        if self.buffer.is_empty() {
            &self.leftover
        } else {
            &self.buffer
        }
    }

    fn line(&mut self, line: &str, frames: &mut Vec<Frame>) {
        let line = if self.started {
            line
        } else {
            self.started = true;
            line.trim_start().strip_prefix('[').unwrap_or(line)
        };

        if line != "," && line != "]" {
            self.buffer.push_str(line);
            self.buffer.push('\n');
            return;
        }

        let text = element(&self.buffer);
        if text.is_empty() {
            self.buffer.clear();
            return;
        }
        match serde_json::from_str::<Value>(text) {
            Ok(value) => {
                self.buffer.clear();
                frames.push(Frame::Json(value));
            }
            Err(e) => {
                // the separator belonged to the element, keep it
                tracing::debug!("array element incomplete at separator: {e}");
                self.buffer.push_str(line);
                self.buffer.push('\n');
            }
        }
    }
}

/// An element's text with surrounding separators removed.
fn element(text: &str) -> &str {
    text.trim().trim_matches(|c| c == ',' || c == ']').trim()
}

/// Parse a compact tail such as `{..},{..}]` as the rest of the array.
fn as_array(text: &str) -> Option<Vec<Value>> {
    let text = text.trim_start_matches(',');
    serde_json::from_str(&format!("[{text}"))
        .or_else(|_| serde_json::from_str(&format!("[{text}]")))
        .ok()
}
