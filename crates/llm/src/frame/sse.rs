//! Server-Sent Events framing (OpenAI-compatible backends).

use super::{Frame, LineBuffer};
use serde_json::Value;

/// Reassembles `data: ` lines into JSON fragments.
///
/// A payload that does not parse is held as pending and the next payload
/// (or continuation line) is appended before retrying. If the next payload
/// parses on its own the pending text is given up as leftover.
#[derive(Debug, Default)]
pub struct SseReassembler {
    lines: LineBuffer,
    pending: String,
    leftover: String,
    done: bool,
}

impl SseReassembler {
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
        frames
    }

    pub fn leftover(&self) -> &str {
        if self.pending.is_empty() {
            &self.leftover
        } else {
            &self.pending
        }
    }

    fn line(&mut self, line: &str, frames: &mut Vec<Frame>) {
        if self.done || line.is_empty() {
            return;
        }

        if let Some(payload) = line.strip_prefix("data:") {
            let payload = payload.strip_prefix(' ').unwrap_or(payload);
            self.data(payload, frames);
            return;
        }

        if !self.pending.is_empty() {
            self.pending.push_str(line);
            if let Ok(value) = serde_json::from_str::<Value>(&self.pending) {
                self.pending.clear();
                frames.push(Frame::Json(value));
            }
            return;
        }

        if is_field(line) {
            tracing::trace!("ignoring sse line: {line}");
        } else {
            tracing::debug!("stray sse line: {line}");
            self.keep(line);
        }
    }

    fn data(&mut self, payload: &str, frames: &mut Vec<Frame>) {
        if payload.trim() == "[DONE]" {
            if !self.pending.is_empty() {
                tracing::warn!("discarding unparsed sse data at [DONE]: {}", self.pending);
                let pending = std::mem::take(&mut self.pending);
                self.keep(&pending);
            }
            self.done = true;
            frames.push(Frame::Done);
            return;
        }

        if self.pending.is_empty() {
            match serde_json::from_str::<Value>(payload) {
                Ok(value) => frames.push(Frame::Json(value)),
                Err(e) if !payload.trim().is_empty() => {
                    tracing::debug!("incomplete sse data, buffering: {e}");
                    self.pending = payload.to_owned();
                }
                Err(_) => {}
            }
            return;
        }

        let combined = format!("{}{payload}", self.pending);
        if let Ok(value) = serde_json::from_str::<Value>(&combined) {
            self.pending.clear();
            frames.push(Frame::Json(value));
        } else if let Ok(value) = serde_json::from_str::<Value>(payload) {
            tracing::warn!("failed to parse chunk, data: {}", self.pending);
            let pending = std::mem::take(&mut self.pending);
            self.keep(&pending);
            frames.push(Frame::Json(value));
        } else {
            self.pending = combined;
        }
    }

    /// Lines kept for diagnostics, newline separated.
    fn keep(&mut self, text: &str) {
        if !self.leftover.is_empty() {
            self.leftover.push('\n');
        }
        self.leftover.push_str(text);
    }
}

/// Comments and non-data fields carry nothing we use.
fn is_field(line: &str) -> bool {
    line.starts_with(':')
        || line.starts_with("event:")
        || line.starts_with("id:")
        || line.starts_with("retry:")
}
