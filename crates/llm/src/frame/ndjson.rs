//! Newline-delimited JSON framing (Ollama).

use super::{Frame, LineBuffer};
use serde_json::Value;

/// One JSON document per line. Malformed lines are skipped and kept as
/// the leftover.
#[derive(Debug, Default)]
pub struct NdjsonReassembler {
    lines: LineBuffer,
    leftover: String,
}

impl NdjsonReassembler {
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
        &self.leftover
    }

    fn line(&mut self, line: &str, frames: &mut Vec<Frame>) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(value) => frames.push(Frame::Json(value)),
            Err(e) => {
                tracing::warn!("failed to parse chunk: {e}, data: {line}");
                self.leftover = line.to_owned();
            }
        }
    }
}
