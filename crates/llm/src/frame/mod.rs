//! Stream reassembly: raw network bytes to complete JSON fragments.
//!
//! Backends fragment their responses at arbitrary byte boundaries. Every
//! reassembler here buffers bytes until a full line is available, so the
//! frames produced for a payload are the same whether it arrives in one
//! read or one byte at a time.
//!
//! - [`SseReassembler`] handles `data: ` lines ending in `data: [DONE]`.
//! - [`NdjsonReassembler`] handles one JSON document per line.
//! - [`ArrayReassembler`] handles a pretty-printed JSON array whose
//!   elements are separated by lines holding only `,` (and closed by `]`).

pub use array::ArrayReassembler;
pub use ndjson::NdjsonReassembler;
pub use sse::SseReassembler;

use serde_json::Value;

mod array;
mod ndjson;
mod sse;

/// A complete fragment produced by a reassembler.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// One parsed JSON fragment
    Json(Value),
    /// An explicit end-of-stream marker
    Done,
}

/// The framing a backend uses for streamed responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    Sse,
    Ndjson,
    JsonArray,
}

/// Reassembler for any of the supported framings.
#[derive(Debug)]
pub enum Reassembler {
    Sse(SseReassembler),
    Ndjson(NdjsonReassembler),
    JsonArray(ArrayReassembler),
}

impl Reassembler {
    pub fn new(framing: Framing) -> Self {
        match framing {
            Framing::Sse => Self::Sse(SseReassembler::default()),
            Framing::Ndjson => Self::Ndjson(NdjsonReassembler::default()),
            Framing::JsonArray => Self::JsonArray(ArrayReassembler::default()),
        }
    }

    /// Feed one network read, returning every fragment it completed.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Frame> {
        match self {
            Self::Sse(r) => r.feed(bytes),
            Self::Ndjson(r) => r.feed(bytes),
            Self::JsonArray(r) => r.feed(bytes),
        }
    }

    /// Flush the unterminated tail once the stream has ended.
    pub fn finish(&mut self) -> Vec<Frame> {
        match self {
            Self::Sse(r) => r.finish(),
            Self::Ndjson(r) => r.finish(),
            Self::JsonArray(r) => r.finish(),
        }
    }

    /// Text that could not be turned into a fragment, for diagnostics.
    pub fn leftover(&self) -> &str {
        match self {
            Self::Sse(r) => r.leftover(),
            Self::Ndjson(r) => r.leftover(),
            Self::JsonArray(r) => r.leftover(),
        }
    }
}

/// Byte buffer that yields complete lines.
///
/// Splits on `\n` only, which never occurs inside a multi-byte UTF-8
/// sequence, so a character split across reads is decoded intact once its
/// line completes. A trailing `\r` is dropped from each line.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    bytes: Vec<u8>,
}

impl LineBuffer {
    /// Append bytes and drain every complete line.
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.bytes.extend_from_slice(bytes);
        let Some(end) = self.bytes.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };
        let complete: Vec<u8> = self.bytes.drain(..=end).collect();
        complete[..end]
            .split(|b| *b == b'\n')
            .map(decode)
            .collect()
    }

    /// Take the unterminated remainder, if any.
    pub(crate) fn take_rest(&mut self) -> Option<String> {
        if self.bytes.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.bytes);
        Some(decode(&rest))
    }
}

fn decode(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
