//! Normalized stream events.

use crate::TokenUsage;
use smallvec::SmallVec;

/// One normalized unit extracted from a backend fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A piece of assistant text
    TextDelta(String),
    /// A piece of tool/function-call argument text
    ToolCallDelta(String),
    /// Token usage as reported by the backend
    UsageUpdate(TokenUsage),
    /// The backend signalled the end of the response
    Done,
}

impl StreamEvent {
    /// The streamed text carried by this event, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::TextDelta(text) | Self::ToolCallDelta(text) => Some(text),
            _ => None,
        }
    }
}

/// Events extracted from a single fragment. Most fragments carry one or two.
pub type Events = SmallVec<[StreamEvent; 2]>;
