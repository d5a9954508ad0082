//! Folding stream events into an `AiResponse`.

use crate::{AiResponse, StreamEvent, TokenUsage};

/// How a backend reports token usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsageReporting {
    /// Usage may arrive several times; the latest report wins.
    #[default]
    Repeated,
    /// Usage arrives once with the terminal fragment and only counts
    /// when the stream is marked done.
    Once,
}

/// Accumulates stream events for one request.
#[derive(Debug, Default)]
pub struct ResponseAccumulator {
    reporting: UsageReporting,
    text: String,
    tool_text: String,
    saw_text: bool,
    usage: TokenUsage,
    staged: Option<TokenUsage>,
    done: bool,
}

impl ResponseAccumulator {
    pub fn new(reporting: UsageReporting) -> Self {
        Self {
            reporting,
            ..Default::default()
        }
    }

    /// Accept one event
    pub fn accept(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::TextDelta(text) => {
                self.saw_text = true;
                self.text.push_str(text);
            }
            StreamEvent::ToolCallDelta(text) => self.tool_text.push_str(text),
            StreamEvent::UsageUpdate(usage) => match self.reporting {
                UsageReporting::Repeated => self.usage = *usage,
                UsageReporting::Once => self.staged = Some(*usage),
            },
            StreamEvent::Done => {
                self.done = true;
                if let Some(usage) = self.staged.take() {
                    self.usage = usage;
                }
            }
        }
    }

    /// Whether a done marker has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The response text so far: accumulated text if any text delta was
    /// seen, otherwise the accumulated tool-call text.
    pub fn text(&self) -> &str {
        if self.saw_text {
            &self.text
        } else {
            &self.tool_text
        }
    }

    pub fn usage(&self) -> TokenUsage {
        self.usage
    }

    /// Build the successful response
    pub fn finish(self) -> AiResponse {
        AiResponse::success(self.text(), self.usage)
    }

    /// Build the partial response of a cancelled request
    pub fn cancelled(self) -> AiResponse {
        AiResponse::partial(self.text(), self.usage)
    }
}
