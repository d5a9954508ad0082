//! The unified response type every backend folds into.

use crate::Error;
use serde::{Deserialize, Serialize};

/// Input and output token counts for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
}

impl TokenUsage {
    pub fn new(input: u64, output: u64) -> Self {
        Self { input, output }
    }
}

/// The final result of one request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AiResponse {
    text: String,
    success: bool,
    usage: TokenUsage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suggested_next_prompt: Option<String>,
}

impl AiResponse {
    /// A successful response
    pub fn success(text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            text: text.into(),
            success: true,
            usage,
            suggested_next_prompt: None,
        }
    }

    /// A response cut short before completion; keeps whatever arrived.
    pub fn partial(text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            text: text.into(),
            success: false,
            usage,
            suggested_next_prompt: None,
        }
    }

    /// A failed response carrying the error as diagnostic text
    pub fn failure(error: &Error) -> Self {
        Self {
            text: error.to_string(),
            success: false,
            usage: TokenUsage::default(),
            suggested_next_prompt: None,
        }
    }

    pub fn with_suggested_next_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.suggested_next_prompt = Some(prompt.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn usage(&self) -> TokenUsage {
        self.usage
    }

    pub fn suggested_next_prompt(&self) -> Option<&str> {
        self.suggested_next_prompt.as_deref()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
