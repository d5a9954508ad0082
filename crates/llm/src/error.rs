//! Error types for the exchange.

use crate::AiResponse;

/// Anything that turns a request into a failed [`AiResponse`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection, timeout or body read failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// No response headers arrived in time
    #[error("no response within {0:?}")]
    Timeout(std::time::Duration),

    /// A header value could not be built from the credentials
    #[error("invalid header: {0}")]
    Header(String),

    /// Non-success HTTP status
    #[error("request failed\nContext: {context}\nHTTP Status: {status}")]
    Status { status: u16, context: String },

    /// A whole-document body that is not the expected JSON
    #[error("failed to parse response: {source}\nContext: {body}")]
    Parse {
        source: serde_json::Error,
        body: String,
    },

    /// A stream that ended without a single usable fragment
    #[error("no usable fragments in response\nContext: Response leftovers: {leftover}")]
    EmptyStream { leftover: String },

    /// Payload construction failed
    #[error("failed to build request: {0}")]
    Payload(#[from] serde_json::Error),

    /// The selected tool's schema is missing or not valid JSON
    #[error("invalid schema for tool {tool}: {reason}")]
    ToolSchema { tool: String, reason: String },

    /// The selected tool id is not known to the tool manager
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        Self::Header(e.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderName> for Error {
    fn from(e: reqwest::header::InvalidHeaderName) -> Self {
        Self::Header(e.to_string())
    }
}

/// The request was cancelled before the stream ended.
///
/// Carries whatever had been folded so far, always with `success == false`.
#[derive(Debug, thiserror::Error)]
#[error("request cancelled")]
pub struct Cancelled {
    pub partial: AiResponse,
}

impl Cancelled {
    pub fn new(partial: AiResponse) -> Self {
        Self { partial }
    }

    pub fn into_partial(self) -> AiResponse {
        self.partial
    }
}
