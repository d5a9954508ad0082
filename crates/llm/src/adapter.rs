//! The backend adapter contract.

use crate::{
    Conversation, Dispatcher, Error, Events, Framing, ModelSelection, ToolFormat, UsageReporting,
};
use serde_json::Value;
use std::time::Duration;

/// When a backend's HTTP status is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Fail before reading the body.
    Strict,
    /// Read the whole stream first so the failure can carry whatever the
    /// backend sent back.
    Deferred,
}

/// One backend's wire format.
///
/// Everything here is a pure function of the adapter's construction-time
/// state, so an adapter can serve any number of concurrent requests.
pub trait Adapter: Send + Sync {
    /// Short backend name for logs.
    fn kind(&self) -> &'static str;

    /// Build the transport for one request.
    fn dispatcher(&self, selection: &ModelSelection, streaming: bool) -> Result<Dispatcher, Error>;

    /// Build the backend-native request body.
    fn build_payload(
        &self,
        selection: &ModelSelection,
        conversation: &Conversation,
        streaming: bool,
    ) -> Result<Value, Error>;

    /// How this backend accepts a tool schema.
    fn tool_format(&self) -> ToolFormat;

    /// How streamed responses are framed.
    fn framing(&self) -> Framing;

    /// Normalize one streamed fragment.
    fn extract_chunk(&self, fragment: &Value) -> Events;

    /// Normalize a single-shot response body.
    fn extract_document(&self, document: &Value) -> Events {
        self.extract_chunk(document)
    }

    fn usage_reporting(&self) -> UsageReporting {
        UsageReporting::Repeated
    }

    fn status_policy(&self) -> StatusPolicy {
        StatusPolicy::Deferred
    }

    fn default_timeout(&self) -> Duration {
        Duration::from_secs(100)
    }

    /// Whether requests always stream regardless of the caller's choice.
    fn force_streaming(&self) -> bool {
        false
    }
}
