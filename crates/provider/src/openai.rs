//! OpenAI chat completions, plus DeepSeek and other hosts speaking the
//! same protocol.

use crate::chat::{self, ContentStyle};
use llm::{
    Adapter, Client, Conversation, Dispatcher, Error, Events, Framing, ModelSelection, ToolFormat,
};
use serde_json::Value;
use std::time::Duration;

/// The OpenAI chat completions API endpoint.
pub const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Host-dependent behaviour, fixed when the adapter is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Message content and the system prompt are plain strings.
    pub plain_text_content: bool,
    /// Tools are sent as callable functions rather than as a forced
    /// `json_schema` response format.
    pub native_tool_calls: bool,
    /// Request log probabilities for the top five tokens.
    pub logprobs: bool,
}

impl Capabilities {
    /// Derive capabilities from the endpoint URL.
    pub fn detect(endpoint: &str) -> Self {
        let deepseek = endpoint.to_ascii_lowercase().contains("deepseek");
        Self {
            plain_text_content: deepseek,
            native_tool_calls: deepseek,
            logprobs: false,
        }
    }
}

/// The OpenAI-compatible adapter.
#[derive(Clone, Debug)]
pub struct OpenAI {
    client: Client,
    endpoint: String,
    capabilities: Capabilities,
}

impl OpenAI {
    /// Create an adapter for the OpenAI API.
    pub fn api(client: Client) -> Self {
        Self::custom(client, ENDPOINT)
    }

    /// Create an adapter for a custom OpenAI-compatible endpoint.
    pub fn custom(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_owned(),
            capabilities: Capabilities::detect(endpoint),
        }
    }

    /// Override the detected capabilities.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// The same adapter pointed at another endpoint. Host capabilities are
    /// detected again, the logprobs request carries over.
    pub fn with_endpoint(&self, endpoint: &str) -> Self {
        let capabilities = Capabilities {
            logprobs: self.capabilities.logprobs,
            ..Capabilities::detect(endpoint)
        };
        Self::custom(self.client.clone(), endpoint).with_capabilities(capabilities)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}

impl Adapter for OpenAI {
    fn kind(&self) -> &'static str {
        "openai"
    }

    fn dispatcher(&self, selection: &ModelSelection, _streaming: bool) -> Result<Dispatcher, Error> {
        Dispatcher::bearer(self.client.clone(), &selection.api_key, &self.endpoint)
    }

    fn build_payload(
        &self,
        selection: &ModelSelection,
        conversation: &Conversation,
        streaming: bool,
    ) -> Result<Value, Error> {
        let style = if self.capabilities.plain_text_content {
            ContentStyle::Plain
        } else {
            ContentStyle::Parts { image_first: true }
        };
        let mut request = chat::Request::new(&selection.model, conversation, style);
        if streaming {
            request = request.stream(true);
        }
        if self.capabilities.logprobs {
            request.logprobs = Some(true);
            request.top_logprobs = Some(5);
        }
        request.into_payload(&selection.extra)
    }

    fn tool_format(&self) -> ToolFormat {
        if self.capabilities.native_tool_calls {
            ToolFormat::Function
        } else {
            ToolFormat::JsonSchema
        }
    }

    fn framing(&self) -> Framing {
        Framing::Sse
    }

    fn extract_chunk(&self, fragment: &Value) -> Events {
        chat::extract(fragment, "delta")
    }

    fn extract_document(&self, document: &Value) -> Events {
        chat::extract(document, "message")
    }

    fn default_timeout(&self) -> Duration {
        Duration::from_secs(300)
    }
}
