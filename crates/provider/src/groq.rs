//! Groq, an OpenAI-compatible API that is always streamed.

use crate::chat::{self, ContentStyle};
use llm::{
    Adapter, Client, Conversation, Dispatcher, Error, Events, Framing, ModelSelection,
    StreamEvent, ToolFormat,
};
use serde_json::Value;

/// The Groq chat completions API endpoint.
pub const ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Output cap sent with every request.
const MAX_TOKENS: u32 = 4000;

#[derive(Clone, Debug)]
pub struct Groq {
    client: Client,
    endpoint: String,
}

impl Groq {
    pub fn api(client: Client) -> Self {
        Self::custom(client, ENDPOINT)
    }

    pub fn custom(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_owned(),
        }
    }

    pub fn with_endpoint(&self, endpoint: &str) -> Self {
        Self::custom(self.client.clone(), endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Adapter for Groq {
    fn kind(&self) -> &'static str {
        "groq"
    }

    fn dispatcher(&self, selection: &ModelSelection, _streaming: bool) -> Result<Dispatcher, Error> {
        Dispatcher::bearer(self.client.clone(), &selection.api_key, &self.endpoint)
    }

    fn build_payload(
        &self,
        selection: &ModelSelection,
        conversation: &Conversation,
        _streaming: bool,
    ) -> Result<Value, Error> {
        let mut request =
            chat::Request::new(&selection.model, conversation, ContentStyle::Plain).stream(false);
        request.max_tokens = Some(MAX_TOKENS);
        request.into_payload(&selection.extra)
    }

    fn tool_format(&self) -> ToolFormat {
        ToolFormat::Function
    }

    fn framing(&self) -> Framing {
        Framing::Sse
    }

    /// Groq reports usage under `x_groq.usage` on the final chunk.
    fn extract_chunk(&self, fragment: &Value) -> Events {
        let mut events = chat::extract(fragment, "delta");
        let reported = events
            .iter()
            .any(|e| matches!(e, StreamEvent::UsageUpdate(_)));
        if !reported && let Some(usage) = chat::usage(&fragment["x_groq"]["usage"]) {
            events.push(StreamEvent::UsageUpdate(usage));
        }
        events
    }

    fn extract_document(&self, document: &Value) -> Events {
        chat::extract(document, "message")
    }

    fn force_streaming(&self) -> bool {
        true
    }
}
