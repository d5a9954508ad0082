//! OpenRouter, an OpenAI-compatible router with attribution headers.

use crate::chat::{self, ContentStyle};
use llm::{
    Adapter, Client, Conversation, Dispatcher, Error, Events, Framing, ModelSelection, ToolFormat,
};
use serde_json::Value;

/// The OpenRouter chat completions API endpoint.
pub const ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

const REFERER: &str = "https://github.com/stringandstickytape/MaxsAiStudio/";
const TITLE: &str = "MaxsAiStudio";

#[derive(Clone, Debug)]
pub struct OpenRouter {
    client: Client,
    endpoint: String,
}

impl OpenRouter {
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

impl Adapter for OpenRouter {
    fn kind(&self) -> &'static str {
        "openrouter"
    }

    fn dispatcher(&self, selection: &ModelSelection, _streaming: bool) -> Result<Dispatcher, Error> {
        Dispatcher::bearer(self.client.clone(), &selection.api_key, &self.endpoint)?
            .with_header("HTTP-Referer", REFERER)?
            .with_header("X-Title", TITLE)
    }

    fn build_payload(
        &self,
        selection: &ModelSelection,
        conversation: &Conversation,
        streaming: bool,
    ) -> Result<Value, Error> {
        let style = ContentStyle::Parts { image_first: false };
        let mut request = chat::Request::new(&selection.model, conversation, style);
        if streaming {
            request = request.stream(false);
        }
        request.into_payload(&selection.extra)
    }

    fn tool_format(&self) -> ToolFormat {
        ToolFormat::Function
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
}
