//! Local models through the Ollama `/api/chat` endpoint.

use crate::ollama::done_usage;
use llm::{
    Adapter, Client, Conversation, Dispatcher, Error, Events, Framing, Image, ModelSelection,
    StatusPolicy, StreamEvent, ToolFormat, UsageReporting,
};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// The default local chat endpoint.
pub const ENDPOINT: &str = "http://localhost:11434/api/chat";

#[derive(Clone, Debug)]
pub struct Local {
    client: Client,
    endpoint: String,
}

impl Local {
    pub fn new(client: Client) -> Self {
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

#[derive(Debug, Serialize)]
struct Request<'a> {
    model: &'a str,
    messages: Vec<LocalMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct LocalMessage<'a> {
    role: &'static str,
    content: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
}

impl Adapter for Local {
    fn kind(&self) -> &'static str {
        "local"
    }

    fn dispatcher(&self, _selection: &ModelSelection, _streaming: bool) -> Result<Dispatcher, Error> {
        Ok(Dispatcher::no_auth(self.client.clone(), &self.endpoint))
    }

    fn build_payload(
        &self,
        selection: &ModelSelection,
        conversation: &Conversation,
        streaming: bool,
    ) -> Result<Value, Error> {
        let system = conversation.system().map(|content| LocalMessage {
            role: "system",
            content,
            images: Vec::new(),
        });
        let messages = system
            .into_iter()
            .chain(conversation.turns().map(|turn| LocalMessage {
                role: turn.role.as_str(),
                content: turn.text,
                images: turn.image.map(Image::base64).into_iter().collect(),
            }))
            .collect();
        let request = Request {
            model: &selection.model,
            messages,
            stream: streaming,
        };
        Ok(serde_json::to_value(&request)?)
    }

    fn tool_format(&self) -> ToolFormat {
        ToolFormat::Format
    }

    fn framing(&self) -> Framing {
        Framing::Ndjson
    }

    fn extract_chunk(&self, fragment: &Value) -> Events {
        let mut events = Events::new();
        let message = &fragment["message"];
        let call = &message["tool_calls"][0]["function"]["arguments"];
        if let Some(args) = call.as_str() {
            events.push(StreamEvent::ToolCallDelta(args.to_owned()));
        } else if call.is_object() {
            events.push(StreamEvent::ToolCallDelta(call.to_string()));
        } else if let Some(text) = message["content"].as_str().filter(|t| !t.is_empty()) {
            events.push(StreamEvent::TextDelta(text.to_owned()));
        }

        if fragment["done"].as_bool().unwrap_or(false) {
            events.push(StreamEvent::UsageUpdate(done_usage(fragment)));
            events.push(StreamEvent::Done);
        }
        events
    }

    fn usage_reporting(&self) -> UsageReporting {
        UsageReporting::Once
    }

    fn status_policy(&self) -> StatusPolicy {
        StatusPolicy::Strict
    }

    fn default_timeout(&self) -> Duration {
        Duration::from_secs(1800)
    }
}
