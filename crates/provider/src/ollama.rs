//! Ollama `/api/generate`: the conversation flattened into one prompt.

use llm::{
    Adapter, Client, Conversation, Dispatcher, Error, Events, Framing, Image, ModelSelection,
    StatusPolicy, StreamEvent, TokenUsage, ToolFormat, UsageReporting,
};
use serde::Serialize;
use serde_json::Value;

/// The default Ollama generate endpoint.
pub const ENDPOINT: &str = "http://localhost:11434/api/generate";

const NUM_PREDICT: u32 = 4096;

#[derive(Clone, Debug)]
pub struct Ollama {
    client: Client,
    endpoint: String,
}

impl Ollama {
    pub fn local(client: Client) -> Self {
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
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
    options: Options<'a>,
}

#[derive(Debug, Serialize)]
struct Options<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<&'a Value>,
    num_predict: u32,
}

/// System prompt followed by `role: content` blocks, blank-line separated.
pub fn prompt(conversation: &Conversation) -> String {
    let mut prompt = String::new();
    if let Some(system) = conversation.system() {
        prompt.push_str(system);
        prompt.push_str("\n\n");
    }
    for turn in conversation.turns() {
        prompt.push_str(turn.role.as_str());
        prompt.push_str(": ");
        prompt.push_str(turn.text);
        prompt.push_str("\n\n");
    }
    prompt.trim().to_owned()
}

impl Adapter for Ollama {
    fn kind(&self) -> &'static str {
        "ollama"
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
        let request = Request {
            model: &selection.model,
            prompt: prompt(conversation),
            stream: streaming,
            images: conversation.images().map(Image::base64).collect(),
            options: Options {
                temperature: selection.extra.get("temperature"),
                num_predict: NUM_PREDICT,
            },
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
        if let Some(text) = fragment["response"].as_str().filter(|t| !t.is_empty()) {
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
}

/// Final counts carried by a `done: true` fragment.
pub(crate) fn done_usage(fragment: &Value) -> TokenUsage {
    TokenUsage::new(
        fragment["prompt_eval_count"].as_u64().unwrap_or_default(),
        fragment["eval_count"].as_u64().unwrap_or_default(),
    )
}
