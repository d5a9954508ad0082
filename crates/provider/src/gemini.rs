//! Google Gemini `generateContent` / `streamGenerateContent`.
//!
//! The streamed form is a pretty-printed JSON array rather than SSE, the
//! API key travels as the `key` query parameter, and assistant turns use
//! the `model` role.

use llm::{
    Adapter, Client, Conversation, Dispatcher, Error, Events, Framing, Image, ModelSelection,
    Role, StatusPolicy, StreamEvent, TokenUsage, ToolFormat,
};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Base URL; the model name and method are appended per request.
pub const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models/";

#[derive(Clone, Debug)]
pub struct Gemini {
    client: Client,
    base: String,
}

impl Gemini {
    pub fn api(client: Client) -> Self {
        Self::custom(client, ENDPOINT)
    }

    pub fn custom(client: Client, base: &str) -> Self {
        Self {
            client,
            base: base.to_owned(),
        }
    }

    pub fn with_endpoint(&self, base: &str) -> Self {
        Self::custom(self.client.clone(), base)
    }

    /// Full method URL for a model.
    pub fn endpoint(&self, model: &str, streaming: bool) -> String {
        let method = if streaming {
            "streamGenerateContent"
        } else {
            "generateContent"
        };
        format!("{}{model}:{method}", self.base)
    }
}

#[derive(Debug, Serialize)]
struct Request<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

impl From<&Image> for InlineData {
    fn from(image: &Image) -> Self {
        Self {
            mime_type: image.mime_type.to_string(),
            data: image.base64(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: TextPart<'a>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

fn role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "model",
        Role::User | Role::System => "user",
    }
}

impl Adapter for Gemini {
    fn kind(&self) -> &'static str {
        "gemini"
    }

    fn dispatcher(&self, selection: &ModelSelection, streaming: bool) -> Result<Dispatcher, Error> {
        let endpoint = self.endpoint(&selection.model, streaming);
        Ok(Dispatcher::no_auth(self.client.clone(), &endpoint).with_query("key", &selection.api_key))
    }

    fn build_payload(
        &self,
        _selection: &ModelSelection,
        conversation: &Conversation,
        _streaming: bool,
    ) -> Result<Value, Error> {
        let contents = conversation
            .turns()
            .map(|turn| {
                let mut parts = vec![Part::Text { text: turn.text }];
                if let Some(image) = turn.image {
                    parts.push(Part::InlineData {
                        inline_data: image.into(),
                    });
                }
                Content {
                    role: role(turn.role),
                    parts,
                }
            })
            .collect();
        let request = Request {
            contents,
            system_instruction: conversation.system().map(|text| SystemInstruction {
                parts: TextPart { text },
            }),
        };
        Ok(serde_json::to_value(&request)?)
    }

    fn tool_format(&self) -> ToolFormat {
        ToolFormat::FunctionDeclarations
    }

    fn framing(&self) -> Framing {
        Framing::JsonArray
    }

    /// A `functionCall` part yields its `args` as the tool-call text;
    /// otherwise the text parts are joined.
    fn extract_chunk(&self, fragment: &Value) -> Events {
        let mut events = Events::new();
        if let Some(parts) = fragment["candidates"][0]["content"]["parts"].as_array() {
            if let Some(call) = parts.iter().find_map(|p| p.get("functionCall")) {
                events.push(StreamEvent::ToolCallDelta(call["args"].to_string()));
            } else {
                let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
                if !text.is_empty() {
                    events.push(StreamEvent::TextDelta(text));
                }
            }
        }

        let meta = &fragment["usageMetadata"];
        if meta.is_object() {
            events.push(StreamEvent::UsageUpdate(TokenUsage::new(
                meta["promptTokenCount"].as_u64().unwrap_or_default(),
                meta["candidatesTokenCount"].as_u64().unwrap_or_default(),
            )));
        }
        events
    }

    fn status_policy(&self) -> StatusPolicy {
        StatusPolicy::Strict
    }

    fn default_timeout(&self) -> Duration {
        Duration::from_secs(300)
    }
}
