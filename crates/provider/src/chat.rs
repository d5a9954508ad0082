//! Chat-completions wire format shared by the OpenAI-compatible backends
//! (OpenAI, Groq, OpenRouter).

use llm::{Conversation, Error, Events, ExtraParams, StreamEvent, TokenUsage, Turn};
use serde::Serialize;
use serde_json::Value;

/// How message content is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStyle {
    /// `content` is a plain string; images are not sent.
    Plain,
    /// `content` is an array of typed parts.
    Parts {
        /// Put the `image_url` part before the text part.
        image_first: bool,
    },
}

/// The chat completions request body.
#[derive(Debug, Serialize)]
pub struct Request<'a> {
    /// The model to use
    pub model: &'a str,

    /// The messages, system prompt first
    pub messages: Vec<ChatMessage<'a>>,

    /// Whether to stream the response
    pub stream: bool,

    /// Stream options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Whether to return log probabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<bool>,

    /// Number of most likely tokens to return at each position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u32>,
}

impl<'a> Request<'a> {
    pub fn new(model: &'a str, conversation: &'a Conversation, style: ContentStyle) -> Self {
        Self {
            model,
            messages: messages(conversation, style),
            stream: false,
            stream_options: None,
            max_tokens: None,
            logprobs: None,
            top_logprobs: None,
        }
    }

    /// Enable streaming, optionally asking for a trailing usage chunk.
    pub fn stream(self, usage: bool) -> Self {
        Self {
            stream: true,
            stream_options: usage.then_some(StreamOptions {
                include_usage: true,
            }),
            ..self
        }
    }

    /// Serialize, merging the extra parameters over the typed fields.
    pub fn into_payload(self, extra: &ExtraParams) -> Result<Value, Error> {
        let mut body = serde_json::to_value(&self)?;
        if let Some(object) = body.as_object_mut() {
            extra.merge_into(object);
        }
        Ok(body)
    }
}

/// Stream options for the request
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StreamOptions {
    pub include_usage: bool,
}

/// One chat message
#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: Content<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Content<'a> {
    Text(&'a str),
    Parts(Vec<Part<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// The system message leads even when the prompt is empty.
fn messages(conversation: &Conversation, style: ContentStyle) -> Vec<ChatMessage<'_>> {
    let system = ChatMessage {
        role: "system",
        content: content(&conversation.system_prompt, None, style),
    };
    std::iter::once(system)
        .chain(conversation.turns().map(|turn: Turn<'_>| ChatMessage {
            role: turn.role.as_str(),
            content: content(turn.text, turn.image, style),
        }))
        .collect()
}

fn content<'a>(text: &'a str, image: Option<&llm::Image>, style: ContentStyle) -> Content<'a> {
    let image_first = match style {
        ContentStyle::Plain => {
            if image.is_some() {
                tracing::debug!("plain text content, dropping image");
            }
            return Content::Text(text);
        }
        ContentStyle::Parts { image_first } => image_first,
    };

    let text = Part::Text { text };
    let Some(image) = image else {
        return Content::Parts(vec![text]);
    };
    let image = Part::ImageUrl {
        image_url: ImageUrl {
            url: image.data_url(),
        },
    };
    if image_first {
        Content::Parts(vec![image, text])
    } else {
        Content::Parts(vec![text, image])
    }
}

/// Normalize a chat completions fragment.
///
/// `field` is `delta` for streamed chunks and `message` for whole
/// documents. A tool call's arguments take precedence over text content.
pub fn extract(fragment: &Value, field: &str) -> Events {
    let mut events = Events::new();
    let message = &fragment["choices"][0][field];
    let call = &message["tool_calls"][0];
    if call.is_object() {
        if let Some(args) = call["function"]["arguments"].as_str().filter(|a| !a.is_empty()) {
            events.push(StreamEvent::ToolCallDelta(args.to_owned()));
        }
    } else if let Some(text) = message["content"].as_str().filter(|t| !t.is_empty()) {
        events.push(StreamEvent::TextDelta(text.to_owned()));
    }

    if let Some(usage) = usage(&fragment["usage"]) {
        events.push(StreamEvent::UsageUpdate(usage));
    }
    events
}

/// Parse a `{prompt_tokens, completion_tokens}` usage object.
pub fn usage(value: &Value) -> Option<TokenUsage> {
    let input = value["prompt_tokens"].as_u64();
    let output = value["completion_tokens"].as_u64();
    if input.is_none() && output.is_none() {
        return None;
    }
    Some(TokenUsage::new(
        input.unwrap_or_default(),
        output.unwrap_or_default(),
    ))
}
