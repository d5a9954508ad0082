//! Conversation model sent to a backend.

use base64::{Engine, engine::general_purpose::STANDARD};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A conversation to send: system prompt plus ordered messages.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Conversation {
    /// The system prompt, omitted from requests when empty
    #[serde(default)]
    pub system_prompt: String,

    /// The messages, oldest first
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Replacement text for the last message, used to splice retrieved
    /// context into the outbound request without touching the stored
    /// conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_input_override: Option<String>,
}

impl Conversation {
    /// Create a new conversation with a system prompt
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            ..Default::default()
        }
    }

    /// Append a message
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Override the text of the last message in outbound requests
    pub fn with_last_input_override(mut self, text: impl Into<String>) -> Self {
        self.last_input_override = Some(text.into());
        self
    }

    /// The system prompt, if it is non-empty
    pub fn system(&self) -> Option<&str> {
        Some(self.system_prompt.as_str()).filter(|s| !s.is_empty())
    }

    /// The messages as they should go on the wire, in order.
    ///
    /// The last message carries `last_input_override` when one is set.
    pub fn turns(&self) -> impl Iterator<Item = Turn<'_>> {
        let last = self.messages.len().saturating_sub(1);
        self.messages.iter().enumerate().map(move |(idx, message)| {
            let text = match (&self.last_input_override, idx == last) {
                (Some(text), true) => text.as_str(),
                _ => message.content.as_str(),
            };
            Turn {
                role: message.role,
                text,
                image: message.image.as_ref(),
            }
        })
    }

    /// Images attached to any message, in order
    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.messages.iter().filter_map(|m| m.image.as_ref())
    }
}

/// One outbound message view produced by [`Conversation::turns`].
#[derive(Debug, Clone, Copy)]
pub struct Turn<'a> {
    pub role: Role,
    pub text: &'a str,
    pub image: Option<&'a Image>,
}

/// A message in the conversation
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Message {
    /// The role of the message
    pub role: Role,

    /// The text content of the message
    #[serde(default)]
    pub content: String,

    /// An optional image attached to the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            image: None,
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            image: None,
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            image: None,
        }
    }

    /// Attach an image
    pub fn with_image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }
}

/// An image payload: raw bytes plus mime type.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Image {
    pub mime_type: CompactString,
    pub data: Vec<u8>,
}

impl Image {
    pub fn new(mime_type: impl Into<CompactString>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Standard base64 encoding of the image bytes
    pub fn base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:` URL form used by OpenAI-style `image_url` parts
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64())
    }
}

/// The role of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The user role
    #[default]
    User,
    /// The assistant role
    Assistant,
    /// The system role
    System,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}
