//! Provider configuration
//!
//! One `[[providers]]` entry per configured model. The backend is named
//! by kind string; the long service names (`OpenAI`, `LocalAI`,
//! `OpenRouterAI`, ...) are accepted case-insensitively.

use compact_str::CompactString;
use llm::{ExtraParams, ModelSelection};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

/// The supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackendKind {
    OpenAI,
    Gemini,
    Groq,
    OpenRouter,
    Ollama,
    Local,
}

impl BackendKind {
    /// Every backend, in display order.
    pub const ALL: [Self; 6] = [
        Self::OpenAI,
        Self::Gemini,
        Self::Groq,
        Self::OpenRouter,
        Self::Ollama,
        Self::Local,
    ];

    /// Canonical kind string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Gemini => "gemini",
            Self::Groq => "groq",
            Self::OpenRouter => "openrouter",
            Self::Ollama => "ollama",
            Self::Local => "local",
        }
    }

    /// The endpoint used when no `base_url` is configured.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::OpenAI => crate::openai::ENDPOINT,
            Self::Gemini => crate::gemini::ENDPOINT,
            Self::Groq => crate::groq::ENDPOINT,
            Self::OpenRouter => crate::openrouter::ENDPOINT,
            Self::Ollama => crate::ollama::ENDPOINT,
            Self::Local => crate::local::ENDPOINT,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backend identifier that names no known backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend: {0}")]
pub struct UnknownBackend(pub String);

impl FromStr for BackendKind {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Self::OpenAI,
            "gemini" => Self::Gemini,
            "groq" => Self::Groq,
            "openrouter" | "openrouterai" => Self::OpenRouter,
            "ollama" => Self::Ollama,
            "local" | "localai" => Self::Local,
            _ => return Err(UnknownBackend(s.to_owned())),
        };
        Ok(kind)
    }
}

impl TryFrom<String> for BackendKind {
    type Error = UnknownBackend;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BackendKind> for String {
    fn from(kind: BackendKind) -> Self {
        kind.as_str().to_owned()
    }
}

/// Named provider configuration.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Unique name for this provider entry. Defaults to `"default"`.
    #[serde(default = "default_name")]
    pub name: CompactString,
    /// Which backend serves this entry.
    pub backend: BackendKind,
    /// Model identifier as the backend knows it.
    pub model: CompactString,
    /// Optional endpoint override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// API key, supports `${ENV_VAR}` expansion.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    /// Extra request parameters as `key=value;key=value`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extra: String,
    /// Request timeout in seconds; the backend default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_name() -> CompactString {
    CompactString::const_new("default")
}

impl ProviderConfig {
    /// The model selection this entry describes.
    pub fn selection(&self) -> ModelSelection {
        ModelSelection {
            backend: self.backend.as_str().into(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            api_key: expand_env(&self.api_key),
            extra: self.extra.parse::<ExtraParams>().unwrap_or_default(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Replace `${NAME}` with the value of the environment variable `NAME`.
/// Unset variables expand to the empty string.
pub fn expand_env(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &rest[start + 2..start + 2 + len];
        out.push_str(&std::env::var(name).unwrap_or_default());
        rest = &rest[start + 3 + len..];
    }
    out.push_str(rest);
    out
}
