//! Backend adapters for the llmux exchange.
//!
//! One adapter per backend wire format, the tool request builder, provider
//! configuration and the `ServiceResolver` that turns a backend identifier
//! into a ready-to-use `Service`.

pub use config::{BackendKind, ProviderConfig, UnknownBackend, expand_env};
pub use provider::{Provider, Service, build_provider};
pub use resolver::ServiceResolver;
pub use tools::ToolRequestBuilder;

pub mod chat;
mod config;
pub mod gemini;
pub mod groq;
pub mod local;
pub mod ollama;
pub mod openai;
pub mod openrouter;
mod provider;
mod resolver;
pub mod tools;
