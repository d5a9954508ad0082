//! Backend identifier to bound service.

use crate::{BackendKind, Service, build_provider};
use llm::{Client, ToolManager};
use std::sync::Arc;

/// Resolves backend identifiers to services sharing one HTTP client.
#[derive(Clone)]
pub struct ServiceResolver {
    client: Client,
    tools: Arc<dyn ToolManager>,
}

impl ServiceResolver {
    pub fn new(client: Client, tools: Arc<dyn ToolManager>) -> Self {
        Self { client, tools }
    }

    /// Resolve a backend identifier such as `openai` or `OpenRouterAI`.
    /// Returns `None` for unknown identifiers.
    pub fn resolve(&self, backend: &str) -> Option<Service> {
        let kind = backend.parse::<BackendKind>().ok()?;
        let provider = build_provider(kind, self.client.clone());
        Some(Service::new(provider, self.tools.clone()))
    }
}
