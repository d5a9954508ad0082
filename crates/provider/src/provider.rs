//! Provider implementation.
//!
//! Unified `Provider` enum with enum dispatch over the concrete backends,
//! and `Service`, a provider bound to the tool manager that runs whole
//! requests.

use crate::{
    BackendKind, ToolRequestBuilder, gemini::Gemini, groq::Groq, local::Local, ollama::Ollama,
    openai::OpenAI, openrouter::OpenRouter,
};
use llm::{
    Adapter, AiResponse, CancellationToken, Cancelled, Client, Conversation, ModelSelection,
    Observer, ToolManager,
};
use std::sync::Arc;

/// Unified backend adapter enum.
#[derive(Clone, Debug)]
pub enum Provider {
    /// OpenAI-compatible chat completions (OpenAI, DeepSeek, ...).
    OpenAI(OpenAI),
    /// Google Gemini.
    Gemini(Gemini),
    /// Groq.
    Groq(Groq),
    /// OpenRouter.
    OpenRouter(OpenRouter),
    /// Ollama generate API.
    Ollama(Ollama),
    /// Local models via the Ollama chat API.
    Local(Local),
}

/// Construct a `Provider` for a backend on its default endpoint.
pub fn build_provider(kind: BackendKind, client: Client) -> Provider {
    match kind {
        BackendKind::OpenAI => Provider::OpenAI(OpenAI::api(client)),
        BackendKind::Gemini => Provider::Gemini(Gemini::api(client)),
        BackendKind::Groq => Provider::Groq(Groq::api(client)),
        BackendKind::OpenRouter => Provider::OpenRouter(OpenRouter::api(client)),
        BackendKind::Ollama => Provider::Ollama(Ollama::local(client)),
        BackendKind::Local => Provider::Local(Local::new(client)),
    }
}

impl Provider {
    /// The adapter behind this provider.
    pub fn adapter(&self) -> &dyn Adapter {
        match self {
            Self::OpenAI(p) => p,
            Self::Gemini(p) => p,
            Self::Groq(p) => p,
            Self::OpenRouter(p) => p,
            Self::Ollama(p) => p,
            Self::Local(p) => p,
        }
    }

    /// The provider to use for one selection: a fresh adapter on the
    /// selection's endpoint when it overrides the default.
    pub fn bind(&self, selection: &ModelSelection) -> Self {
        let Some(url) = selection.base_url.as_deref() else {
            return self.clone();
        };
        match self {
            Self::OpenAI(p) => Self::OpenAI(p.with_endpoint(url)),
            Self::Gemini(p) => Self::Gemini(p.with_endpoint(url)),
            Self::Groq(p) => Self::Groq(p.with_endpoint(url)),
            Self::OpenRouter(p) => Self::OpenRouter(p.with_endpoint(url)),
            Self::Ollama(p) => Self::Ollama(p.with_endpoint(url)),
            Self::Local(p) => Self::Local(p.with_endpoint(url)),
        }
    }
}

/// A provider bound to the tool manager.
#[derive(Clone)]
pub struct Service {
    provider: Provider,
    tools: Arc<dyn ToolManager>,
}

impl Service {
    pub fn new(provider: Provider, tools: Arc<dyn ToolManager>) -> Self {
        Self { provider, tools }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// Send a conversation and fold the reply into one response.
    ///
    /// Payload and tool errors produce a failed response before any
    /// network call. Cancellation is the only error.
    pub async fn fetch_response(
        &self,
        selection: &ModelSelection,
        conversation: &Conversation,
        tool_ids: &[String],
        use_streaming: bool,
        cancel: &CancellationToken,
        observer: &mut impl Observer,
    ) -> Result<AiResponse, Cancelled> {
        let provider = self.provider.bind(selection);
        let adapter = provider.adapter();
        let streaming = use_streaming || adapter.force_streaming();

        let mut body = match adapter.build_payload(selection, conversation, streaming) {
            Ok(body) => body,
            Err(e) => return Ok(AiResponse::failure(&e)),
        };
        if let Some(object) = body.as_object_mut() {
            let tools = ToolRequestBuilder::new(self.tools.as_ref());
            if let Err(e) = tools.attach(object, tool_ids, adapter.tool_format()) {
                tracing::warn!("{}: {e}", adapter.kind());
                return Ok(AiResponse::failure(&e));
            }
        }

        let dispatcher = match adapter.dispatcher(selection, streaming) {
            Ok(dispatcher) => dispatcher,
            Err(e) => return Ok(AiResponse::failure(&e)),
        };
        let timeout = selection.timeout.unwrap_or_else(|| adapter.default_timeout());
        tracing::debug!(
            "{} request to {} (streaming: {streaming})",
            adapter.kind(),
            dispatcher.endpoint()
        );
        llm::exchange(
            adapter,
            &dispatcher,
            &body,
            streaming,
            timeout,
            cancel,
            observer,
        )
        .await
    }
}
