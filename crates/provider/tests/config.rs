//! Tests for provider configuration and resolution.

use llm::ToolSet;
use llmux_provider::{BackendKind, Provider, ProviderConfig, ServiceResolver, expand_env};
use serde_json::json;
use std::{sync::Arc, time::Duration};

#[test]
fn backend_kind_accepts_service_names() {
    let cases = [
        ("openai", BackendKind::OpenAI),
        ("OpenAI", BackendKind::OpenAI),
        ("Gemini", BackendKind::Gemini),
        ("groq", BackendKind::Groq),
        ("Ollama", BackendKind::Ollama),
        ("LocalAI", BackendKind::Local),
        ("local", BackendKind::Local),
        ("OpenRouterAI", BackendKind::OpenRouter),
        ("openrouter", BackendKind::OpenRouter),
    ];
    for (name, kind) in cases {
        assert_eq!(name.parse::<BackendKind>(), Ok(kind), "{name}");
    }
    assert!("claude".parse::<BackendKind>().is_err());
}

#[test]
fn backend_kind_round_trips_as_string() {
    for kind in BackendKind::ALL {
        assert_eq!(kind.to_string().parse::<BackendKind>(), Ok(kind));
    }
}

#[test]
fn provider_config_from_toml() {
    let config: ProviderConfig = toml::from_str(
        r#"
name = "fast"
backend = "Groq"
model = "llama3-70b"
api_key = "gsk-123"
extra = "temperature=0.1;user=me"
timeout_secs = 30
"#,
    )
    .expect("config");

    assert_eq!(config.name, "fast");
    assert_eq!(config.backend, BackendKind::Groq);

    let selection = config.selection();
    assert_eq!(selection.backend, "groq");
    assert_eq!(selection.model, "llama3-70b");
    assert_eq!(selection.api_key, "gsk-123");
    assert_eq!(selection.extra.get("temperature"), Some(&json!(0.1)));
    assert_eq!(selection.extra.get("user"), Some(&json!("me")));
    assert_eq!(selection.timeout, Some(Duration::from_secs(30)));
    assert!(selection.base_url.is_none());
}

#[test]
fn provider_config_defaults() {
    let config: ProviderConfig =
        toml::from_str("backend = \"local\"\nmodel = \"llama3\"").expect("config");
    assert_eq!(config.name, "default");
    assert!(config.api_key.is_empty());
    assert!(config.selection().extra.is_empty());
    assert!(config.selection().timeout.is_none());
}

#[test]
fn provider_config_rejects_unknown_backend() {
    let result = toml::from_str::<ProviderConfig>("backend = \"claude\"\nmodel = \"x\"");
    assert!(result.is_err());
}

#[test]
fn expand_env_substitutes_variables() {
    assert_eq!(expand_env("${PATH}"), std::env::var("PATH").unwrap_or_default());
    assert_eq!(expand_env("plain"), "plain");
    assert_eq!(expand_env("a${LLMUX_SURELY_UNSET_VAR}b"), "ab");
    assert_eq!(expand_env("${unterminated"), "${unterminated");
}

#[test]
fn resolver_maps_identifiers_to_providers() {
    let resolver = ServiceResolver::new(llm::Client::new(), Arc::new(ToolSet::default()));
    assert!(matches!(
        resolver.resolve("OpenAI").map(|s| s.provider().clone()),
        Some(Provider::OpenAI(_))
    ));
    assert!(matches!(
        resolver.resolve("Gemini").map(|s| s.provider().clone()),
        Some(Provider::Gemini(_))
    ));
    assert!(matches!(
        resolver.resolve("LocalAI").map(|s| s.provider().clone()),
        Some(Provider::Local(_))
    ));
    assert!(resolver.resolve("Claude").is_none());
}

#[test]
fn bind_uses_selection_endpoint() {
    let resolver = ServiceResolver::new(llm::Client::new(), Arc::new(ToolSet::default()));
    let service = resolver.resolve("openai").expect("openai");
    let selection = llm::ModelSelection::new("openai", "deepseek-chat")
        .with_base_url("https://api.deepseek.com/v1/chat/completions");
    match service.provider().bind(&selection) {
        Provider::OpenAI(openai) => {
            assert_eq!(openai.endpoint(), "https://api.deepseek.com/v1/chat/completions");
            assert!(openai.capabilities().native_tool_calls);
        }
        other => panic!("expected OpenAI, got {other:?}"),
    }
}
