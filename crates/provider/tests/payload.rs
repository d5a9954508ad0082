//! Tests for per-backend request bodies and transports.

use llm::{Adapter, Client, Conversation, Image, Message, ModelSelection, ToolFormat};
use llmux_provider::{
    gemini::Gemini, groq::Groq, local::Local, ollama::Ollama,
    openai::{Capabilities, OpenAI},
    openrouter::OpenRouter,
};
use serde_json::json;

fn conversation() -> Conversation {
    Conversation::new("be brief")
        .with_message(Message::user("hi").with_image(Image::new("image/png", vec![1u8, 2, 3])))
        .with_message(Message::assistant("hello"))
        .with_message(Message::user("bye"))
}

fn selection(backend: &str, model: &str) -> ModelSelection {
    ModelSelection::new(backend, model).with_api_key("sk-test")
}

#[test]
fn openai_streaming_payload() {
    let openai = OpenAI::api(Client::new());
    let selection =
        selection("openai", "gpt-4o").with_extra("temperature=0.5".parse().expect("extra"));
    let body = openai
        .build_payload(&selection, &conversation(), true)
        .expect("payload");

    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["stream"], true);
    assert_eq!(body["stream_options"], json!({"include_usage": true}));
    assert_eq!(body["temperature"], json!(0.5));
    assert!(body.get("logprobs").is_none());
    assert_eq!(
        body["messages"][0],
        json!({"role": "system", "content": [{"type": "text", "text": "be brief"}]})
    );
    assert_eq!(
        body["messages"][1]["content"],
        json!([
            {"type": "image_url", "image_url": {"url": "data:image/png;base64,AQID"}},
            {"type": "text", "text": "hi"}
        ])
    );
    assert_eq!(
        body["messages"][2],
        json!({"role": "assistant", "content": [{"type": "text", "text": "hello"}]})
    );
    assert_eq!(openai.tool_format(), ToolFormat::JsonSchema);
}

#[test]
fn openai_single_shot_payload_has_no_stream_options() {
    let openai = OpenAI::api(Client::new());
    let body = openai
        .build_payload(&selection("openai", "gpt-4o"), &conversation(), false)
        .expect("payload");
    assert_eq!(body["stream"], false);
    assert!(body.get("stream_options").is_none());
}

#[test]
fn deepseek_host_uses_plain_content_and_native_tools() {
    let deepseek = OpenAI::custom(Client::new(), "https://api.deepseek.com/v1/chat/completions");
    let caps = deepseek.capabilities();
    assert!(caps.plain_text_content);
    assert!(caps.native_tool_calls);
    assert!(!caps.logprobs);
    assert_eq!(deepseek.tool_format(), ToolFormat::Function);

    let body = deepseek
        .build_payload(&selection("openai", "deepseek-chat"), &conversation(), true)
        .expect("payload");
    assert_eq!(body["messages"][0], json!({"role": "system", "content": "be brief"}));
    assert_eq!(body["messages"][1], json!({"role": "user", "content": "hi"}));
}

#[test]
fn openai_logprobs_capability() {
    let openai = OpenAI::api(Client::new()).with_capabilities(Capabilities {
        logprobs: true,
        ..Capabilities::default()
    });
    let body = openai
        .build_payload(&selection("openai", "gpt-4o"), &conversation(), false)
        .expect("payload");
    assert_eq!(body["logprobs"], json!(true));
    assert_eq!(body["top_logprobs"], json!(5));

    let moved = openai.with_endpoint("https://api.deepseek.com/v1/chat/completions");
    assert!(moved.capabilities().logprobs);
    assert!(moved.capabilities().plain_text_content);
}

#[test]
fn empty_system_prompt_is_still_sent() {
    let conversation = Conversation::new("").with_message(Message::user("hi"));
    let body = OpenAI::api(Client::new())
        .build_payload(&selection("openai", "gpt-4o"), &conversation, false)
        .expect("payload");
    let messages = body["messages"].as_array().expect("messages");
    assert_eq!(messages.len(), 2);
    assert_eq!(
        messages[0],
        json!({"role": "system", "content": [{"type": "text", "text": ""}]})
    );
    assert_eq!(messages[1]["role"], "user");
}

#[test]
fn last_input_override_is_spliced_into_last_text() {
    let conversation = conversation().with_last_input_override("retrieved\n\nbye");
    let body = OpenAI::api(Client::new())
        .build_payload(&selection("openai", "gpt-4o"), &conversation, false)
        .expect("payload");
    assert_eq!(
        body["messages"][3]["content"],
        json!([{"type": "text", "text": "retrieved\n\nbye"}])
    );

    let body = Gemini::api(Client::new())
        .build_payload(&selection("gemini", "gemini-pro"), &conversation, true)
        .expect("payload");
    assert_eq!(body["contents"][2]["parts"], json!([{"text": "retrieved\n\nbye"}]));
}

#[test]
fn groq_always_streams_with_token_cap() {
    let groq = Groq::api(Client::new());
    assert!(groq.force_streaming());
    let body = groq
        .build_payload(&selection("groq", "llama3-70b"), &conversation(), false)
        .expect("payload");
    assert_eq!(body["stream"], true);
    assert_eq!(body["max_tokens"], 4000);
    assert!(body.get("stream_options").is_none());
    assert_eq!(body["messages"][0], json!({"role": "system", "content": "be brief"}));
    assert_eq!(body["messages"][1]["content"], "hi");
}

#[test]
fn openrouter_puts_text_before_image_and_adds_attribution() {
    let router = OpenRouter::api(Client::new());
    let body = router
        .build_payload(&selection("openrouter", "x/y"), &conversation(), true)
        .expect("payload");
    assert_eq!(
        body["messages"][1]["content"],
        json!([
            {"type": "text", "text": "hi"},
            {"type": "image_url", "image_url": {"url": "data:image/png;base64,AQID"}}
        ])
    );

    let dispatcher = router
        .dispatcher(&selection("openrouter", "x/y"), true)
        .expect("dispatcher");
    let headers = dispatcher.headers();
    assert_eq!(headers["authorization"], "Bearer sk-test");
    assert_eq!(
        headers["http-referer"],
        "https://github.com/stringandstickytape/MaxsAiStudio/"
    );
    assert_eq!(headers["x-title"], "MaxsAiStudio");
    assert_eq!(dispatcher.endpoint(), llmux_provider::openrouter::ENDPOINT);
}

#[test]
fn gemini_payload_and_endpoint() {
    let gemini = Gemini::api(Client::new());
    let body = gemini
        .build_payload(&selection("gemini", "gemini-pro"), &conversation(), true)
        .expect("payload");
    assert_eq!(
        body["contents"],
        json!([
            {"role": "user", "parts": [
                {"text": "hi"},
                {"inline_data": {"mime_type": "image/png", "data": "AQID"}}
            ]},
            {"role": "model", "parts": [{"text": "hello"}]},
            {"role": "user", "parts": [{"text": "bye"}]}
        ])
    );
    assert_eq!(body["system_instruction"], json!({"parts": {"text": "be brief"}}));

    let streaming = gemini
        .dispatcher(&selection("gemini", "gemini-pro"), true)
        .expect("dispatcher");
    assert_eq!(
        streaming.endpoint(),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:streamGenerateContent"
    );
    assert_eq!(streaming.query(), &[("key".to_owned(), "sk-test".to_owned())]);
    assert!(streaming.headers().get("authorization").is_none());

    let single = gemini
        .dispatcher(&selection("gemini", "gemini-pro"), false)
        .expect("dispatcher");
    assert!(single.endpoint().ends_with("gemini-pro:generateContent"));
}

#[test]
fn ollama_flattens_conversation_into_prompt() {
    let ollama = Ollama::local(Client::new());
    let selection =
        selection("ollama", "llama3").with_extra("temperature=0.3".parse().expect("extra"));
    let body = ollama
        .build_payload(&selection, &conversation(), true)
        .expect("payload");
    assert_eq!(
        body["prompt"],
        "be brief\n\nuser: hi\n\nassistant: hello\n\nuser: bye"
    );
    assert_eq!(body["images"], json!(["AQID"]));
    assert_eq!(body["options"], json!({"temperature": 0.3, "num_predict": 4096}));
    assert_eq!(body["stream"], true);
    assert_eq!(ollama.tool_format(), ToolFormat::Format);
}

#[test]
fn local_sends_chat_messages_with_images() {
    let local = Local::new(Client::new());
    let body = local
        .build_payload(&selection("local", "llama3"), &conversation(), false)
        .expect("payload");
    assert_eq!(
        body["messages"],
        json!([
            {"role": "system", "content": "be brief"},
            {"role": "user", "content": "hi", "images": ["AQID"]},
            {"role": "assistant", "content": "hello"},
            {"role": "user", "content": "bye"}
        ])
    );
    assert_eq!(body["stream"], false);
    assert_eq!(local.default_timeout().as_secs(), 1800);
    assert!(
        local
            .dispatcher(&selection("local", "llama3"), false)
            .expect("dispatcher")
            .headers()
            .get("authorization")
            .is_none()
    );
}
