//! Tests for per-backend fragment extraction.

use llm::{Adapter, Client, StreamEvent, TokenUsage};
use llmux_provider::{
    gemini::Gemini, groq::Groq, local::Local, ollama::Ollama, openai::OpenAI,
};
use serde_json::json;

#[test]
fn chat_tool_call_excludes_text() {
    let openai = OpenAI::api(Client::new());
    let events = openai.extract_chunk(&json!({
        "choices": [{"delta": {
            "content": "ignored",
            "tool_calls": [{"index": 0, "function": {"arguments": "{\"a\":"}}]
        }}]
    }));
    assert_eq!(events.as_slice(), &[StreamEvent::ToolCallDelta("{\"a\":".into())]);
}

#[test]
fn chat_tool_call_header_without_arguments_is_silent() {
    let openai = OpenAI::api(Client::new());
    let events = openai.extract_chunk(&json!({
        "choices": [{"delta": {
            "content": null,
            "tool_calls": [{"index": 0, "id": "call_1", "function": {"name": "f", "arguments": ""}}]
        }}]
    }));
    assert!(events.is_empty());
}

#[test]
fn chat_usage_chunk_without_choices() {
    let openai = OpenAI::api(Client::new());
    let events = openai.extract_chunk(&json!({
        "choices": [],
        "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
    }));
    assert_eq!(
        events.as_slice(),
        &[StreamEvent::UsageUpdate(TokenUsage::new(12, 3))]
    );
}

#[test]
fn chat_document_reads_message() {
    let openai = OpenAI::api(Client::new());
    let events = openai.extract_document(&json!({
        "choices": [{"message": {"role": "assistant", "content": "Hello"}}],
        "usage": {"prompt_tokens": 2, "completion_tokens": 1}
    }));
    assert_eq!(
        events.as_slice(),
        &[
            StreamEvent::TextDelta("Hello".into()),
            StreamEvent::UsageUpdate(TokenUsage::new(2, 1)),
        ]
    );
}

#[test]
fn groq_reads_x_groq_usage() {
    let groq = Groq::api(Client::new());
    let events = groq.extract_chunk(&json!({
        "choices": [{"delta": {}, "finish_reason": "stop"}],
        "x_groq": {"usage": {"prompt_tokens": 7, "completion_tokens": 4}}
    }));
    assert_eq!(
        events.as_slice(),
        &[StreamEvent::UsageUpdate(TokenUsage::new(7, 4))]
    );
}

#[test]
fn gemini_text_parts_and_usage() {
    let gemini = Gemini::api(Client::new());
    let events = gemini.extract_chunk(&json!({
        "candidates": [{"content": {"parts": [{"text": "Hel"}, {"text": "lo"}], "role": "model"}}],
        "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 2, "totalTokenCount": 5}
    }));
    assert_eq!(
        events.as_slice(),
        &[
            StreamEvent::TextDelta("Hello".into()),
            StreamEvent::UsageUpdate(TokenUsage::new(3, 2)),
        ]
    );
}

#[test]
fn gemini_function_call_yields_args() {
    let gemini = Gemini::api(Client::new());
    let events = gemini.extract_chunk(&json!({
        "candidates": [{"content": {"parts": [
            {"functionCall": {"name": "ColorSchemeTool", "args": {"primary": "red"}}}
        ]}}]
    }));
    assert_eq!(
        events.as_slice(),
        &[StreamEvent::ToolCallDelta("{\"primary\":\"red\"}".into())]
    );
}

#[test]
fn ollama_done_carries_final_usage() {
    let ollama = Ollama::local(Client::new());
    assert_eq!(
        ollama
            .extract_chunk(&json!({"response": "Hi", "done": false}))
            .as_slice(),
        &[StreamEvent::TextDelta("Hi".into())]
    );
    assert_eq!(
        ollama
            .extract_chunk(&json!({"response": "", "done": true, "prompt_eval_count": 5, "eval_count": 2}))
            .as_slice(),
        &[
            StreamEvent::UsageUpdate(TokenUsage::new(5, 2)),
            StreamEvent::Done,
        ]
    );
}

#[test]
fn local_tool_call_arguments_are_serialized() {
    let local = Local::new(Client::new());
    let events = local.extract_chunk(&json!({
        "message": {"role": "assistant", "content": "", "tool_calls": [
            {"function": {"name": "f", "arguments": {"x": 1}}}
        ]}
    }));
    assert_eq!(events.as_slice(), &[StreamEvent::ToolCallDelta("{\"x\":1}".into())]);
}
