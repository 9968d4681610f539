//! Demonstrate using the translation layer without a server.
//!
//! Usage:
//!   `cargo run --example translate_only`

use ollama_proxy::translate::anthropic_types::MessagesRequest;
use ollama_proxy::translate::errors::GatewayFailure;
use ollama_proxy::translate::openai_types::ChatCompletionResponse;
use ollama_proxy::translate::request::anthropic_to_openai;
use ollama_proxy::translate::response::openai_to_anthropic;
use ollama_proxy::ModelMap;

fn main() -> anyhow::Result<()> {
    // An Anthropic Messages API request, as Claude Code would send it
    let anthropic_req: MessagesRequest = serde_json::from_value(serde_json::json!({
        "model": "claude-haiku-4-5-20250514",
        "max_tokens": 1024,
        "system": "You are a geography expert. Be concise.",
        "stream": true,
        "messages": [
            { "role": "user", "content": "What is the capital of France?" },
            { "role": "assistant", "content": [{ "type": "text", "text": "Paris." }] },
            { "role": "user", "content": [
                { "type": "image", "source": { "type": "base64", "media_type": "image/png", "data": "..." } },
                { "type": "text", "text": "And Germany?" }
            ] }
        ]
    }))?;

    let models = ModelMap::default();
    let openai_req = anthropic_to_openai(&anthropic_req, &models);

    println!("=== Translated Request (OpenAI format) ===");
    println!("{}", serde_json::to_string_pretty(&openai_req)?);

    // A typical reply from Ollama's /v1/chat/completions
    let backend_resp: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
        "id": "chatcmpl-123",
        "model": "claude-haiku-4-5:latest",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "Berlin." },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 42, "completion_tokens": 3, "total_tokens": 45 }
    }))?;

    let anthropic_resp = openai_to_anthropic(&backend_resp, &anthropic_req.model);

    println!();
    println!("=== Translated Response (Anthropic format) ===");
    println!("{}", serde_json::to_string_pretty(&anthropic_resp)?);

    let (err, status) = GatewayFailure::BackendStatus {
        status: 404,
        body: r#"{"error":{"message":"model not found"}}"#.to_string(),
    }
    .to_response();

    println!();
    println!("=== Mapped Backend Error (HTTP {status}) ===");
    println!("{}", serde_json::to_string_pretty(&err)?);

    Ok(())
}
