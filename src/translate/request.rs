//! Translate Anthropic Messages API requests into OpenAI Chat Completions requests.
//!
//! Every Anthropic message maps to exactly one backend message whose content
//! is the flattened text of the original. A system prompt becomes a leading
//! `system`-role message.

use super::anthropic_types::MessagesRequest;
use super::content::flatten_content;
use super::openai_types::{ChatCompletionRequest, ChatMessage};
use crate::models::ModelMap;

/// Translate an Anthropic Messages API request into an OpenAI Chat Completions request.
/// Pure function: takes the request + model table, returns the translated request.
///
/// `stream` is always `false` on the way out; streaming is not relayed.
pub fn anthropic_to_openai(req: &MessagesRequest, models: &ModelMap) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(req.messages.len() + 1);

    let system = flatten_content(req.system.as_ref());
    if !system.is_empty() {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system,
        });
    }

    messages.extend(req.messages.iter().map(|msg| ChatMessage {
        role: msg.role.clone(),
        content: flatten_content(msg.content.as_ref()),
    }));

    ChatCompletionRequest {
        model: models.resolve(&req.model).to_string(),
        messages,
        max_tokens: req.max_tokens.clone(),
        temperature: req.temperature.clone(),
        stream: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> MessagesRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_system_prompt_prepended() {
        let req = parse(json!({
            "model": "claude-haiku-4-5",
            "system": "be terse",
            "messages": [{ "role": "user", "content": "hi" }]
        }));

        let result = anthropic_to_openai(&req, &ModelMap::default());

        assert_eq!(
            serde_json::to_value(&result.messages).unwrap(),
            json!([
                { "role": "system", "content": "be terse" },
                { "role": "user", "content": "hi" }
            ])
        );
    }

    #[test]
    fn test_empty_system_prompt_is_skipped() {
        let req = parse(json!({
            "system": "",
            "messages": [{ "role": "user", "content": "hi" }]
        }));

        let result = anthropic_to_openai(&req, &ModelMap::default());
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].role, "user");
    }

    #[test]
    fn test_system_blocks_are_flattened() {
        let req = parse(json!({
            "system": [
                { "type": "text", "text": "You are Claude Code." },
                { "type": "text", "text": "Be concise." }
            ],
            "messages": []
        }));

        let result = anthropic_to_openai(&req, &ModelMap::default());
        assert_eq!(result.messages[0].role, "system");
        assert_eq!(result.messages[0].content, "You are Claude Code.\nBe concise.");
    }

    #[test]
    fn test_model_resolved_and_params_pass_through() {
        let req = parse(json!({
            "model": "claude-haiku-4-5-20250514",
            "max_tokens": 256,
            "temperature": 0.1,
            "messages": [{ "role": "user", "content": "hi" }]
        }));

        let result = anthropic_to_openai(&req, &ModelMap::default());

        assert_eq!(result.model, "claude-haiku-4-5:latest");
        assert_eq!(result.max_tokens, json!(256));
        assert_eq!(result.temperature, json!(0.1));
    }

    #[test]
    fn test_out_of_range_params_are_forwarded_unchanged() {
        let req = parse(json!({
            "max_tokens": -1,
            "temperature": 9.5,
            "messages": [{ "role": "user", "content": "hi" }]
        }));
        let result = anthropic_to_openai(&req, &ModelMap::default());
        assert_eq!(result.max_tokens, json!(-1));
        assert_eq!(result.temperature, json!(9.5));

        let req = parse(json!({
            "max_tokens": 100.0,
            "temperature": null,
            "messages": []
        }));
        let result = anthropic_to_openai(&req, &ModelMap::default());
        let sent = serde_json::to_value(&result).unwrap();
        assert_eq!(sent["max_tokens"], json!(100.0));
        assert_eq!(sent["temperature"], serde_json::Value::Null);
    }

    #[test]
    fn test_defaults_are_forwarded() {
        let req = parse(json!({ "messages": [{ "role": "user", "content": "hi" }] }));

        let result = anthropic_to_openai(&req, &ModelMap::default());

        assert_eq!(result.model, "claude-haiku-4-5:latest");
        assert_eq!(result.max_tokens, json!(4096));
        assert_eq!(result.temperature, json!(0.7));
    }

    #[test]
    fn test_stream_is_always_disabled() {
        let req = parse(json!({
            "stream": true,
            "messages": [{ "role": "user", "content": "hi" }]
        }));

        let result = anthropic_to_openai(&req, &ModelMap::default());
        assert!(!result.stream);
    }

    #[test]
    fn test_unmapped_model_passes_through() {
        let req = parse(json!({
            "model": "some-unknown-model",
            "messages": [{ "role": "user", "content": "hi" }]
        }));

        let result = anthropic_to_openai(&req, &ModelMap::default());
        assert_eq!(result.model, "some-unknown-model");
    }

    #[test]
    fn test_roles_and_order_preserved() {
        let req = parse(json!({
            "messages": [
                { "role": "user", "content": [{ "type": "text", "text": "q1" }] },
                { "role": "assistant", "content": "a1" },
                { "role": "user", "content": [
                    { "type": "tool_result", "tool_use_id": "toolu_1", "content": "42" },
                    { "type": "text", "text": "q2" }
                ] },
                { "role": "developer" }
            ]
        }));

        let result = anthropic_to_openai(&req, &ModelMap::default());

        let pairs: Vec<(&str, &str)> = result
            .messages
            .iter()
            .map(|m| (m.role.as_str(), m.content.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("user", "q1"),
                ("assistant", "a1"),
                ("user", "q2"),
                ("developer", ""),
            ]
        );
    }
}
