use super::anthropic_types::{MessagesResponse, ResponseContentBlock, Usage};
use super::openai_types::ChatCompletionResponse;

/// The only stop reason the gateway reports.
pub const STOP_REASON: &str = "end_turn";

const MESSAGE_ID_HEX_LEN: usize = 24;

/// Translate an OpenAI Chat Completion response into an Anthropic Messages response.
/// Pure function apart from the random id; `original_model` is what the
/// caller asked for, not the backend alias it was resolved to.
pub fn openai_to_anthropic(resp: &ChatCompletionResponse, original_model: &str) -> MessagesResponse {
    let usage = resp.usage.as_ref().map_or_else(Usage::default, |u| Usage {
        input_tokens: u.prompt_tokens.unwrap_or_default(),
        output_tokens: u.completion_tokens.unwrap_or_default(),
    });

    MessagesResponse {
        id: generate_message_id(),
        response_type: "message".to_string(),
        role: "assistant".to_string(),
        model: original_model.to_string(),
        content: vec![ResponseContentBlock::Text {
            text: resp.first_text().to_string(),
        }],
        stop_reason: Some(STOP_REASON.to_string()),
        stop_sequence: None,
        usage,
    }
}

/// `msg_` followed by 24 lowercase hex characters taken from a v4 UUID.
pub fn generate_message_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("msg_{}", &hex[..MESSAGE_ID_HEX_LEN])
}
