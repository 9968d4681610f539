//! Type definitions for the OpenAI-compatible Chat Completions API served by
//! Ollama (`/v1/chat/completions`).
//!
//! Only the fields the gateway reads or writes are modelled. Every response
//! field is optional at every level, so a sparse or empty body still parses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Request types (what we send TO the backend)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Forwarded as the client sent it, null and non-integer values included.
    pub max_tokens: Value,
    pub temperature: Value,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Response types (what we receive FROM the backend)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// `null` is accepted for the list and for each entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Option<Choice>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ChoiceMessage>,
    /// Parsed for logging only; never mapped onto the Anthropic stop reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
}

impl ChatCompletionResponse {
    fn first_choice(&self) -> Option<&Choice> {
        self.choices
            .as_deref()
            .and_then(<[_]>::first)
            .and_then(Option::as_ref)
    }

    /// Text of the first choice, or empty when any level is missing or null.
    pub fn first_text(&self) -> &str {
        self.first_choice()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .unwrap_or_default()
    }

    pub fn first_finish_reason(&self) -> Option<&str> {
        self.first_choice()
            .and_then(|choice| choice.finish_reason.as_deref())
    }
}
