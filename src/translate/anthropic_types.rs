use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Request types (what Claude Code sends TO us)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesRequest {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<MessageContent>,
    /// Sampling parameters are forwarded untouched; only an absent field
    /// falls back to the default. An explicit `null` stays `null`.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: Value,
    #[serde(default = "default_temperature")]
    pub temperature: Value,
    /// Accepted for compatibility but never forwarded; responses are always
    /// delivered in one piece.
    #[serde(default)]
    pub stream: bool,
}

fn default_model() -> String {
    "claude-haiku-4-5".to_string()
}

fn default_max_tokens() -> Value {
    json!(4096)
}

fn default_temperature() -> Value {
    json!(0.7)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Passed through verbatim, not restricted to user/assistant.
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
}

fn default_role() -> String {
    "user".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
    /// Any other JSON shape. Flattened to its JSON text.
    Other(Value),
}

/// One element of a structured content list.
///
/// Blocks are matched loosely: a bare string, an object with an optional
/// `type` and optional `text`, or anything else (which contributes nothing).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentBlock {
    Bare(String),
    Object(ObjectBlock),
    Opaque(Value),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectBlock {
    /// Kept as raw JSON so a non-string `type` still parses as an object block.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub block_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Response types (what we send BACK to Claude Code)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub response_type: String, // "message"
    pub role: String,          // "assistant"
    pub model: String,
    pub content: Vec<ResponseContentBlock>,
    pub stop_reason: Option<String>,
    pub stop_sequence: Option<String>,
    pub usage: Usage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: impl Into<String>) -> Self {
        Self {
            error_type: "error".to_string(),
            error: ErrorBody {
                error_type: error_type.to_string(),
                message: message.into(),
            },
        }
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new("invalid_request_error", msg)
    }

    pub fn api_error(msg: impl Into<String>) -> Self {
        Self::new("api_error", msg)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ContentBlock {
    /// The text this block contributes, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            ContentBlock::Bare(text) => Some(text.as_str()),
            ContentBlock::Object(block)
                if block.block_type.as_ref().and_then(Value::as_str) == Some("text") =>
            {
                Some(block.text.as_deref().unwrap_or(""))
            }
            ContentBlock::Object(block) => block.text.as_deref(),
            ContentBlock::Opaque(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults() {
        let req: MessagesRequest = serde_json::from_value(json!({})).unwrap();

        assert_eq!(req.model, "claude-haiku-4-5");
        assert!(req.messages.is_empty());
        assert!(req.system.is_none());
        assert_eq!(req.max_tokens, json!(4096));
        assert_eq!(req.temperature, json!(0.7));
        assert!(!req.stream);
    }

    #[test]
    fn test_sampling_params_keep_client_values() {
        let req: MessagesRequest = serde_json::from_value(json!({
            "max_tokens": -1,
            "temperature": null
        }))
        .unwrap();
        assert_eq!(req.max_tokens, json!(-1));
        assert_eq!(req.temperature, Value::Null);

        let req: MessagesRequest =
            serde_json::from_value(json!({ "max_tokens": 100.0, "temperature": "hot" })).unwrap();
        assert_eq!(req.max_tokens, json!(100.0));
        assert_eq!(req.temperature, json!("hot"));
    }

    #[test]
    fn test_message_role_defaults_to_user_and_null_content_is_absent() {
        let msg: Message = serde_json::from_value(json!({ "content": null })).unwrap();
        assert_eq!(msg.role, "user");
        assert!(msg.content.is_none());
    }

    #[test]
    fn test_role_is_not_restricted() {
        let msg: Message =
            serde_json::from_value(json!({ "role": "tool", "content": "x" })).unwrap();
        assert_eq!(msg.role, "tool");
    }

    #[test]
    fn test_block_shapes() {
        let content: MessageContent = serde_json::from_value(json!([
            "bare",
            { "type": "text", "text": "typed" },
            { "type": "text" },
            { "text": "untyped" },
            { "type": "image", "source": { "data": "..." } },
            42
        ]))
        .unwrap();

        let MessageContent::Blocks(blocks) = content else {
            panic!("Expected block list");
        };
        let texts: Vec<Option<&str>> = blocks.iter().map(ContentBlock::text).collect();
        assert_eq!(
            texts,
            vec![Some("bare"), Some("typed"), Some(""), Some("untyped"), None, None]
        );
    }

    #[test]
    fn test_non_string_type_still_yields_text() {
        let content: MessageContent = serde_json::from_value(json!([
            { "type": 5, "text": "x" },
            { "type": "text", "text": "y" },
            { "type": null, "text": "z" }
        ]))
        .unwrap();

        let MessageContent::Blocks(blocks) = content else {
            panic!("Expected block list");
        };
        let texts: Vec<Option<&str>> = blocks.iter().map(ContentBlock::text).collect();
        assert_eq!(texts, vec![Some("x"), Some("y"), Some("z")]);
    }

    #[test]
    fn test_error_response_shape() {
        let err = ErrorResponse::invalid_request("bad");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            json!({ "type": "error", "error": { "type": "invalid_request_error", "message": "bad" } })
        );
    }
}
