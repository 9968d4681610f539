//! Flatten Anthropic message content into the plain string the backend expects.

use super::anthropic_types::{ContentBlock, MessageContent};

/// Reduce a message's content to a single text string.
///
/// Block lists keep only the blocks that carry text, joined with `"\n"` in
/// their original order. Non-text blocks are dropped without a trace. Absent
/// content yields an empty string.
pub fn flatten_content(content: Option<&MessageContent>) -> String {
    match content {
        None => String::new(),
        Some(MessageContent::Text(text)) => text.clone(),
        Some(MessageContent::Blocks(blocks)) => blocks
            .iter()
            .filter_map(ContentBlock::text)
            .collect::<Vec<_>>()
            .join("\n"),
        Some(MessageContent::Other(value)) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> MessageContent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_absent_is_empty() {
        assert_eq!(flatten_content(None), "");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let content = parse(json!("line one\nline two"));
        assert_eq!(flatten_content(Some(&content)), "line one\nline two");
    }

    #[test]
    fn test_text_blocks_joined_in_order() {
        let content = parse(json!([
            { "type": "text", "text": "a" },
            { "type": "text", "text": "b" },
            { "type": "text", "text": "c" }
        ]));
        assert_eq!(flatten_content(Some(&content)), "a\nb\nc");
    }

    #[test]
    fn test_non_text_blocks_dropped() {
        let content = parse(json!([
            { "type": "image", "source": { "type": "base64", "media_type": "image/png", "data": "AAAA" } },
            { "type": "text", "text": "describe this" },
            { "type": "tool_use", "id": "toolu_1", "name": "read", "input": {} }
        ]));
        assert_eq!(flatten_content(Some(&content)), "describe this");
    }

    #[test]
    fn test_text_field_without_discriminator_counts() {
        let content = parse(json!([{ "text": "loose" }, "bare"]));
        assert_eq!(flatten_content(Some(&content)), "loose\nbare");
    }

    #[test]
    fn test_text_block_without_text_contributes_empty_line() {
        let content = parse(json!([{ "type": "text" }, { "type": "text", "text": "x" }]));
        assert_eq!(flatten_content(Some(&content)), "\nx");
    }

    #[test]
    fn test_empty_list_is_empty() {
        let content = parse(json!([]));
        assert_eq!(flatten_content(Some(&content)), "");
    }

    #[test]
    fn test_unrecognised_shape_uses_json_text() {
        assert_eq!(flatten_content(Some(&parse(json!(42)))), "42");
        assert_eq!(
            flatten_content(Some(&parse(json!({ "k": "v" })))),
            r#"{"k":"v"}"#
        );
    }
}
