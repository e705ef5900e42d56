// src/providers/mod.rs

use serde_json::Value;

use crate::errors::{GenError, Result};

pub mod chat;

pub use chat::ChatCompletionProvider;

/// Text produced by a completion call, with the round-trip time.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub latency_ms: u64,
}

/// A common trait for completion backends.
///
/// Note: We're not using async_trait here, so implementers must handle async directly.
pub trait CompletionProvider: Send + Sync {
    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Sends `prompt` as a single user message and returns the model's text.
    fn complete(&self, prompt: &str) -> impl std::future::Future<Output = Result<Completion>> + Send;
}

/// Pulls the generated text out of an OpenAI-style chat-completion body.
///
/// Accepts both `choices[0].message.content` and the older `choices[0].text`
/// shape. A top-level `error` object becomes [`GenError::ApiResponse`]; a
/// `choices` key always wins over `error`.
pub fn extract_completion_text(body: &Value) -> Result<String> {
    if let Some(choices) = body.get("choices") {
        let choice = choices
            .get(0)
            .ok_or_else(|| GenError::UnexpectedResponse(body.to_string()))?;

        if let Some(content) = choice
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
        {
            return Ok(content.to_string());
        }
        if let Some(text) = choice.get("text").and_then(Value::as_str) {
            return Ok(text.to_string());
        }
        return Err(GenError::UnexpectedResponse(body.to_string()));
    }

    if let Some(error) = body.get("error") {
        return Err(GenError::ApiResponse(error.to_string()));
    }

    Err(GenError::InvalidResponse(body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_content() {
        let body = json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "def test_a():\n    assert True"}}]
        });
        assert_eq!(
            extract_completion_text(&body).unwrap(),
            "def test_a():\n    assert True"
        );
    }

    #[test]
    fn test_plain_text_choice() {
        let body = json!({"choices": [{"text": "legacy output"}]});
        assert_eq!(extract_completion_text(&body).unwrap(), "legacy output");
    }

    #[test]
    fn test_message_wins_over_text() {
        let body = json!({"choices": [{"message": {"content": "new"}, "text": "old"}]});
        assert_eq!(extract_completion_text(&body).unwrap(), "new");
    }

    #[test]
    fn test_empty_content_is_returned_as_is() {
        let body = json!({"choices": [{"message": {"content": ""}}]});
        assert_eq!(extract_completion_text(&body).unwrap(), "");
    }

    #[test]
    fn test_error_payload() {
        let body = json!({"error": {"message": "Invalid API Key", "type": "invalid_request_error"}});
        match extract_completion_text(&body) {
            Err(GenError::ApiResponse(payload)) => assert!(payload.contains("Invalid API Key")),
            other => panic!("expected ApiResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_choices_take_priority_over_error() {
        let body = json!({"choices": [{"text": "ok"}], "error": "ignored"});
        assert_eq!(extract_completion_text(&body).unwrap(), "ok");
    }

    #[test]
    fn test_malformed_choice() {
        let body = json!({"choices": [{"message": {"role": "assistant"}}]});
        match extract_completion_text(&body) {
            Err(GenError::UnexpectedResponse(shape)) => assert!(shape.contains("assistant")),
            other => panic!("expected UnexpectedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_choices() {
        let body = json!({"choices": []});
        assert!(matches!(
            extract_completion_text(&body),
            Err(GenError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_unknown_shape() {
        let body = json!({"candidates": []});
        assert!(matches!(
            extract_completion_text(&body),
            Err(GenError::InvalidResponse(_))
        ));
    }
}
