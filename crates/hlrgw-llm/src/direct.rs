//! Direct model-inference binding.
//!
//! Posts the composed message list straight to a local inference endpoint.
//! The binding answers in one of several shapes depending on the model
//! runtime, so text extraction tries each in a fixed precedence order.

use crate::error::DispatchError;
use crate::traits::{CompletionClient, TEMPERATURE};
use async_trait::async_trait;
use hlrgw_types::ChatMessage;
use serde_json::Value;

pub struct DirectBindingClient {
    http_client: reqwest::Client,
    binding_url: Option<String>,
    model: String,
}

impl DirectBindingClient {
    pub fn new(binding_url: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            binding_url,
            model: model.into(),
        }
    }
}

/// Extract text from a binding response: `response` (string), then
/// `result`, then `text`, in that order.
fn extract_text(value: &Value) -> String {
    if let Some(s) = value.get("response").and_then(Value::as_str) {
        return s.to_string();
    }
    for field in ["result", "text"] {
        if let Some(s) = value.get(field).and_then(Value::as_str) {
            return s.to_string();
        }
    }
    String::new()
}

#[async_trait]
impl CompletionClient for DirectBindingClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, DispatchError> {
        let url = self
            .binding_url
            .as_deref()
            .ok_or(DispatchError::NotConfigured)?;

        let payload = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": max_tokens,
            "temperature": TEMPERATURE,
            "stream": false,
        });

        let response = self.http_client.post(url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = response.json().await?;
        let content = extract_text(&raw);
        if content.is_empty() {
            return Err(DispatchError::EmptyResponse);
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_field_takes_precedence() {
        let value = json!({ "response": "a", "result": "b", "text": "c" });
        assert_eq!(extract_text(&value), "a");
    }

    #[test]
    fn falls_back_to_result_then_text() {
        assert_eq!(extract_text(&json!({ "result": "b", "text": "c" })), "b");
        assert_eq!(extract_text(&json!({ "text": "c" })), "c");
    }

    #[test]
    fn non_string_response_field_is_skipped() {
        let value = json!({ "response": { "nested": true }, "text": "c" });
        assert_eq!(extract_text(&value), "c");
    }

    #[test]
    fn unknown_shapes_extract_nothing() {
        assert_eq!(extract_text(&json!({ "output": "x" })), "");
    }
}
