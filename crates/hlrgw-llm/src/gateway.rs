//! OpenAI-compatible gateway strategy.

use crate::error::DispatchError;
use crate::traits::{CompletionClient, TEMPERATURE};
use async_trait::async_trait;
use hlrgw_types::ChatMessage;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;

/// Client for an OpenAI-style `/v1/chat/completions` gateway.
///
/// The URL and API token are optional at construction so that a
/// misconfigured deployment surfaces a per-request internal error instead
/// of refusing to boot; the gateway keeps serving health checks either way.
pub struct OpenAICompatClient {
    http_client: reqwest::Client,
    gateway_url: Option<String>,
    api_token: Option<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAICompatClient {
    pub fn new(
        gateway_url: Option<String>,
        api_token: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            gateway_url: gateway_url.filter(|s| !s.is_empty()),
            api_token: api_token.filter(|s| !s.is_empty()),
            model: model.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAICompatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, DispatchError> {
        let (url, token) = match (&self.gateway_url, &self.api_token) {
            (Some(url), Some(token)) => (url, token),
            _ => return Err(DispatchError::NotConfigured),
        };

        let payload = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_tokens": max_tokens,
            "stream": false,
        });

        let response = self
            .http_client
            .post(format!("{}/v1/chat/completions", url))
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "gateway completion response");

        // The gateway's own capacity limits are structural; classify before
        // generic error handling.
        if status.as_u16() == 429 || status.as_u16() == 403 {
            return Err(DispatchError::ProviderQuota(status.as_u16()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let raw: CompletionResponse = response.json().await?;
        let content = raw
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(DispatchError::EmptyResponse);
        }
        Ok(content)
    }
}
