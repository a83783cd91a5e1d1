//! OpenAI-compatible chat completion provider.

use super::{CompletionProvider, ProviderError};
use crate::config::CompletionConfig;
use crate::models::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;

/// Pinned so cost and latency stay bounded regardless of what callers send.
pub const COMPLETION_MODEL: &str = "gpt-4o-mini";
pub const MAX_TOKENS: u32 = 200;
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

pub struct OpenAiProvider {
    config: CompletionConfig,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn api_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.api_base_url.trim_end_matches('/')
        )
    }
}

/// Pull `choices[0].message.content` out of a completion payload. Anything
/// other than a string counts as no reply.
pub fn extract_reply(payload: &Value) -> Option<String> {
    payload
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let api_key = self.config.api_key.expose_secret();
        if api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "completion API key is not set".to_string(),
            ));
        }

        let request = ChatCompletionRequest {
            model: COMPLETION_MODEL,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, "Completion API responded");

        if !status.is_success() {
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(format!("{}: {}", e, body)))?;

        extract_reply(&payload).ok_or_else(|| ProviderError::MissingReply(payload.to_string()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
