//! Resend transactional email provider.

use super::{EmailMessage, EmailProvider, ProviderError, ProviderResponse};
use crate::config::EmailConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

pub struct ResendProvider {
    config: EmailConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    #[serde(default)]
    id: Option<String>,
}

impl ResendProvider {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send(&self, email: &EmailMessage) -> Result<ProviderResponse, ProviderError> {
        let api_key = self.config.api_key.expose_secret();
        if api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "email API key is not set".to_string(),
            ));
        }

        let request = SendEmailRequest {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            text: &email.text,
        };

        let url = format!("{}/emails", self.config.api_base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        // Delivery is confirmed by the status alone; the id is informational.
        let provider_id = serde_json::from_str::<SendEmailResponse>(&body)
            .ok()
            .and_then(|r| r.id);

        tracing::info!(
            provider_id = provider_id.as_deref().unwrap_or("-"),
            "Email accepted by Resend"
        );

        Ok(ProviderResponse::success(provider_id))
    }

    fn name(&self) -> &'static str {
        "resend"
    }
}
