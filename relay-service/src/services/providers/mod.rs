//! Upstream provider abstractions and implementations.
//!
//! The relay talks to exactly two third parties: a chat-completion API and a
//! transactional-email API. Each sits behind a trait so the router can be
//! exercised against in-process mocks.

pub mod mock;
pub mod openai;
pub mod resend;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ChatMessage;

pub use mock::{MockCompletionProvider, MockEmailProvider};
pub use openai::OpenAiProvider;
pub use resend::ResendProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    /// The completion succeeded at the HTTP level but carried no usable reply.
    #[error("Completion contained no reply text: {0}")]
    MissingReply(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub provider_id: Option<String>,
}

impl ProviderResponse {
    pub fn success(provider_id: Option<String>) -> Self {
        Self { provider_id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
}

/// Turns a role-tagged conversation into the assistant's next reply.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError>;

    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<ProviderResponse, ProviderError>;

    fn name(&self) -> &'static str;
}
