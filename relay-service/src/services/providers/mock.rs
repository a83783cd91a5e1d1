//! Mock provider implementations for testing.

use super::{
    CompletionProvider, EmailMessage, EmailProvider, ProviderError, ProviderResponse,
};
use crate::models::ChatMessage;
use async_trait::async_trait;
use std::sync::Mutex;

/// Completion provider that answers with a canned result and records every
/// conversation it was asked to complete.
pub struct MockCompletionProvider {
    reply: Option<String>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockCompletionProvider {
    /// Always answers with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always behaves like a completion with no usable content.
    pub fn without_reply() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }

        self.reply.clone().ok_or_else(|| {
            ProviderError::MissingReply(r#"{"choices":[{"message":{}}]}"#.to_string())
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Email provider that records messages instead of sending them.
pub struct MockEmailProvider {
    succeed: bool,
    sent: Mutex<Vec<EmailMessage>>,
}

impl MockEmailProvider {
    pub fn new(succeed: bool) -> Self {
        Self {
            succeed,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, email: &EmailMessage) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }

        if self.succeed {
            Ok(ProviderResponse::success(Some("mock".to_string())))
        } else {
            Err(ProviderError::Upstream {
                status: 500,
                body: "mock email provider failure".to_string(),
            })
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
