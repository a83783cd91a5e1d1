pub mod metrics;
pub mod providers;

pub use metrics::{get_metrics, init_metrics, record_lead, record_provider_call};
pub use providers::{
    CompletionProvider, EmailMessage, EmailProvider, MockCompletionProvider, MockEmailProvider,
    OpenAiProvider, ProviderError, ProviderResponse, ResendProvider,
};
