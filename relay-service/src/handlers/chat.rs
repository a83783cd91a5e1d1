use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{append_turn, normalize_history, ChatMessage, ConversationTurn};
use crate::services::{record_provider_call, ProviderError};
use crate::startup::AppState;

/// Returned when the visitor sent nothing to answer.
pub const EMPTY_INPUT_REPLY: &str = "Please type a message and I'll do my best to help.";

/// Returned when the completion came back without usable text.
pub const NO_REPLY_APOLOGY: &str =
    "Sorry, I couldn't come up with a reply just now. Please try again in a moment.";

/// Returned for every other failure.
pub const GENERIC_ERROR_REPLY: &str =
    "Sorry, something went wrong on our side. Please try again shortly.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Kept loose so a non-string input is rejected like an empty one.
    #[serde(default)]
    pub input: Option<Value>,
    /// Echoed back verbatim on rejection, so it is not parsed into turns.
    /// An explicit `null` stays `null`; only an absent field becomes `[]`.
    #[serde(default = "empty_history")]
    pub history: Value,
}

fn empty_history() -> Value {
    Value::Array(Vec::new())
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub history: Value,
}

fn respond(status: StatusCode, reply: &str, history: Value) -> (StatusCode, Json<ChatResponse>) {
    (
        status,
        Json(ChatResponse {
            reply: reply.to_string(),
            history,
        }),
    )
}

/// Relay one visitor message to the completion API.
///
/// The caller owns the conversation: it sends the full history each time and
/// receives it back with the assistant's turn appended. Nothing is stored.
#[tracing::instrument(skip_all)]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::info!(error = %rejection.body_text(), "Unreadable chat request");
            return respond(
                StatusCode::BAD_REQUEST,
                EMPTY_INPUT_REPLY,
                empty_history(),
            );
        }
    };

    let history = request.history;

    let Some(input) = request
        .input
        .as_ref()
        .and_then(Value::as_str)
        .filter(|input| !input.trim().is_empty())
    else {
        return respond(StatusCode::BAD_REQUEST, EMPTY_INPUT_REPLY, history);
    };

    let prior = normalize_history(&history);
    let mut messages = Vec::with_capacity(prior.len() + 2);
    messages.push(ChatMessage::system(&*state.persona));
    messages.extend(prior);
    messages.push(ChatMessage::user(input));

    let provider = state.completion_provider.name();

    match state.completion_provider.complete(&messages).await {
        Ok(reply) => {
            record_provider_call(provider, "success");
            tracing::info!(turns = messages.len(), "Chat reply relayed");

            let history = append_turn(&history, &ConversationTurn::ai(&reply));
            (StatusCode::OK, Json(ChatResponse { reply, history }))
        }
        Err(ProviderError::MissingReply(upstream_payload)) => {
            record_provider_call(provider, "no_reply");
            tracing::error!(
                upstream_payload = %upstream_payload,
                "Completion API returned no reply text"
            );
            respond(StatusCode::INTERNAL_SERVER_ERROR, NO_REPLY_APOLOGY, history)
        }
        Err(e) => {
            record_provider_call(provider, "error");
            tracing::error!(error = %e, "Chat relay failed");
            respond(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_REPLY, history)
        }
    }
}
