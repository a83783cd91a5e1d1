use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use validator::Validate;

use crate::models::{is_bot_submission, Enquiry, LeadRequest};
use crate::services::{record_lead, record_provider_call, EmailMessage};
use crate::startup::AppState;

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub success: bool,
}

fn respond(status: StatusCode, success: bool) -> (StatusCode, Json<LeadResponse>) {
    (status, Json(LeadResponse { success }))
}

/// Forward a contact-form enquiry to the business inbox.
#[tracing::instrument(skip_all)]
pub async fn lead(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<LeadResponse>) {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            tracing::info!(error = %rejection.body_text(), "Unreadable enquiry");
            record_lead("invalid");
            return respond(StatusCode::BAD_REQUEST, false);
        }
    };

    // Bots get the same answer as people so they have nothing to learn from.
    if is_bot_submission(&payload) {
        tracing::info!("Discarding enquiry with populated honeypot");
        record_lead("honeypot");
        return respond(StatusCode::OK, true);
    }

    let request = match serde_json::from_value::<LeadRequest>(payload) {
        Ok(request) => request,
        Err(e) => {
            tracing::info!(error = %e, "Enquiry fields have the wrong shape");
            record_lead("invalid");
            return respond(StatusCode::BAD_REQUEST, false);
        }
    };

    let enquiry = Enquiry::from(request);
    if let Err(errors) = enquiry.validate() {
        tracing::info!(errors = %errors, "Enquiry failed validation");
        record_lead("invalid");
        return respond(StatusCode::BAD_REQUEST, false);
    }

    let email = EmailMessage {
        from: state.lead_sender.clone(),
        to: vec![state.lead_recipient.clone()],
        subject: enquiry.subject(),
        text: enquiry.email_body(),
    };

    let provider = state.email_provider.name();

    match state.email_provider.send(&email).await {
        Ok(response) => {
            record_provider_call(provider, "success");
            record_lead("sent");
            tracing::info!(
                business_name = %enquiry.business_name,
                provider_id = response.provider_id.as_deref().unwrap_or("-"),
                "Enquiry emailed"
            );
            respond(StatusCode::OK, true)
        }
        Err(e) => {
            record_provider_call(provider, "error");
            record_lead("failed");
            tracing::error!(error = %e, "Failed to send enquiry email");
            respond(StatusCode::INTERNAL_SERVER_ERROR, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MockCompletionProvider, MockEmailProvider};
    use crate::startup::build_router;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(email: Arc<MockEmailProvider>) -> AppState {
        AppState {
            persona: Arc::from("persona"),
            lead_sender: "Website <site@example.com>".to_string(),
            lead_recipient: "owner@example.com".to_string(),
            completion_provider: Arc::new(MockCompletionProvider::replying("unused")),
            email_provider: email,
        }
    }

    async fn post_lead(state: AppState, body: Value) -> (StatusCode, Value) {
        let response = build_router(state, &[])
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/lead")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn honeypot_short_circuits_without_sending() {
        let email = Arc::new(MockEmailProvider::new(true));
        let (status, body) = post_lead(
            state(email.clone()),
            json!({"honeypot": "gotcha", "businessName": "", "email": "nope"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
        assert!(email.sent().is_empty());
    }

    #[tokio::test]
    async fn honeypot_wins_over_malformed_fields() {
        for submission in [
            json!({"honeypot": "bot", "businessName": 12, "email": "x"}),
            json!({"honeypot": true, "businessName": "Acme", "email": "a@b.com"}),
            json!({"honeypot": ["x"], "message": {"nested": 1}}),
        ] {
            let email = Arc::new(MockEmailProvider::new(true));
            let (status, body) = post_lead(state(email.clone()), submission.clone()).await;

            assert_eq!(status, StatusCode::OK, "{submission}");
            assert_eq!(body, json!({"success": true}));
            assert!(email.sent().is_empty());
        }
    }

    #[tokio::test]
    async fn invalid_submissions_are_rejected() {
        for submission in [
            json!({"businessName": "", "email": "a@b.com"}),
            json!({"businessName": "   ", "email": "a@b.com"}),
            json!({"email": "a@b.com"}),
            json!({"businessName": "Acme", "email": "not-an-email"}),
            json!({"businessName": "Acme", "email": "  "}),
            json!({"businessName": "Acme"}),
            json!({"businessName": 12, "email": "a@b.com"}),
            json!(["not", "an", "object"]),
            json!({"honeypot": "  ", "businessName": 12, "email": "a@b.com"}),
        ] {
            let email = Arc::new(MockEmailProvider::new(true));
            let (status, body) = post_lead(state(email.clone()), submission.clone()).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{submission}");
            assert_eq!(body, json!({"success": false}));
            assert!(email.sent().is_empty());
        }
    }

    #[tokio::test]
    async fn valid_submission_sends_one_email() {
        let email = Arc::new(MockEmailProvider::new(true));
        let (status, body) = post_lead(
            state(email.clone()),
            json!({
                "businessName": " Acme Plumbing ",
                "website": "example.com",
                "email": "a@b.com",
                "message": "Burst pipe"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let sent = email.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, "Website <site@example.com>");
        assert_eq!(sent[0].to, vec!["owner@example.com".to_string()]);
        assert!(sent[0].subject.contains("Acme Plumbing"));
        assert!(sent[0].text.contains("https://example.com"));
        assert!(sent[0].text.contains("Phone: -"));
        assert!(sent[0].text.contains("Burst pipe"));
    }

    #[tokio::test]
    async fn explicit_scheme_is_passed_through() {
        let email = Arc::new(MockEmailProvider::new(true));
        post_lead(
            state(email.clone()),
            json!({"businessName": "Acme", "email": "a@b.com", "website": "http://acme.example"}),
        )
        .await;

        assert!(email.sent()[0].text.contains("Website: http://acme.example\n"));
    }

    #[tokio::test]
    async fn provider_failure_is_a_server_error() {
        let email = Arc::new(MockEmailProvider::new(false));
        let (status, body) = post_lead(
            state(email.clone()),
            json!({"businessName": "Acme", "email": "a@b.com"}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"success": false}));
        assert_eq!(email.sent().len(), 1);
    }
}
