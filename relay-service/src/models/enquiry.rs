//! Contact-form enquiries captured on the website.

use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError};

/// Placeholder written into the email body for blank optional fields.
const EMPTY_FIELD: &str = "-";

/// Raw form submission as posted by the website. The honeypot is checked on
/// the untyped body before this is parsed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// True when the hidden anti-automation field was filled in. Any value other
/// than null or a blank string counts, whatever the rest of the body holds.
pub fn is_bot_submission(payload: &Value) -> bool {
    match payload.get("honeypot") {
        None | Some(Value::Null) => false,
        Some(Value::String(honeypot)) => !honeypot.trim().is_empty(),
        Some(_) => true,
    }
}

/// A trimmed, normalized enquiry ready to be emailed.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct Enquiry {
    #[validate(length(min = 1, message = "Business name cannot be empty"))]
    pub business_name: String,
    pub website: String,
    #[validate(custom(function = "validate_email_shape"))]
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl From<LeadRequest> for Enquiry {
    fn from(request: LeadRequest) -> Self {
        let trimmed = |value: Option<String>| value.map(|v| v.trim().to_string()).unwrap_or_default();

        Self {
            business_name: trimmed(request.business_name),
            website: normalize_website(&trimmed(request.website)),
            email: trimmed(request.email),
            phone: trimmed(request.phone),
            message: trimmed(request.message),
        }
    }
}

impl Enquiry {
    pub fn subject(&self) -> String {
        format!("New website enquiry: {}", self.business_name)
    }

    /// Plain-text email body sent to the business inbox.
    pub fn email_body(&self) -> String {
        format!(
            "New enquiry from the website\n\
             \n\
             Business name: {}\n\
             Website: {}\n\
             Email: {}\n\
             Phone: {}\n\
             \n\
             Message:\n\
             {}\n",
            self.business_name,
            or_placeholder(&self.website),
            self.email,
            or_placeholder(&self.phone),
            or_placeholder(&self.message),
        )
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        EMPTY_FIELD
    } else {
        value
    }
}

/// Prefix bare domains with `https://`; leave explicit schemes alone.
pub fn normalize_website(website: &str) -> String {
    if website.is_empty() {
        return String::new();
    }
    let lower = website.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        website.to_string()
    } else {
        format!("https://{}", website)
    }
}

/// Minimal `local@domain.tld` check: one `@`, no whitespace, and a dot inside
/// the domain with something on both sides of it.
pub fn is_valid_email_shape(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < domain.len() - 1)
}

fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    if is_valid_email_shape(email) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_shape");
        err.message = Some("Invalid email address".into());
        Err(err)
    }
}
