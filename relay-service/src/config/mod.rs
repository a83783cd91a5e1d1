use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Operator persona shipped with the binary. `PERSONA_PATH` swaps it out
/// without a rebuild.
const DEFAULT_PERSONA: &str = include_str!("../../prompts/system_persona.txt");

const DEFAULT_COMPLETION_API_BASE: &str = "https://api.openai.com";
const DEFAULT_EMAIL_API_BASE: &str = "https://api.resend.com";

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub completion: CompletionConfig,
    pub email: EmailConfig,
    pub persona: PersonaConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    pub api_key: Secret<String>,
    pub api_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub api_key: Secret<String>,
    pub api_base_url: String,
    /// Sender shown on every enquiry email.
    pub from_email: String,
    /// Inbox that receives enquiries.
    pub to_email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonaConfig {
    /// Optional file whose contents replace the bundled persona.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(RelayConfig {
            common: common_config,
            completion: CompletionConfig {
                api_key: Secret::new(get_env("OPENAI_API_KEY", Some(""), is_prod)?),
                api_base_url: get_env("OPENAI_API_BASE", Some(DEFAULT_COMPLETION_API_BASE), false)?,
            },
            email: EmailConfig {
                api_key: Secret::new(get_env("RESEND_API_KEY", Some(""), is_prod)?),
                api_base_url: get_env("RESEND_API_BASE", Some(DEFAULT_EMAIL_API_BASE), false)?,
                from_email: get_env(
                    "LEAD_FROM_EMAIL",
                    Some("Website Enquiries <enquiries@example.com>"),
                    is_prod,
                )?,
                to_email: get_env("LEAD_TO_EMAIL", Some("owner@example.com"), is_prod)?,
            },
            persona: PersonaConfig {
                path: env::var("PERSONA_PATH").ok().filter(|p| !p.trim().is_empty()),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
            },
        })
    }

    /// Names of upstream credentials that are not configured. The relay still
    /// starts without them outside production; the affected route then fails
    /// with a 5xx on every call.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.completion.api_key.expose_secret().trim().is_empty() {
            missing.push("OPENAI_API_KEY");
        }
        if self.email.api_key.expose_secret().trim().is_empty() {
            missing.push("RESEND_API_KEY");
        }
        missing
    }
}

impl PersonaConfig {
    /// Resolve the system persona text.
    pub fn load_persona(&self) -> Result<String, AppError> {
        match &self.path {
            Some(path) => {
                let persona = std::fs::read_to_string(path).map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "Failed to read persona file {}: {}",
                        path,
                        e
                    ))
                })?;
                if persona.trim().is_empty() {
                    return Err(AppError::ConfigError(anyhow::anyhow!(
                        "Persona file {} is empty",
                        path
                    )));
                }
                Ok(persona.trim().to_string())
            }
            None => Ok(DEFAULT_PERSONA.trim().to_string()),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty() && *o != "*")
        .map(str::to_string)
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
