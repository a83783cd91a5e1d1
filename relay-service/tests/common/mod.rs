#![allow(dead_code)]

use relay_service::config::{
    CompletionConfig, CorsConfig, EmailConfig, PersonaConfig, RelayConfig,
};
use relay_service::startup::Application;
use secrecy::Secret;
use service_core::config::Config;
use wiremock::MockServer;

pub const TEST_COMPLETION_KEY: &str = "sk-test";
pub const TEST_EMAIL_KEY: &str = "re_test";
pub const TEST_FROM_EMAIL: &str = "Website <enquiries@test.example>";
pub const TEST_TO_EMAIL: &str = "owner@test.example";

pub struct TestApp {
    pub address: String,
    pub completion_server: MockServer,
    pub email_server: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let completion_server = MockServer::start().await;
        let email_server = MockServer::start().await;

        let config = RelayConfig {
            common: Config {
                port: 0, // Random port
                ..Config::default()
            },
            completion: CompletionConfig {
                api_key: Secret::new(TEST_COMPLETION_KEY.to_string()),
                api_base_url: completion_server.uri(),
            },
            email: EmailConfig {
                api_key: Secret::new(TEST_EMAIL_KEY.to_string()),
                api_base_url: email_server.uri(),
                from_email: TEST_FROM_EMAIL.to_string(),
                to_email: TEST_TO_EMAIL.to_string(),
            },
            persona: PersonaConfig { path: None },
            cors: CorsConfig {
                allowed_origins: vec![],
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(format!("{}/health", address)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            completion_server,
            email_server,
            client,
        }
    }

    pub async fn post_chat(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/chat", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_lead(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/lead", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
