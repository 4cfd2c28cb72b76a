#![allow(dead_code)]

use bible_study_service::config::{
    GenerationConfig, ObservabilityConfig, OpenAiConfig, ScriptureApiConfig, StudyConfig,
};
use bible_study_service::startup::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

/// Config pointing the scripture resolver at `scripture_url` and using the
/// mock language model unless `openai_url` is given.
pub fn test_config(scripture_url: &str, openai_url: Option<&str>) -> StudyConfig {
    StudyConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        scripture: ScriptureApiConfig {
            base_url: scripture_url.to_string(),
            timeout_secs: 2,
        },
        openai: OpenAiConfig {
            enabled: openai_url.is_some(),
            api_key: Secret::new("sk-test".to_string()),
            base_url: openai_url.unwrap_or("http://127.0.0.1:9").to_string(),
            model: "gpt-4.1-mini".to_string(),
        },
        generation: GenerationConfig { timeout_secs: 1 },
        observability: ObservabilityConfig {
            log_level: "warn".to_string(),
            otlp_endpoint: None,
        },
    }
}

impl TestApp {
    pub async fn spawn(scripture_url: &str) -> Self {
        Self::spawn_with(test_config(scripture_url, None)).await
    }

    pub async fn spawn_with(config: StudyConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn get(&self, path_and_query: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path_and_query))
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// A bible-api.com style payload, including fields the service must drop.
pub fn bible_api_payload(reference: &str, text: &str) -> Value {
    json!({
        "reference": reference,
        "verses": [{
            "book_id": "JHN",
            "book_name": "John",
            "chapter": 3,
            "verse": 16,
            "text": text
        }],
        "text": text,
        "translation_id": "kjv",
        "translation_name": "King James Version",
        "translation_note": "Public Domain"
    })
}

/// Sorted top-level keys of a JSON object.
pub fn keys(value: &Value) -> Vec<String> {
    let mut keys: Vec<String> = value
        .as_object()
        .expect("expected a JSON object")
        .keys()
        .cloned()
        .collect();
    keys.sort();
    keys
}
