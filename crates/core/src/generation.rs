use crate::error::BackendError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Text-generation collaborator. May be unavailable; callers are expected to
/// recover locally rather than fail the request.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Hugging Face inference-style endpoint: `{"inputs": prompt}` in,
/// `[{"generated_text": ...}]` out.
pub struct HfTextGenerator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HfTextGenerator {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl TextGenerator for HfTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let mut request = self.client.post(&self.endpoint).json(&json!({
            "inputs": prompt,
            "parameters": { "max_new_tokens": 256 },
        }));

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(BackendError::BackendResponse {
                backend: "generation".to_string(),
                details: response.status().to_string(),
            });
        }

        let payload: Value = response.json().await?;
        let generated = payload
            .pointer("/0/generated_text")
            .and_then(Value::as_str)
            .map(|text| text.trim().to_string());

        match generated {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(BackendError::Request(
                "generation backend returned no text".to_string(),
            )),
        }
    }
}
