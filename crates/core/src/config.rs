use crate::error::ConfigError;

pub const DEFAULT_INDEX_NAME: &str = "portfolio_vector_db";
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6333";
pub const DEFAULT_GENERATION_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/google/flan-t5-small";

/// Process-wide configuration, resolved once and passed into the pipeline
/// constructors. Operations never read the environment mid-flight.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub index_name: String,
    pub qdrant_url: String,
    pub generation_endpoint: String,
    pub generation_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            openai_api_key: required_var("OPENAI_API_KEY")?,
            index_name: optional_var("VECTOR_STORE_NAME")
                .unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string()),
            qdrant_url: optional_var("QDRANT_URL")
                .unwrap_or_else(|| DEFAULT_QDRANT_URL.to_string()),
            generation_endpoint: optional_var("GENERATION_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_GENERATION_ENDPOINT.to_string()),
            generation_api_key: optional_var("HF_API_TOKEN"),
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    optional_var(name).ok_or(ConfigError::MissingVar(name))
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|value| {
        let trimmed = value.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}
