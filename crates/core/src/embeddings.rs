use crate::error::BackendError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const EMBEDDING_DIMENSIONS: usize = 1536;

const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Embedding collaborator. Query-time and build-time callers must use the
/// same model; the index's dimensionality is fixed by `dimensions()`.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn dimensions(&self) -> usize;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, BackendError> {
        let input = [text.to_string()];
        let mut vectors = self.embed_batch(&input).await?;
        vectors
            .pop()
            .ok_or_else(|| BackendError::Request("embedding backend returned no vector".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
    index: usize,
    embedding: Vec<f32>,
}

pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbedder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: EMBEDDINGS_URL.to_string(),
            api_key: api_key.into(),
            model: EMBEDDING_MODEL.to_string(),
            dimensions: EMBEDDING_DIMENSIONS,
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::BackendResponse {
                backend: "openai".to_string(),
                details: response.status().to_string(),
            });
        }

        let payload: EmbeddingResponse = response.json().await?;
        if payload.data.len() != texts.len() {
            return Err(BackendError::Request(format!(
                "embedding count {} doesn't match input count {}",
                payload.data.len(),
                texts.len()
            )));
        }

        // The response order is not guaranteed; place rows by index.
        let mut vectors = vec![Vec::new(); texts.len()];
        for row in payload.data {
            if row.index >= vectors.len() {
                return Err(BackendError::Request(format!(
                    "embedding index {} out of range",
                    row.index
                )));
            }
            vectors[row.index] = row.embedding;
        }

        Ok(vectors)
    }
}
