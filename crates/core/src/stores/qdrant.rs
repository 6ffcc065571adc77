use crate::error::BackendError;
use crate::models::{Chunk, ScoredMatch};
use crate::traits::VectorStore;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const UPSERT_BATCH_SIZE: usize = 100;

/// Qdrant collection over its HTTP API, with a cosine metric. Point ids are
/// the chunk's position in the rebuild batch; valid only because every
/// rebuild starts from a freshly recreated collection.
pub struct QdrantStore {
    client: Client,
    endpoint: String,
    collection: String,
    vector_size: usize,
}

impl QdrantStore {
    pub fn new(
        endpoint: impl Into<String>,
        collection: impl Into<String>,
        vector_size: usize,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            collection: collection.into(),
            vector_size,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.endpoint, self.collection)
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn create_index(&self, dimensions: usize) -> Result<(), BackendError> {
        if dimensions != self.vector_size {
            return Err(BackendError::Request(format!(
                "configured vector size {} does not match requested {}",
                self.vector_size, dimensions
            )));
        }

        let response = self
            .client
            .put(self.collection_url())
            .json(&json!({
                "vectors": { "size": dimensions, "distance": "Cosine" }
            }))
            .send()
            .await?;

        // Qdrant answers 409 when the collection already exists.
        if response.status().is_success() || response.status() == StatusCode::CONFLICT {
            return Ok(());
        }

        Err(BackendError::BackendResponse {
            backend: "qdrant".to_string(),
            details: response.status().to_string(),
        })
    }

    async fn delete_index(&self) -> Result<(), BackendError> {
        let response = self.client.delete(self.collection_url()).send().await?;

        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        Err(BackendError::BackendResponse {
            backend: "qdrant".to_string(),
            details: response.status().to_string(),
        })
    }

    async fn upsert(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<(), BackendError> {
        if chunks.len() != embeddings.len() {
            return Err(BackendError::Request(format!(
                "embedding count {} doesn't match chunk count {}",
                embeddings.len(),
                chunks.len()
            )));
        }

        let points = chunks
            .iter()
            .zip(embeddings.iter())
            .enumerate()
            .map(|(position, (chunk, embedding))| {
                if embedding.len() != self.vector_size {
                    return Err(BackendError::Request(format!(
                        "embedding dimension {} != {}",
                        embedding.len(),
                        self.vector_size
                    )));
                }

                Ok(json!({
                    "id": position as u64,
                    "vector": embedding,
                    "payload": {
                        "source_id": chunk.source_id,
                        "text": chunk.text,
                    },
                }))
            })
            .collect::<Result<Vec<_>, BackendError>>()?;

        for batch in points.chunks(UPSERT_BATCH_SIZE) {
            let response = self
                .client
                .put(format!("{}/points?wait=true", self.collection_url()))
                .json(&json!({ "points": batch }))
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(BackendError::BackendResponse {
                    backend: "qdrant".to_string(),
                    details: response.status().to_string(),
                });
            }
        }

        Ok(())
    }

    async fn similarity_search(
        &self,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredMatch>, BackendError> {
        if query_vector.len() != self.vector_size {
            return Err(BackendError::Request(format!(
                "query vector dim {} is not {}",
                query_vector.len(),
                self.vector_size
            )));
        }

        let response = self
            .client
            .post(format!("{}/points/search", self.collection_url()))
            .json(&json!({
                "vector": query_vector,
                "limit": top_k,
                "with_payload": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::BackendResponse {
                backend: "qdrant".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        let hits = parsed
            .pointer("/result")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut matches = Vec::new();
        for hit in hits {
            let score = hit.pointer("/score").and_then(Value::as_f64).unwrap_or(0.0);
            let source_id = hit
                .pointer("/payload/source_id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let text = hit
                .pointer("/payload/text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            matches.push(ScoredMatch {
                text,
                source_id,
                score,
            });
        }

        Ok(matches)
    }
}
