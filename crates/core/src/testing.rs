//! Test doubles for the backend collaborators.

use crate::embeddings::Embedder;
use crate::error::BackendError;
use crate::models::{Chunk, ScoredMatch};
use crate::traits::VectorStore;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Deterministic local embedder: hashed character trigrams, L2-normalized,
/// so cosine scores behave like the real model's without any network.
pub(crate) struct FakeEmbedder {
    dimensions: usize,
}

impl FakeEmbedder {
    pub(crate) fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    pub(crate) fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimensions.max(1)];
        let lowered = text.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();

        if chars.is_empty() {
            return vector;
        }

        for window in chars.windows(3) {
            let token = window.iter().collect::<String>();
            let mut hash = 1469598103934665603u64;
            for byte in token.bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(1099511628211);
            }
            let bucket = (hash % vector.len() as u64) as usize;
            vector[bucket] += 1.0;
        }

        let magnitude = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }

        vector
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        Ok(texts.iter().map(|text| self.vector_for(text)).collect())
    }
}

#[derive(Default)]
struct IndexState {
    exists: bool,
    vectors: Vec<(Chunk, Vec<f32>)>,
}

/// In-memory stand-in for the vector backend. Cloning shares the underlying
/// index, so tests can hold a handle while the pipeline owns a store view.
#[derive(Default, Clone)]
pub(crate) struct SharedIndex {
    inner: Arc<Mutex<IndexState>>,
}

impl SharedIndex {
    pub(crate) fn store(&self) -> MemoryStore {
        MemoryStore {
            index: self.clone(),
        }
    }

    pub(crate) fn exists(&self) -> bool {
        self.inner.lock().unwrap().exists
    }

    pub(crate) fn vectors(&self) -> Vec<(Chunk, Vec<f32>)> {
        self.inner.lock().unwrap().vectors.clone()
    }
}

pub(crate) struct MemoryStore {
    index: SharedIndex,
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn create_index(&self, _dimensions: usize) -> Result<(), BackendError> {
        self.index.inner.lock().unwrap().exists = true;
        Ok(())
    }

    async fn delete_index(&self) -> Result<(), BackendError> {
        let mut state = self.index.inner.lock().unwrap();
        state.exists = false;
        state.vectors.clear();
        Ok(())
    }

    async fn upsert(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<(), BackendError> {
        if chunks.len() != embeddings.len() {
            return Err(BackendError::Request(format!(
                "embedding count {} doesn't match chunk count {}",
                embeddings.len(),
                chunks.len()
            )));
        }

        let mut state = self.index.inner.lock().unwrap();
        if !state.exists {
            return Err(BackendError::Request("index does not exist".to_string()));
        }
        for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
            state.vectors.push((chunk.clone(), embedding.clone()));
        }
        Ok(())
    }

    async fn similarity_search(
        &self,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredMatch>, BackendError> {
        let state = self.index.inner.lock().unwrap();
        if !state.exists {
            return Err(BackendError::Request("index does not exist".to_string()));
        }

        let mut matches: Vec<ScoredMatch> = state
            .vectors
            .iter()
            .map(|(chunk, embedding)| ScoredMatch {
                text: chunk.text.clone(),
                source_id: chunk.source_id.clone(),
                score: cosine(query_vector, embedding),
            })
            .collect();

        matches.sort_by(|left, right| right.score.total_cmp(&left.score));
        matches.truncate(top_k);
        Ok(matches)
    }
}

fn cosine(left: &[f32], right: &[f32]) -> f64 {
    let dot: f32 = left.iter().zip(right.iter()).map(|(a, b)| a * b).sum();
    let left_norm: f32 = left.iter().map(|v| v * v).sum::<f32>().sqrt();
    let right_norm: f32 = right.iter().map(|v| v * v).sum::<f32>().sqrt();
    if left_norm == 0.0 || right_norm == 0.0 {
        return 0.0;
    }
    f64::from(dot / (left_norm * right_norm))
}

/// Store that replays a fixed match list, for exercising score policy.
pub(crate) struct ScriptedStore {
    pub(crate) matches: Vec<ScoredMatch>,
}

#[async_trait]
impl VectorStore for ScriptedStore {
    async fn create_index(&self, _dimensions: usize) -> Result<(), BackendError> {
        Ok(())
    }

    async fn delete_index(&self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn upsert(&self, _chunks: &[Chunk], _embeddings: &[Vec<f32>]) -> Result<(), BackendError> {
        Ok(())
    }

    async fn similarity_search(
        &self,
        _query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredMatch>, BackendError> {
        let mut matches = self.matches.clone();
        matches.truncate(top_k);
        Ok(matches)
    }
}
