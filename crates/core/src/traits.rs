use crate::error::BackendError;
use crate::models::{Chunk, ScoredMatch};
use async_trait::async_trait;

/// Vector index capability. One named index per store instance; contents are
/// replaced wholesale at rebuild, never patched per file.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the index with the given embedding dimensionality and a cosine
    /// metric. An index that already exists is success, not an error.
    async fn create_index(&self, dimensions: usize) -> Result<(), BackendError>;

    /// Delete the index. A missing index is success, not an error.
    async fn delete_index(&self) -> Result<(), BackendError>;

    /// Insert chunks with their embeddings; `chunks` and `embeddings` pair up
    /// positionally and must have the same length.
    async fn upsert(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<(), BackendError>;

    /// Nearest-neighbor search, best matches first, at most `top_k` results.
    /// An empty index yields an empty list.
    async fn similarity_search(
        &self,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredMatch>, BackendError>;
}
