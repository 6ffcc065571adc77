use crate::embeddings::Embedder;
use crate::error::BackendError;
use crate::models::{DebugHit, ScoredMatch};
use crate::traits::VectorStore;

pub const DEBUG_TOP_K: usize = 5;

/// Read-only query side of the pipeline. Must be built with the same
/// embedding model the index was last rebuilt with.
pub struct Retriever<E, S> {
    embedder: E,
    store: S,
}

impl<E, S> Retriever<E, S>
where
    E: Embedder,
    S: VectorStore,
{
    pub fn new(embedder: E, store: S) -> Self {
        Self { embedder, store }
    }

    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredMatch>, BackendError> {
        if query.trim().is_empty() {
            return Err(BackendError::Request("query is empty".to_string()));
        }

        let query_vector = self.embedder.embed(query).await?;
        let mut matches = self.store.similarity_search(&query_vector, top_k).await?;
        matches.sort_by(|left, right| right.score.total_cmp(&left.score));
        matches.truncate(top_k);
        Ok(matches)
    }

    /// Raw top-5 hits as `{source_id, score}` pairs, bypassing relevance
    /// filtering and answer synthesis.
    pub async fn debug_search(&self, text: &str) -> Result<Vec<DebugHit>, BackendError> {
        let matches = self.search(text, DEBUG_TOP_K).await?;
        Ok(matches
            .into_iter()
            .map(|hit| DebugHit {
                source_id: hit.source_id,
                score: hit.score,
            })
            .collect())
    }
}
