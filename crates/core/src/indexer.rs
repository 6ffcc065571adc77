use crate::chunker::chunk_documents;
use crate::embeddings::Embedder;
use crate::error::RebuildError;
use crate::loader::load_documents;
use crate::models::{ChunkingOptions, RebuildReport};
use crate::traits::VectorStore;
use chrono::Utc;
use std::path::PathBuf;
use tracing::info;

pub const EMBED_BATCH_SIZE: usize = 64;

pub struct IndexBuilder<E, S> {
    corpus_dir: PathBuf,
    embedder: E,
    store: S,
    options: ChunkingOptions,
}

impl<E, S> IndexBuilder<E, S>
where
    E: Embedder,
    S: VectorStore,
{
    pub fn new(corpus_dir: impl Into<PathBuf>, embedder: E, store: S) -> Self {
        Self {
            corpus_dir: corpus_dir.into(),
            embedder,
            store,
            options: ChunkingOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ChunkingOptions) -> Self {
        self.options = options;
        self
    }

    /// Full replace of the index from the current corpus. The previous
    /// contents are destroyed even when the corpus is empty; an empty corpus
    /// is a successful rebuild that leaves an empty index behind.
    ///
    /// Not atomic across backend calls: a failure during embedding or upsert
    /// can leave the index partially populated.
    pub async fn rebuild(&self) -> Result<RebuildReport, RebuildError> {
        let report = load_documents(&self.corpus_dir);
        let chunks = chunk_documents(&report.documents, &self.options)?;

        self.store.delete_index().await?;
        self.store.create_index(self.embedder.dimensions()).await?;

        if chunks.is_empty() {
            info!("corpus is empty; index recreated with no vectors");
            return Ok(RebuildReport {
                chunk_count: 0,
                skipped: report.skipped,
                rebuilt_at: Utc::now(),
            });
        }

        let mut embeddings = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|chunk| chunk.text.clone()).collect();
            embeddings.extend(self.embedder.embed_batch(&texts).await?);
        }

        self.store.upsert(&chunks, &embeddings).await?;

        info!(chunk_count = chunks.len(), "vector index rebuilt");
        Ok(RebuildReport {
            chunk_count: chunks.len(),
            skipped: report.skipped,
            rebuilt_at: Utc::now(),
        })
    }
}
