pub mod answer;
pub mod chunker;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod indexer;
pub mod loader;
pub mod models;
pub mod retriever;
pub mod stores;
#[cfg(test)]
pub(crate) mod testing;
pub mod traits;

pub use answer::{
    AnswerSynthesizer, ANSWER_TOP_K, CONTEXT_DELIMITER, FALLBACK_ANSWER_MAX_CHARS, NO_ANSWER_TEXT,
    RELEVANCE_THRESHOLD,
};
pub use chunker::{chunk_documents, split_text};
pub use config::AppConfig;
pub use embeddings::{Embedder, OpenAiEmbedder, EMBEDDING_DIMENSIONS, EMBEDDING_MODEL};
pub use error::{BackendError, ConfigError, IngestError, RebuildError};
pub use generation::{HfTextGenerator, TextGenerator};
pub use indexer::{IndexBuilder, EMBED_BATCH_SIZE};
pub use loader::{list_documents, load_documents, SUPPORTED_EXTENSIONS};
pub use models::{
    Answer, Chunk, ChunkingOptions, DebugHit, LoadReport, RebuildReport, ScoredMatch, SkippedFile,
    SourceDocument,
};
pub use retriever::{Retriever, DEBUG_TOP_K};
pub use stores::QdrantStore;
pub use traits::VectorStore;
