use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One corpus file normalized to plain text. `source_id` is the filename,
/// unique within the corpus; `text` is never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub source_id: String,
    pub text: String,
}

/// An overlapping fixed-size window of a document's text; the unit of
/// embedding and of storage in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub source_id: String,
    pub text: String,
}

/// A retrieved chunk with its cosine-similarity score in [-1, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub text: String,
    pub source_id: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugHit {
    pub source_id: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub documents: Vec<SourceDocument>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug)]
pub struct RebuildReport {
    pub chunk_count: usize,
    pub skipped: Vec<SkippedFile>,
    pub rebuilt_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct ChunkingOptions {
    pub max_chars: usize,
    pub overlap_chars: usize,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            max_chars: 800,
            overlap_chars: 150,
        }
    }
}
