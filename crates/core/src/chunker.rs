use crate::error::IngestError;
use crate::models::{Chunk, ChunkingOptions, SourceDocument};

/// Splits text into windows of at most `max_chars` characters, each window
/// after the first sharing exactly `overlap_chars` with its predecessor.
/// Text no longer than `max_chars` comes back as a single piece.
pub fn split_text(text: &str, options: &ChunkingOptions) -> Result<Vec<String>, IngestError> {
    validate(options)?;

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= options.max_chars {
        return Ok(vec![text.to_string()]);
    }

    let stride = options.max_chars - options.overlap_chars;
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + options.max_chars).min(chars.len());
        pieces.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += stride;
    }

    Ok(pieces)
}

/// Windows never cross a document boundary; each chunk inherits its
/// document's `source_id`.
pub fn chunk_documents(
    documents: &[SourceDocument],
    options: &ChunkingOptions,
) -> Result<Vec<Chunk>, IngestError> {
    let mut chunks = Vec::new();

    for document in documents {
        for piece in split_text(&document.text, options)? {
            chunks.push(Chunk {
                source_id: document.source_id.clone(),
                text: piece,
            });
        }
    }

    Ok(chunks)
}

fn validate(options: &ChunkingOptions) -> Result<(), IngestError> {
    if options.max_chars == 0 {
        return Err(IngestError::InvalidChunkConfig(
            "max_chars must be positive".to_string(),
        ));
    }
    if options.overlap_chars >= options.max_chars {
        return Err(IngestError::InvalidChunkConfig(format!(
            "overlap {} must be smaller than chunk size {}",
            options.overlap_chars, options.max_chars
        )));
    }
    Ok(())
}
