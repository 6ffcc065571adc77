use crate::embeddings::Embedder;
use crate::error::BackendError;
use crate::generation::TextGenerator;
use crate::models::{Answer, ScoredMatch};
use crate::retriever::Retriever;
use crate::traits::VectorStore;
use std::collections::HashSet;
use tracing::warn;

// Policy constants inherited from the product: fixed values, not derived
// from the score distribution.
pub const ANSWER_TOP_K: usize = 4;
pub const RELEVANCE_THRESHOLD: f64 = 0.15;
pub const NO_ANSWER_TEXT: &str = "I don't know. Please upload related documents.";
pub const CONTEXT_DELIMITER: &str = "\n\n---\n\n";
pub const FALLBACK_ANSWER_MAX_CHARS: usize = 1000;

pub struct AnswerSynthesizer<E, S, G> {
    retriever: Retriever<E, S>,
    generator: G,
}

impl<E, S, G> AnswerSynthesizer<E, S, G>
where
    E: Embedder,
    S: VectorStore,
    G: TextGenerator,
{
    pub fn new(retriever: Retriever<E, S>, generator: G) -> Self {
        Self {
            retriever,
            generator,
        }
    }

    /// Answers strictly from retrieved context. Retrieval-backend failures
    /// surface as errors; generation failures never do — the bounded context
    /// itself becomes the answer instead.
    pub async fn answer(&self, question: &str) -> Result<Answer, BackendError> {
        let matches = self.retriever.search(question, ANSWER_TOP_K).await?;
        let relevant: Vec<ScoredMatch> = matches
            .into_iter()
            .filter(|hit| hit.score >= RELEVANCE_THRESHOLD)
            .collect();

        if relevant.is_empty() {
            return Ok(Answer {
                text: NO_ANSWER_TEXT.to_string(),
                sources: Vec::new(),
            });
        }

        let context = relevant
            .iter()
            .map(|hit| hit.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_DELIMITER);

        let text = match self.generator.generate(&build_prompt(&context, question)).await {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "generation backend failed; answering with raw context");
                truncate_chars(&context, FALLBACK_ANSWER_MAX_CHARS)
            }
        };

        let mut seen = HashSet::new();
        let sources = relevant
            .iter()
            .filter(|hit| seen.insert(hit.source_id.clone()))
            .map(|hit| hit.source_id.clone())
            .collect();

        Ok(Answer { text, sources })
    }
}

fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer concisely using ONLY the context below.\n\nCONTEXT:\n{context}\n\nQUESTION: {question}\nANSWER:"
    )
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeEmbedder, ScriptedStore};
    use async_trait::async_trait;

    struct FakeGenerator {
        reply: Option<String>,
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
            assert!(prompt.contains("CONTEXT:"));
            self.reply
                .clone()
                .ok_or_else(|| BackendError::Request("generator offline".to_string()))
        }
    }

    fn scripted_match(source_id: &str, text: &str, score: f64) -> ScoredMatch {
        ScoredMatch {
            text: text.to_string(),
            source_id: source_id.to_string(),
            score,
        }
    }

    fn synthesizer(
        matches: Vec<ScoredMatch>,
        reply: Option<String>,
    ) -> AnswerSynthesizer<FakeEmbedder, ScriptedStore, FakeGenerator> {
        let retriever = Retriever::new(FakeEmbedder::new(4), ScriptedStore { matches });
        AnswerSynthesizer::new(retriever, FakeGenerator { reply })
    }

    #[tokio::test]
    async fn threshold_keeps_exactly_the_relevant_matches() {
        struct RecordingGenerator;

        #[async_trait]
        impl TextGenerator for RecordingGenerator {
            async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
                assert!(prompt.contains("kept one"));
                assert!(prompt.contains("kept two"));
                assert!(!prompt.contains("dropped"));
                Ok("grounded answer".to_string())
            }
        }

        let matches = vec![
            scripted_match("a.txt", "kept one", 0.20),
            scripted_match("b.txt", "kept two", 0.16),
            scripted_match("c.txt", "dropped low", 0.14),
            scripted_match("d.txt", "dropped lower", 0.05),
        ];

        let retriever = Retriever::new(FakeEmbedder::new(4), ScriptedStore { matches });
        let synthesizer = AnswerSynthesizer::new(retriever, RecordingGenerator);
        let answer = synthesizer.answer("what was kept?").await.unwrap();

        assert_eq!(answer.text, "grounded answer");
        assert_eq!(answer.sources, vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn zero_survivors_yield_the_sentinel_answer() {
        let matches = vec![
            scripted_match("a.txt", "weak", 0.10),
            scripted_match("b.txt", "weaker", 0.02),
        ];

        let answer = synthesizer(matches, Some("unused".to_string()))
            .answer("anything relevant?")
            .await
            .unwrap();

        assert_eq!(answer.text, NO_ANSWER_TEXT);
        assert!(answer.sources.is_empty());
    }

    #[tokio::test]
    async fn generation_failure_falls_back_to_truncated_context() {
        let long_text = "x".repeat(3000);
        let matches = vec![scripted_match("a.txt", &long_text, 0.5)];

        let answer = synthesizer(matches, None)
            .answer("tell me about x")
            .await
            .unwrap();

        assert_eq!(answer.text.chars().count(), FALLBACK_ANSWER_MAX_CHARS);
        assert!(answer.text.starts_with("xxx"));
        assert_eq!(answer.sources, vec!["a.txt"]);
    }

    #[tokio::test]
    async fn context_joins_surviving_chunks_in_score_order() {
        let matches = vec![
            scripted_match("a.txt", "first chunk", 0.9),
            scripted_match("a.txt", "second chunk", 0.6),
            scripted_match("b.txt", "third chunk", 0.3),
        ];

        // With the generator down, the answer is the context block itself.
        let answer = synthesizer(matches, None).answer("order?").await.unwrap();

        assert_eq!(
            answer.text,
            format!("first chunk{CONTEXT_DELIMITER}second chunk{CONTEXT_DELIMITER}third chunk")
        );
        // Sources are deduplicated.
        assert_eq!(answer.sources, vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn retrieval_backend_failure_surfaces() {
        struct BrokenStore;

        #[async_trait]
        impl crate::traits::VectorStore for BrokenStore {
            async fn create_index(&self, _dimensions: usize) -> Result<(), BackendError> {
                Ok(())
            }

            async fn delete_index(&self) -> Result<(), BackendError> {
                Ok(())
            }

            async fn upsert(
                &self,
                _chunks: &[crate::models::Chunk],
                _embeddings: &[Vec<f32>],
            ) -> Result<(), BackendError> {
                Ok(())
            }

            async fn similarity_search(
                &self,
                _query_vector: &[f32],
                _top_k: usize,
            ) -> Result<Vec<ScoredMatch>, BackendError> {
                Err(BackendError::Request("index unavailable".to_string()))
            }
        }

        let retriever = Retriever::new(FakeEmbedder::new(4), BrokenStore);
        let synthesizer = AnswerSynthesizer::new(retriever, FakeGenerator { reply: None });
        assert!(synthesizer.answer("anything?").await.is_err());
    }
}
