//! Answer synthesis: retrieved chunks + question → model answer.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::config::EmptyContextPolicy;
use crate::document::SearchResult;
use crate::error::Result;
use crate::generation::{Passage, Prompt, TextGenerator};
use crate::pipeline::with_timeout;

/// Answer returned when retrieval finds nothing and the policy short-circuits.
pub const NO_RELEVANT_CONTEXT_MESSAGE: &str =
    "No relevant information was found in the scouting reports for this question.";

/// Builds a single "stuffed" prompt from retrieved chunks and delegates to a
/// [`TextGenerator`].
///
/// Chunks are used exactly as given: the synthesizer trusts retrieval's
/// ordering and never re-ranks or drops passages.
pub struct AnswerSynthesizer {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
    empty_context: EmptyContextPolicy,
}

impl AnswerSynthesizer {
    /// Create a synthesizer around `generator`.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        timeout: Duration,
        empty_context: EmptyContextPolicy,
    ) -> Self {
        Self { generator, timeout, empty_context }
    }

    /// Build the prompt for `question` from `results`, preserving their order.
    pub fn prompt(question: &str, results: &[SearchResult]) -> Prompt {
        Prompt {
            question: question.to_string(),
            passages: results
                .iter()
                .map(|r| Passage {
                    source: r.chunk.document_id.clone(),
                    text: r.chunk.text.clone(),
                })
                .collect(),
        }
    }

    /// Produce an answer to `question` grounded in `results`.
    ///
    /// # Errors
    ///
    /// Returns the generator's error, or [`RagError::Timeout`](crate::RagError::Timeout)
    /// if it does not answer within the configured timeout.
    pub async fn synthesize(&self, question: &str, results: &[SearchResult]) -> Result<String> {
        if results.is_empty() && self.empty_context == EmptyContextPolicy::ShortCircuit {
            info!("no passages retrieved, skipping generation");
            return Ok(NO_RELEVANT_CONTEXT_MESSAGE.to_string());
        }

        let prompt = Self::prompt(question, results);
        debug!(
            model = self.generator.name(),
            passages = prompt.passages.len(),
            "generating answer"
        );

        let answer =
            with_timeout("answer generation", self.timeout, self.generator.generate(&prompt))
                .await
                .inspect_err(|e| {
                    error!(model = self.generator.name(), error = %e, "answer generation failed");
                })?;
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::document::Chunk;
    use crate::error::RagError;

    #[derive(Default)]
    struct RecordingGenerator {
        prompts: Mutex<Vec<Prompt>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, prompt: &Prompt) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.clone());
            Ok("  answer  ".to_string())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct SlowGenerator;

    #[async_trait]
    impl TextGenerator for SlowGenerator {
        async fn generate(&self, _prompt: &Prompt) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(String::new())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    fn result(doc: &str, text: &str, distance: f32) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                id: format!("{doc}_0"),
                text: text.to_string(),
                embedding: vec![1.0],
                metadata: HashMap::new(),
                document_id: doc.to_string(),
            },
            distance,
        }
    }

    #[tokio::test]
    async fn passes_every_chunk_in_retrieval_order() {
        let generator = Arc::new(RecordingGenerator::default());
        let synthesizer = AnswerSynthesizer::new(
            generator.clone(),
            Duration::from_secs(5),
            EmptyContextPolicy::ShortCircuit,
        );
        let results = vec![result("b.txt", "far", 0.9), result("a.txt", "near", 0.1)];

        let answer = synthesizer.synthesize("q", &results).await.unwrap();
        assert_eq!(answer, "answer");

        let prompts = generator.prompts.lock().unwrap();
        let sources: Vec<_> = prompts[0].passages.iter().map(|p| p.source.as_str()).collect();
        assert_eq!(sources, vec!["b.txt", "a.txt"]);
    }

    #[tokio::test]
    async fn empty_context_policy_decides_whether_model_runs() {
        let generator = Arc::new(RecordingGenerator::default());
        let short = AnswerSynthesizer::new(
            generator.clone(),
            Duration::from_secs(5),
            EmptyContextPolicy::ShortCircuit,
        );
        assert_eq!(short.synthesize("q", &[]).await.unwrap(), NO_RELEVANT_CONTEXT_MESSAGE);
        assert!(generator.prompts.lock().unwrap().is_empty());

        let eager = AnswerSynthesizer::new(
            generator.clone(),
            Duration::from_secs(5),
            EmptyContextPolicy::Generate,
        );
        assert_eq!(eager.synthesize("q", &[]).await.unwrap(), "answer");
        assert_eq!(generator.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_model_is_reported_as_timeout() {
        let synthesizer = AnswerSynthesizer::new(
            Arc::new(SlowGenerator),
            Duration::from_secs(2),
            EmptyContextPolicy::ShortCircuit,
        );
        let err = synthesizer.synthesize("q", &[result("a.txt", "x", 0.0)]).await.unwrap_err();
        assert!(matches!(err, RagError::Timeout { .. }));
    }
}
