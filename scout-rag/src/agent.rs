//! The qualitative agent: answers free-text questions from scouting reports.
//!
//! A [`QualitativeAgent`] is built once per process (loading, chunking and
//! embedding the whole corpus is the expensive part) and then shared by
//! reference. Answering is a single-shot, read-only operation:
//!
//! 1. if the corpus was empty, return [`NO_DOCUMENTS_MESSAGE`];
//! 2. retrieve the configured `top_k` nearest chunks;
//! 3. synthesize an answer from them;
//! 4. return the text.
//!
//! Failures in embedding or generation come back as [`RagError`] values and
//! leave the index untouched for the next question.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::document::Document;
use crate::error::{RagError, Result};
use crate::generation::TextGenerator;
use crate::loader::load_documents;
use crate::pipeline::RagPipeline;
use crate::synthesis::AnswerSynthesizer;

/// Answer returned when no reports were ingested at startup.
pub const NO_DOCUMENTS_MESSAGE: &str =
    "No scouting reports are loaded, so there is nothing to search.";

/// Retrieval-augmented question answering over an immutable report corpus.
pub struct QualitativeAgent {
    pipeline: RagPipeline,
    synthesizer: AnswerSynthesizer,
    document_count: usize,
    chunk_count: usize,
}

impl QualitativeAgent {
    /// Load every report under `dir` and index it.
    ///
    /// A missing or empty directory produces an agent with zero documents
    /// whose answers are [`NO_DOCUMENTS_MESSAGE`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Ingestion`] if `dir` is not a directory, or the
    /// embedding/store error if indexing fails.
    pub async fn from_directory(
        dir: impl AsRef<Path>,
        pipeline: RagPipeline,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        let documents = load_documents(dir, &pipeline.config().file_extensions)?;
        info!(path = %dir.display(), document_count = documents.len(), "loaded scouting reports");
        Self::from_documents(&documents, pipeline, generator).await
    }

    /// Index an already loaded set of documents.
    ///
    /// # Errors
    ///
    /// Returns the embedding or store error if indexing fails.
    pub async fn from_documents(
        documents: &[Document],
        pipeline: RagPipeline,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self> {
        if documents.is_empty() {
            warn!("no scouting reports found, qualitative answers are disabled");
        }
        let chunks = pipeline.ingest_batch(documents).await?;
        info!(
            document_count = documents.len(),
            chunk_count = chunks.len(),
            embedder = pipeline.embedding_provider().name(),
            "qualitative agent ready"
        );

        let config = pipeline.config();
        let synthesizer =
            AnswerSynthesizer::new(generator, config.request_timeout, config.empty_context);
        Ok(Self {
            document_count: documents.len(),
            chunk_count: chunks.len(),
            pipeline,
            synthesizer,
        })
    }

    /// Number of reports ingested at startup.
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// Number of chunks indexed at startup.
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Whether any reports were ingested.
    pub fn is_ready(&self) -> bool {
        self.document_count > 0
    }

    /// The underlying retrieval pipeline.
    pub fn pipeline(&self) -> &RagPipeline {
        &self.pipeline
    }

    /// Answer `query` from the indexed reports.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidQuery`] for a blank question, and upstream
    /// errors ([`RagError::Embedding`], [`RagError::VectorStore`],
    /// [`RagError::Generation`], [`RagError::Timeout`]) unchanged. No retries
    /// are attempted.
    #[instrument(skip(self), fields(top_k = self.pipeline.config().top_k))]
    pub async fn answer_question(&self, query: &str) -> Result<String> {
        if !self.is_ready() {
            return Ok(NO_DOCUMENTS_MESSAGE.to_string());
        }
        let query = query.trim();
        if query.is_empty() {
            return Err(RagError::InvalidQuery("question must not be empty".to_string()));
        }

        let results = self.pipeline.retrieve(query).await?;
        info!(result_count = results.len(), "retrieved relevant passages");

        self.synthesizer.synthesize(query, &results).await
    }
}
