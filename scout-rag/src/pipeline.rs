//! Indexing and retrieval pipeline.
//!
//! The [`RagPipeline`] coordinates the ingest-and-search workflow by
//! composing an [`EmbeddingProvider`], a [`VectorStore`] and a [`Chunker`].
//! It knows nothing about answer generation; see
//! [`AnswerSynthesizer`](crate::AnswerSynthesizer) for that half.
//!
//! # Example
//!
//! ```rust,ignore
//! use scout_rag::{HashEmbeddingProvider, InMemoryVectorStore, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(HashEmbeddingProvider::default()))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! pipeline.ingest_batch(&documents).await?;
//! let results = pipeline.search("who presses best?", 4).await?;
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::chunking::{Chunker, chunker_for};
use crate::config::RagConfig;
use crate::document::{Chunk, Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Await `future`, converting expiry of `after` into [`RagError::Timeout`].
pub(crate) async fn with_timeout<T, F>(operation: &str, after: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(after, future).await {
        Ok(result) => result,
        Err(_) => {
            error!(operation, timeout_secs = after.as_secs_f32(), "upstream call timed out");
            Err(RagError::Timeout { operation: operation.to_string(), after })
        }
    }
}

/// The indexing and retrieval pipeline.
///
/// Coordinates document ingestion (chunk → embed → store) and search
/// (embed query → nearest neighbours). Construct one via
/// [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Number of chunks currently indexed.
    pub async fn indexed_chunks(&self) -> usize {
        self.vector_store.len().await
    }

    /// Ingest a single document: chunk → embed → store.
    ///
    /// Returns the chunks that were stored (with embeddings attached).
    ///
    /// # Errors
    ///
    /// Returns the embedding or store error, or [`RagError::Timeout`] if the
    /// embedding call exceeds the configured timeout.
    pub async fn ingest(&self, document: &Document) -> Result<Vec<Chunk>> {
        let mut chunks = self.chunker.chunk(document);
        if chunks.is_empty() {
            info!(document.id = %document.id, chunk_count = 0, "ingested document (empty)");
            return Ok(chunks);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = with_timeout(
            "document embedding",
            self.config.request_timeout,
            self.embedding_provider.embed_batch(&texts),
        )
        .await
        .inspect_err(|e| {
            error!(document.id = %document.id, error = %e, "embedding failed during ingestion");
        })?;

        if embeddings.len() != chunks.len() {
            return Err(RagError::Embedding {
                provider: self.embedding_provider.name().to_string(),
                message: format!(
                    "returned {} embeddings for {} chunks of '{}'",
                    embeddings.len(),
                    chunks.len(),
                    document.id
                ),
            });
        }

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.vector_store.upsert(&chunks).await.inspect_err(|e| {
            error!(document.id = %document.id, error = %e, "upsert failed during ingestion");
        })?;

        info!(document.id = %document.id, chunk_count = chunks.len(), "ingested document");
        Ok(chunks)
    }

    /// Ingest multiple documents through the chunk → embed → store workflow.
    ///
    /// Returns all chunks that were stored across all documents.
    ///
    /// # Errors
    ///
    /// Stops at the first document that fails and returns its error.
    pub async fn ingest_batch(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        let mut all_chunks = Vec::new();
        for document in documents {
            let chunks = self.ingest(document).await?;
            all_chunks.extend(chunks);
        }
        Ok(all_chunks)
    }

    /// Return the `k` indexed chunks nearest to `query`, nearest first.
    ///
    /// The query is embedded with the same provider used at ingestion. An
    /// empty index yields an empty `Vec` without calling the provider.
    ///
    /// # Errors
    ///
    /// Returns the embedding or store error, or [`RagError::Timeout`] if the
    /// query embedding exceeds the configured timeout.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 || self.vector_store.is_empty().await {
            debug!(k, "search skipped, nothing to retrieve");
            return Ok(Vec::new());
        }

        let query_embedding = with_timeout(
            "query embedding",
            self.config.request_timeout,
            self.embedding_provider.embed(query),
        )
        .await
        .inspect_err(|e| error!(error = %e, "embedding failed during query"))?;

        let results = self
            .vector_store
            .search(&query_embedding, k)
            .await
            .inspect_err(|e| error!(error = %e, "vector store search failed"))?;

        info!(k, result_count = results.len(), "search completed");
        Ok(results)
    }

    /// [`search`](Self::search) with the configured `top_k`.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.search(query, self.config.top_k).await
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `embedding_provider` and `vector_store` are required. When no chunker is
/// set, the one selected by the config's `chunk_strategy` is used.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration. Defaults to [`RagConfig::default`].
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Override the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating the config and required fields.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the config is invalid or a required
    /// field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::Config("vector_store is required".to_string()))?;
        let chunker = self.chunker.unwrap_or_else(|| chunker_for(&config));

        Ok(RagPipeline { config, embedding_provider, vector_store, chunker })
    }
}
