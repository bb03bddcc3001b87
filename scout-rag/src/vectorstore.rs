//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend for chunk embeddings with nearest-neighbour search.
///
/// The pipeline addresses the index only through this trait, so an
/// in-memory store can be swapped for a disk-backed one without touching
/// answer generation. Implementations must allow concurrent searches.
///
/// # Example
///
/// ```rust,ignore
/// use scout_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.upsert(&chunks).await?;
/// let nearest = store.search(&query_embedding, 4).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert chunks, replacing any stored chunk with the same ID.
    /// Chunks must have embeddings set.
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()>;

    /// Return the `top_k` chunks nearest to `embedding`.
    ///
    /// Results are ordered by non-decreasing distance. An empty store or a
    /// `top_k` of zero yields an empty `Vec`.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;

    /// Number of stored chunks.
    async fn len(&self) -> usize;

    /// Whether the store holds no chunks.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Short name used in logs and error messages.
    fn name(&self) -> &str;
}
