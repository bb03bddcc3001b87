//! The text-to-vector seam of the pipeline.

use async_trait::async_trait;

use crate::error::Result;

/// Turns report text and questions into fixed-width vectors.
///
/// Reports and questions must go through the same provider so that their
/// vectors are comparable, and a provider must be deterministic: equal text
/// gives an equal vector. Every vector has [`dimensions`](Self::dimensions)
/// components.
///
/// # Example
///
/// ```rust,ignore
/// use scout_rag::{EmbeddingProvider, HashEmbeddingProvider};
///
/// let provider = HashEmbeddingProvider::new(256);
/// let vector = provider.embed("left-footed winger").await?;
/// assert_eq!(vector.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one question or passage.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many passages, one vector per input, in input order.
    ///
    /// Falls back to one [`embed`](Self::embed) call per text; remote
    /// backends with a batch endpoint override it.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Width of every vector this provider returns.
    fn dimensions(&self) -> usize;

    /// Short name used in logs and error messages.
    fn name(&self) -> &str;
}
