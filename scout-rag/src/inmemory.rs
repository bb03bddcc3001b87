//! In-memory vector store using cosine distance.
//!
//! This module provides [`InMemoryVectorStore`], a brute-force vector store
//! backed by a `Vec` protected by a `tokio::sync::RwLock`. The corpus of
//! scouting reports is small enough that an exhaustive scan is exact and fast.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

#[derive(Debug, Default)]
struct Entries {
    chunks: Vec<Chunk>,
    positions: HashMap<String, usize>,
    dimensions: Option<usize>,
}

/// An in-memory vector store using cosine distance for search.
///
/// Chunks are kept in insertion order; ties in distance are returned in that
/// order, so repeated searches are reproducible. Searches take a read lock
/// and may run concurrently.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    entries: RwLock<Entries>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Compute cosine distance (`1 - cosine similarity`) between two vectors.
///
/// Returns 1.0 if either vector has zero magnitude.
pub(crate) fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

fn dimension_mismatch(expected: usize, actual: usize) -> RagError {
    RagError::VectorStore {
        backend: "in-memory".to_string(),
        message: format!("embedding has {actual} dimensions, index expects {expected}"),
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()> {
        let mut entries = self.entries.write().await;
        for chunk in chunks {
            if chunk.embedding.is_empty() {
                return Err(RagError::VectorStore {
                    backend: "in-memory".to_string(),
                    message: format!("chunk '{}' has no embedding", chunk.id),
                });
            }
            let expected = *entries.dimensions.get_or_insert(chunk.embedding.len());
            if chunk.embedding.len() != expected {
                return Err(dimension_mismatch(expected, chunk.embedding.len()));
            }
            match entries.positions.get(&chunk.id).copied() {
                Some(pos) => entries.chunks[pos] = chunk.clone(),
                None => {
                    let pos = entries.chunks.len();
                    entries.positions.insert(chunk.id.clone(), pos);
                    entries.chunks.push(chunk.clone());
                }
            }
        }
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let entries = self.entries.read().await;
        if top_k == 0 || entries.chunks.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(expected) = entries.dimensions {
            if embedding.len() != expected {
                return Err(dimension_mismatch(expected, embedding.len()));
            }
        }

        let mut scored: Vec<(usize, f32)> = entries
            .chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| (i, cosine_distance(&chunk.embedding, embedding)))
            .collect();

        // Stable sort keeps insertion order among equal distances.
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(i, distance)| SearchResult { chunk: entries.chunks[i].clone(), distance })
            .collect())
    }

    async fn len(&self) -> usize {
        self.entries.read().await.chunks.len()
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, embedding: Vec<f32>) -> Chunk {
        Chunk {
            id: id.to_string(),
            text: format!("text of {id}"),
            embedding,
            metadata: HashMap::new(),
            document_id: "doc".to_string(),
        }
    }

    #[tokio::test]
    async fn search_orders_nearest_first() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(&[
                chunk("far", vec![0.0, 1.0]),
                chunk("near", vec![1.0, 0.1]),
                chunk("exact", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 2).await.unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "near"]);
        assert!(results[0].distance.abs() < 1e-6);
    }

    #[tokio::test]
    async fn empty_store_and_zero_k_return_nothing() {
        let store = InMemoryVectorStore::new();
        assert!(store.is_empty().await);
        assert!(store.search(&[1.0, 0.0], 4).await.unwrap().is_empty());

        store.upsert(&[chunk("a", vec![1.0, 0.0])]).await.unwrap();
        assert!(store.search(&[1.0, 0.0], 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_by_id_and_keeps_position() {
        let store = InMemoryVectorStore::new();
        store.upsert(&[chunk("a", vec![1.0, 0.0]), chunk("b", vec![1.0, 0.0])]).await.unwrap();
        store.upsert(&[chunk("a", vec![1.0, 0.0])]).await.unwrap();
        assert_eq!(store.len().await, 2);

        let results = store.search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(results[0].chunk.id, "a");
        assert_eq!(results[1].chunk.id, "b");
    }

    #[tokio::test]
    async fn rejects_mismatched_dimensions() {
        let store = InMemoryVectorStore::new();
        store.upsert(&[chunk("a", vec![1.0, 0.0])]).await.unwrap();
        assert!(store.upsert(&[chunk("b", vec![1.0, 0.0, 0.0])]).await.is_err());
        assert!(store.search(&[1.0], 1).await.is_err());
        assert!(store.upsert(&[chunk("c", Vec::new())]).await.is_err());
    }
}
