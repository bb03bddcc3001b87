//! Offline embedding provider based on feature hashing.
//!
//! [`HashEmbeddingProvider`] needs no model download or API key, which makes
//! it the default backend for local runs and tests. Each lower-cased word is
//! hashed into one of `dimensions` buckets with a hash-derived sign, and the
//! resulting bag-of-words vector is L2-normalised. Texts that share vocabulary
//! therefore land close together under cosine distance.

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Deterministic bag-of-words embeddings via the hashing trick.
#[derive(Debug, Clone)]
pub struct HashEmbeddingProvider {
    dimensions: usize,
}

impl HashEmbeddingProvider {
    /// Default vector width.
    pub const DEFAULT_DIMENSIONS: usize = 384;

    /// Create a provider producing vectors of the given width.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions: dimensions.max(1) }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in tokens(text) {
            let hash = fnv1a(&token);
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Default for HashEmbeddingProvider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSIONS)
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(token: &str) -> u64 {
    token.bytes().fold(FNV_OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME))
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn embeddings_are_deterministic_and_normalised() {
        let provider = HashEmbeddingProvider::new(64);
        let a = provider.embed("Bukayo Saka, right winger").await.unwrap();
        let b = provider.embed("Bukayo Saka, right winger").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn shared_vocabulary_is_closer() {
        let provider = HashEmbeddingProvider::default();
        let query = provider.embed("pressing midfielder").await.unwrap();
        let near =
            provider.embed("An energetic pressing midfielder who wins the ball").await.unwrap();
        let far = provider.embed("Goalkeeper with strong distribution").await.unwrap();
        assert!(cosine(&query, &near) > cosine(&query, &far));
    }

    #[tokio::test]
    async fn text_without_words_is_the_zero_vector() {
        let provider = HashEmbeddingProvider::new(8);
        let v = provider.embed(" -- !! ").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
