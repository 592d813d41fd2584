//! Embedding client seam and vector math
//!
//! Real embedding backends live outside this workspace; this module defines
//! the trait they implement, the cosine metric, and a deterministic
//! hash-based mock that lets the full grouping pipeline run in tests
//! without model files or network access.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors that can occur during embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Backend inference error
    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),
}

/// Trait for embedding backends
///
/// Batching above a backend's per-request item limit is the caller's
/// responsibility.
pub trait EmbeddingClient {
    /// Generate an embedding vector for the given text
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Generate embeddings for several texts
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Dimension of the vectors this backend produces
    fn dimension(&self) -> usize;
}

/// Deterministic mock embedding backend
///
/// Hashes the input text with per-component seeds and normalizes the result
/// to unit length. Same text, same vector; different texts, different
/// vectors.
pub struct MockEmbeddingModel {
    dimension: usize,
}

impl MockEmbeddingModel {
    /// Create a mock backend producing vectors of `dimension` components
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn hash_with_seed(text: &str, seed: u64) -> f32 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        seed.hash(&mut hasher);
        let hash_value = hasher.finish();

        // Map the hash to [-1, 1]
        let normalized = (hash_value as f64 / u64::MAX as f64) * 2.0 - 1.0;
        normalized as f32
    }
}

impl EmbeddingClient for MockEmbeddingModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Empty text cannot be embedded".to_string(),
            ));
        }

        let mut embedding = Vec::with_capacity(self.dimension);
        for i in 0..self.dimension {
            embedding.push(Self::hash_with_seed(text, i as u64));
        }

        // Unit length, so cosine reduces to a dot product
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Cosine similarity between two vectors, in [-1, 1]
///
/// Returns 0.0 when either vector has zero magnitude or the lengths differ;
/// mismatched inputs come from a misbehaving backend and must not panic the
/// pipeline.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_embedding_deterministic() {
        let model = MockEmbeddingModel::new(128);
        let a = model.embed("the sky is blue").unwrap();
        let b = model.embed("the sky is blue").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mock_embedding_dimension() {
        let model = MockEmbeddingModel::new(64);
        assert_eq!(model.embed("test").unwrap().len(), 64);
        assert_eq!(model.dimension(), 64);
    }

    #[test]
    fn test_mock_embedding_normalized() {
        let model = MockEmbeddingModel::new(128);
        let embedding = model.embed("some text").unwrap();
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_mock_embedding_rejects_empty() {
        let model = MockEmbeddingModel::new(128);
        assert!(model.embed("").is_err());
    }

    #[test]
    fn test_embed_batch() {
        let model = MockEmbeddingModel::new(32);
        let vectors = model.embed_batch(&["one", "two"]).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], model.embed("one").unwrap());
    }

    #[test]
    fn test_cosine_identical() {
        let v = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_orthogonal() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_opposite() {
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }
}
