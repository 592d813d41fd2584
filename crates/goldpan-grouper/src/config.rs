//! Grouper configuration

use serde::{Deserialize, Serialize};

/// Configuration for similarity scoring and grouping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrouperConfig {
    /// Score with embeddings when a client is available
    pub use_embeddings: bool,

    /// Minimum cosine similarity for the embedding path (0.0-1.0)
    pub embedding_threshold: f64,

    /// Minimum Jaccard similarity for the word-overlap path (0.0-1.0)
    pub word_overlap_threshold: f64,
}

impl Default for GrouperConfig {
    fn default() -> Self {
        Self {
            use_embeddings: false,
            embedding_threshold: 0.85,
            word_overlap_threshold: 0.70,
        }
    }
}

impl GrouperConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.embedding_threshold) {
            return Err(format!(
                "embedding_threshold {} out of range [0.0, 1.0]",
                self.embedding_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.word_overlap_threshold) {
            return Err(format!(
                "word_overlap_threshold {} out of range [0.0, 1.0]",
                self.word_overlap_threshold
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GrouperConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.use_embeddings);
    }

    #[test]
    fn test_invalid_thresholds() {
        let mut config = GrouperConfig::default();
        config.embedding_threshold = 1.2;
        assert!(config.validate().is_err());

        let mut config = GrouperConfig::default();
        config.word_overlap_threshold = -0.1;
        assert!(config.validate().is_err());
    }
}
