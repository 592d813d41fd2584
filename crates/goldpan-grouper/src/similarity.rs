//! Pairwise similarity scoring

use goldpan_domain::ReconciledNugget;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which path produced a similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    /// Jaccard similarity over lowercase word sets
    WordOverlap,

    /// Cosine similarity over embedding vectors
    Embedding,

    /// Word overlap used because the embedding path failed or was
    /// unavailable; the cause is recorded in the score's details
    Fallback,
}

/// Context attached to a similarity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityDetails {
    /// The threshold the score was judged against
    pub threshold: f64,

    /// The embedding failure that forced a fallback, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of comparing two nuggets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    /// Similarity in [0.0, 1.0]
    pub similarity: f64,

    /// Scoring path taken
    pub method: SimilarityMethod,

    /// Whether the score clears the applicable threshold
    pub is_similar: bool,

    /// Threshold used and any recorded degradation
    pub details: SimilarityDetails,
}

/// Jaccard similarity of the lowercase whitespace-tokenized word sets
///
/// 0.0 when either side has no words; 1.0 when the sets are equal.
pub fn word_overlap_similarity(a: &str, b: &str) -> f64 {
    let words_a: HashSet<String> = a.split_whitespace().map(str::to_lowercase).collect();
    let words_b: HashSet<String> = b.split_whitespace().map(str::to_lowercase).collect();

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64
}

/// The text a nugget is compared by
///
/// The full passage when present; the boundary pair otherwise.
pub fn comparison_text(nugget: &ReconciledNugget) -> String {
    if !nugget.full_content.trim().is_empty() {
        nugget.full_content.clone()
    } else {
        format!("{} {}", nugget.start_content, nugget.end_content)
            .trim()
            .to_string()
    }
}
