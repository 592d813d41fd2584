//! Greedy similarity grouping

use crate::config::GrouperConfig;
use crate::embedding::{cosine_similarity, EmbeddingClient};
use crate::similarity::{
    comparison_text, word_overlap_similarity, SimilarityDetails, SimilarityMethod, SimilarityScore,
};
use goldpan_domain::{NuggetKind, ReconciledNugget};
use tracing::{debug, warn};

/// A cluster of near-duplicate nuggets
///
/// Members share a kind and pairwise-cleared the similarity threshold with
/// the group's first member. Order follows the input; the first member is
/// the group's representative.
#[derive(Debug, Clone)]
pub struct SimilarityGroup {
    /// Kind shared by every member
    pub kind: NuggetKind,

    /// Members in input order
    pub nuggets: Vec<ReconciledNugget>,
}

impl SimilarityGroup {
    /// The nugget that stands for the whole group
    pub fn representative(&self) -> &ReconciledNugget {
        &self.nuggets[0]
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.nuggets.len()
    }

    /// A group always has at least one member
    pub fn is_empty(&self) -> bool {
        self.nuggets.is_empty()
    }
}

/// Best same-kind match for a query nugget
#[derive(Debug, Clone)]
pub struct MostSimilar {
    /// Index of the match in the candidate slice
    pub index: usize,

    /// The matched nugget
    pub nugget: ReconciledNugget,

    /// Similarity between query and match
    pub similarity: f64,

    /// Scoring path that produced the similarity
    pub method: SimilarityMethod,
}

/// Scores nugget pairs and clusters near-duplicates
///
/// Construct with [`Grouper::new`] for word-overlap scoring, or
/// [`Grouper::with_embedder`] to score with embeddings. The embedding path
/// degrades to word overlap on any client failure; the caller of
/// [`Grouper::similarity`] sees the degradation only in the score's
/// details, never as an error.
pub struct Grouper {
    config: GrouperConfig,
    embedder: Option<Box<dyn EmbeddingClient>>,
}

impl Grouper {
    /// Create a grouper that scores by word overlap
    pub fn new(config: GrouperConfig) -> Self {
        Self {
            config,
            embedder: None,
        }
    }

    /// Create a grouper that scores with an embedding backend
    pub fn with_embedder(config: GrouperConfig, embedder: Box<dyn EmbeddingClient>) -> Self {
        Self {
            config,
            embedder: Some(embedder),
        }
    }

    /// Compare two nuggets
    pub fn similarity(&self, a: &ReconciledNugget, b: &ReconciledNugget) -> SimilarityScore {
        let text_a = comparison_text(a);
        let text_b = comparison_text(b);

        if self.config.use_embeddings {
            match self.embedding_similarity(&text_a, &text_b) {
                Ok(similarity) => {
                    return SimilarityScore {
                        similarity,
                        method: SimilarityMethod::Embedding,
                        is_similar: similarity >= self.config.embedding_threshold,
                        details: SimilarityDetails {
                            threshold: self.config.embedding_threshold,
                            error: None,
                        },
                    };
                }
                Err(reason) => {
                    warn!(error = %reason, "embedding similarity unavailable, using word overlap");
                    let similarity = word_overlap_similarity(&text_a, &text_b);
                    return SimilarityScore {
                        similarity,
                        method: SimilarityMethod::Fallback,
                        is_similar: similarity >= self.config.word_overlap_threshold,
                        details: SimilarityDetails {
                            threshold: self.config.word_overlap_threshold,
                            error: Some(reason),
                        },
                    };
                }
            }
        }

        let similarity = word_overlap_similarity(&text_a, &text_b);
        SimilarityScore {
            similarity,
            method: SimilarityMethod::WordOverlap,
            is_similar: similarity >= self.config.word_overlap_threshold,
            details: SimilarityDetails {
                threshold: self.config.word_overlap_threshold,
                error: None,
            },
        }
    }

    fn embedding_similarity(&self, a: &str, b: &str) -> Result<f64, String> {
        let embedder = self
            .embedder
            .as_deref()
            .ok_or_else(|| "no embedding client configured".to_string())?;
        let vectors = embedder
            .embed_batch(&[a, b])
            .map_err(|e| e.to_string())?;
        if vectors.len() != 2 {
            return Err(format!("expected 2 vectors, got {}", vectors.len()));
        }
        // Cosine lands in [-1, 1]; clamp the lower half away since a
        // similarity below zero carries no grouping signal
        Ok(f64::from(cosine_similarity(&vectors[0], &vectors[1])).max(0.0))
    }

    /// Cluster nuggets into groups of near-duplicates
    ///
    /// Single-pass greedy clustering in input order: each unprocessed
    /// nugget opens a new group, then claims every later unprocessed nugget
    /// of the same kind whose similarity to it clears the threshold.
    pub fn group(&self, nuggets: &[ReconciledNugget]) -> Vec<SimilarityGroup> {
        let mut processed = vec![false; nuggets.len()];
        let mut groups = Vec::new();

        for i in 0..nuggets.len() {
            if processed[i] {
                continue;
            }
            processed[i] = true;
            let mut members = vec![nuggets[i].clone()];

            for j in (i + 1)..nuggets.len() {
                if processed[j] || nuggets[j].kind != nuggets[i].kind {
                    continue;
                }
                let score = self.similarity(&nuggets[i], &nuggets[j]);
                if score.is_similar {
                    processed[j] = true;
                    members.push(nuggets[j].clone());
                }
            }

            groups.push(SimilarityGroup {
                kind: nuggets[i].kind,
                nuggets: members,
            });
        }

        debug!(input = nuggets.len(), groups = groups.len(), "grouped nuggets");
        groups
    }

    /// Find the most similar same-kind candidate for a query
    ///
    /// Scores every candidate of the query's kind and returns the best,
    /// whatever its score; `None` when no candidate shares the kind.
    pub fn most_similar(
        &self,
        query: &ReconciledNugget,
        candidates: &[ReconciledNugget],
    ) -> Option<MostSimilar> {
        let mut best: Option<MostSimilar> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            if candidate.kind != query.kind {
                continue;
            }
            let score = self.similarity(query, candidate);
            let replace = best
                .as_ref()
                .map_or(true, |b| score.similarity > b.similarity);
            if replace {
                best = Some(MostSimilar {
                    index,
                    nugget: candidate.clone(),
                    similarity: score.similarity,
                    method: score.method,
                });
            }
        }
        best
    }
}
