//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. The LLM clients implementing them live outside this
//! workspace; a deterministic mock lives in `goldpan-llm`.

use crate::candidate::RawCandidate;
use crate::kind::NuggetKind;

/// Candidates returned by a remote boundary-refinement call, split by how
/// the provider resolved them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryRefinement {
    /// Candidates the provider matched by its own text search
    pub fuzzy_matched: Vec<RawCandidate>,

    /// Candidates the provider re-derived with a model call
    pub llm_matched: Vec<RawCandidate>,
}

impl BoundaryRefinement {
    /// All refined candidates in provider order, fuzzy bucket first
    pub fn into_candidates(self) -> Vec<RawCandidate> {
        let mut all = self.fuzzy_matched;
        all.extend(self.llm_matched);
        all
    }

    /// Total number of refined candidates
    pub fn len(&self) -> usize {
        self.fuzzy_matched.len() + self.llm_matched.len()
    }

    /// Whether the refinement resolved nothing
    pub fn is_empty(&self) -> bool {
        self.fuzzy_matched.is_empty() && self.llm_matched.is_empty()
    }
}

/// Trait for two-phase candidate extraction
///
/// Implemented by LLM clients. Both calls are synchronous from the
/// caller's point of view; the coordinator bridges them onto a blocking
/// task. Retry, backoff, and timeout policy belong to the implementation,
/// not to the coordinator.
pub trait CandidateProvider {
    /// Error type for provider operations
    type Error;

    /// Phase 1: high-recall extraction of confidence-scored candidates
    ///
    /// `kinds` optionally restricts extraction to a subset of categories.
    fn extract_candidates(
        &self,
        content: &str,
        prompt: &str,
        temperature: f32,
        kinds: Option<&[NuggetKind]>,
    ) -> Result<Vec<RawCandidate>, Self::Error>;

    /// Phase 2: high-precision boundary refinement for candidates the
    /// local search could not place
    fn refine_boundaries(
        &self,
        content: &str,
        candidates: &[RawCandidate],
        temperature: f32,
    ) -> Result<BoundaryRefinement, Self::Error>;
}
