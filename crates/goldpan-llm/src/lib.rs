//! Goldpan LLM Provider Layer
//!
//! The boundary between the reconciliation core and LLM backends.
//!
//! # Architecture
//!
//! This crate owns everything that touches raw provider output: the
//! response normalizer that turns loosely-shaped LLM JSON into canonical
//! [`RawCandidate`]s, the provider error taxonomy, and a deterministic
//! `MockProvider` for tests. Real HTTP clients implement the
//! `CandidateProvider` trait from `goldpan-domain` outside this workspace;
//! they are expected to run their responses through
//! [`normalize_response`] so that no core logic ever sees an
//! unvalidated payload.
//!
//! # Examples
//!
//! ```
//! use goldpan_llm::MockProvider;
//! use goldpan_domain::CandidateProvider;
//!
//! let provider = MockProvider::from_json(
//!     r#"{"golden_nuggets": [{"type": "tool", "startContent": "use ripgrep", "endContent": "for speed", "confidence": 0.9}]}"#,
//! );
//! let candidates = provider.extract_candidates("doc", "prompt", 0.7, None).unwrap();
//! assert_eq!(candidates.len(), 1);
//! ```

#![warn(missing_docs)]

mod normalize;

pub use normalize::normalize_response;

use goldpan_domain::{BoundaryRefinement, CandidateProvider, NuggetKind, RawCandidate};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors that can occur during provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response that could not be used at all
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Provider error: {0}")]
    Other(String),
}

/// Deterministic provider for tests
///
/// Returns pre-configured candidates without any network calls and counts
/// how often each phase was invoked. Phase-1 honors the requested kind
/// filter the way a real backend would.
#[derive(Clone)]
pub struct MockProvider {
    candidates: Vec<RawCandidate>,
    refinement: Option<BoundaryRefinement>,
    fail_extraction: bool,
    fail_refinement: bool,
    extract_calls: Arc<Mutex<usize>>,
    refine_calls: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a provider that returns the given candidates from phase 1
    pub fn new(candidates: Vec<RawCandidate>) -> Self {
        Self {
            candidates,
            refinement: None,
            fail_extraction: false,
            fail_refinement: false,
            extract_calls: Arc::new(Mutex::new(0)),
            refine_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a provider from a raw response payload
    ///
    /// The payload goes through [`normalize_response`], so this accepts
    /// everything a real backend might emit: fenced JSON, legacy layouts,
    /// synonym type labels.
    pub fn from_json(raw: &str) -> Self {
        Self::new(normalize_response(raw, "mock"))
    }

    /// Configure the refinement returned by phase 2
    ///
    /// Without this, phase 2 echoes whatever candidates it is given back as
    /// `llm_matched`.
    pub fn with_refinement(mut self, refinement: BoundaryRefinement) -> Self {
        self.refinement = Some(refinement);
        self
    }

    /// Make phase-1 calls fail
    pub fn failing_extraction(mut self) -> Self {
        self.fail_extraction = true;
        self
    }

    /// Make phase-2 calls fail
    pub fn failing_refinement(mut self) -> Self {
        self.fail_refinement = true;
        self
    }

    /// Number of phase-1 calls so far
    pub fn extract_call_count(&self) -> usize {
        *self.extract_calls.lock().unwrap()
    }

    /// Number of phase-2 calls so far
    pub fn refine_call_count(&self) -> usize {
        *self.refine_calls.lock().unwrap()
    }
}

impl CandidateProvider for MockProvider {
    type Error = ProviderError;

    fn extract_candidates(
        &self,
        _content: &str,
        _prompt: &str,
        _temperature: f32,
        kinds: Option<&[NuggetKind]>,
    ) -> Result<Vec<RawCandidate>, Self::Error> {
        *self.extract_calls.lock().unwrap() += 1;
        if self.fail_extraction {
            return Err(ProviderError::Communication("mock extraction failure".to_string()));
        }
        let candidates = match kinds {
            Some(kinds) => self
                .candidates
                .iter()
                .filter(|c| kinds.contains(&c.kind))
                .cloned()
                .collect(),
            None => self.candidates.clone(),
        };
        Ok(candidates)
    }

    fn refine_boundaries(
        &self,
        _content: &str,
        candidates: &[RawCandidate],
        _temperature: f32,
    ) -> Result<BoundaryRefinement, Self::Error> {
        *self.refine_calls.lock().unwrap() += 1;
        if self.fail_refinement {
            return Err(ProviderError::Communication("mock refinement failure".to_string()));
        }
        match &self.refinement {
            Some(refinement) => Ok(refinement.clone()),
            None => Ok(BoundaryRefinement {
                fuzzy_matched: Vec::new(),
                llm_matched: candidates.to_vec(),
            }),
        }
    }
}
