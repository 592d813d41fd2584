//! Diagnostic metadata describing one extraction run

use serde::{Deserialize, Serialize};

/// Counters and flags describing how an extraction run went
///
/// Callers use this to distinguish "nothing survived filtering" (a
/// successful empty result) from an actual failure, and to report how each
/// surviving candidate was resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Candidates returned by the phase-1 call
    pub phase1_count: usize,

    /// Candidates that survived the confidence filter
    pub phase1_filtered_count: usize,

    /// Nuggets resolved locally in phase 2 (exact, fuzzy, and fallback)
    pub phase2_fuzzy_count: usize,

    /// Nuggets resolved by the remote refinement call
    pub phase2_llm_count: usize,

    /// True when the confidence filter left zero survivors
    pub no_nuggets_passed: bool,

    /// Always false. A batch is never aborted because a majority of
    /// candidates fall below the threshold; the field is retained for
    /// wire compatibility with older clients.
    pub aborted_due_to_low_confidence: bool,

    /// Wall time from phase-1 start to phase-2 completion, in milliseconds
    pub total_processing_time_ms: u64,

    /// The threshold the run filtered with
    pub confidence_threshold: f64,
}

impl ExtractionMetadata {
    /// Metadata for a run that produced no candidates at all
    pub fn empty(confidence_threshold: f64) -> Self {
        Self {
            phase1_count: 0,
            phase1_filtered_count: 0,
            phase2_fuzzy_count: 0,
            phase2_llm_count: 0,
            no_nuggets_passed: true,
            aborted_due_to_low_confidence: false,
            total_processing_time_ms: 0,
            confidence_threshold,
        }
    }
}
