//! Request and response types for extraction

use goldpan_domain::{ExtractionMetadata, NuggetKind, ReconciledNugget};

/// Request to extract nuggets from a document
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// The document text candidates are reconciled against
    pub content: String,

    /// Extraction prompt handed to the provider unchanged
    pub prompt: String,

    /// Restrict extraction to these kinds, when set
    pub selected_kinds: Option<Vec<NuggetKind>>,
}

impl ExtractionRequest {
    /// Request covering all nugget kinds
    pub fn new(content: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            prompt: prompt.into(),
            selected_kinds: None,
        }
    }

    /// Restrict the request to a subset of kinds
    pub fn with_kinds(mut self, kinds: Vec<NuggetKind>) -> Self {
        self.selected_kinds = Some(kinds);
        self
    }
}

/// Result of an extraction run
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Reconciled nuggets in merge order
    pub nuggets: Vec<ReconciledNugget>,

    /// Diagnostic counters and flags for the run
    pub metadata: ExtractionMetadata,
}
