//! Goldpan Extractor
//!
//! Orchestrates the two-phase extraction pipeline: a high-recall candidate
//! pass, a confidence filter, and a high-precision reconciliation pass that
//! pins each surviving candidate's boundaries to the literal source text.
//!
//! # Architecture
//!
//! ```text
//! content → provider (phase 1) → confidence filter → local placement
//!                                                  ↘ remote refinement
//!                                       → reconciled nuggets + metadata
//! ```
//!
//! # Key guarantees
//!
//! - **Partial failure never escalates**: a batch where most candidates
//!   miss the confidence threshold still yields the survivors, and a
//!   candidate that cannot be placed costs only itself
//! - **Quotes survive verbatim**: a candidate's own passage text is
//!   emitted byte-for-byte no matter which path resolved it
//! - **Empty is not an error**: "nothing passed" is a successful result
//!   with `no_nuggets_passed` set, distinguishable from a failed analysis
//!
//! # Example Usage
//!
//! ```
//! use goldpan_extractor::{Extractor, ExtractionConfig, ExtractionRequest};
//! use goldpan_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::from_json(r#"{"golden_nuggets": []}"#);
//! let extractor = Extractor::new(provider, ExtractionConfig::default());
//!
//! let request = ExtractionRequest::new("document text", "find insights");
//! let result = extractor.extract(request).await?;
//!
//! println!("{} nuggets", result.nuggets.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod phase_two;
mod types;


pub use config::ExtractionConfig;
pub use error::ExtractError;
pub use extractor::Extractor;
pub use types::{ExtractionRequest, ExtractionResult};
