//! Goldpan Reconciler
//!
//! Reconciles an LLM's imprecise description of a passage with the literal
//! source text. Two concerns live here:
//!
//! - **Sanitization**: stripping hallucinated trailing punctuation and a
//!   known filename-spacing artifact from boundary strings
//! - **Boundary matching**: locating a candidate's claimed span inside the
//!   source document and mapping it back to the original, untouched text
//!
//! Every function in this crate is total: no combination of empty or
//! malformed input panics, and failure is always a returned value.
//!
//! # Examples
//!
//! ```
//! use goldpan_reconciler::{locate_span, sanitize_end_content};
//!
//! assert_eq!(sanitize_end_content("test content..."), "test content");
//!
//! let span = locate_span("the quick", "lazy dog", "The quick brown fox jumps over the lazy dog.").unwrap();
//! assert_eq!(span.text, "The quick brown fox jumps over the lazy dog");
//! ```

#![warn(missing_docs)]

mod boundary;
mod sanitize;

pub use boundary::{
    boundaries_locate, derive_boundaries, display_content, locate_span, normalize,
    reconstruct_full_content, MatchFailure, SpanMatch,
};
pub use sanitize::sanitize_end_content;
