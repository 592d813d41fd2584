//! Goldpan Grouper
//!
//! Deduplicates near-identical nuggets by similarity. Two scoring paths:
//!
//! - **Word overlap**: Jaccard similarity over lowercase word sets; pure,
//!   synchronous, always available
//! - **Embedding**: cosine similarity over vectors from an
//!   [`EmbeddingClient`]; when the client fails, scoring silently degrades
//!   to word overlap and the failure is recorded in the score's details,
//!   so callers never see the embedding error directly
//!
//! Grouping is single-pass greedy clustering in original order, O(n²)
//! comparisons. Nugget counts per analysis are tens, not thousands.
//!
//! # Examples
//!
//! ```
//! use goldpan_grouper::{Grouper, GrouperConfig};
//!
//! let grouper = Grouper::new(GrouperConfig::default());
//! let groups = grouper.group(&[]);
//! assert!(groups.is_empty());
//! ```

#![warn(missing_docs)]

mod config;
mod embedding;
mod grouping;
mod similarity;

pub use config::GrouperConfig;
pub use embedding::{cosine_similarity, EmbeddingClient, EmbeddingError, MockEmbeddingModel};
pub use grouping::{Grouper, MostSimilar, SimilarityGroup};
pub use similarity::{word_overlap_similarity, SimilarityDetails, SimilarityMethod, SimilarityScore};
