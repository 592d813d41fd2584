//! Error types for the extraction coordinator

use thiserror::Error;

/// Errors that can fail an entire extraction call
///
/// Only phase 1 can fail an analysis: without candidates there is nothing
/// to reconcile. Phase-2 and embedding problems are absorbed per candidate
/// and never surface here, so a caller can rely on `Err` meaning "analysis
/// failed" and an empty `Ok` meaning "nothing passed".
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Provider error during the phase-1 call
    #[error("Provider error: {0}")]
    Provider(String),

    /// Content exceeds the configured maximum length
    #[error("Content too long: {0} chars (max: {1})")]
    ContentTooLong(usize, usize),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
