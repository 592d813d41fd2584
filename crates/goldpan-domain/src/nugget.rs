//! Reconciled nuggets - the terminal output of an extraction

use crate::kind::NuggetKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a nugget based on UUIDv7
///
/// UUIDv7 gives chronological sortability and coordination-free generation,
/// which lets the highlighting layer reference nuggets stably within one
/// analysis without a counter handed around between components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NuggetId(u128);

impl NuggetId {
    /// Generate a new UUIDv7-based NuggetId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a NuggetId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a NuggetId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid UUID string: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for NuggetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NuggetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl Serialize for NuggetId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NuggetId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        NuggetId::from_string(&s).map_err(serde::de::Error::custom)
    }
}

/// How a nugget's boundaries were resolved during phase 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// The full content was found verbatim in the source text
    Exact,

    /// Located by normalized text search against the source
    Fuzzy,

    /// Boundaries were corrected by a remote refinement call
    Llm,

    /// No span could be located; the nugget carries the model's quote
    /// unverified. This is the "unmatched" flag of the output contract.
    Fallback,
}

impl ExtractionMethod {
    /// Get the method name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Exact => "exact",
            ExtractionMethod::Fuzzy => "fuzzy",
            ExtractionMethod::Llm => "llm",
            ExtractionMethod::Fallback => "fallback",
        }
    }

    /// Whether this method implies the nugget was located in the source
    pub fn is_matched(&self) -> bool {
        !matches!(self, ExtractionMethod::Fallback)
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A passage whose boundaries have been reconciled against the source text
///
/// Invariant: when the LLM supplied `full_content`, that text survives
/// byte-for-byte regardless of which `extraction_method` resolved the
/// nugget. `start_content`/`end_content` are display boundaries derived
/// from `full_content`, never substituted from whatever page text a
/// search happened to match. Nuggets are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledNugget {
    /// Identifier for downstream reference
    pub id: NuggetId,

    /// Canonical category
    #[serde(rename = "type")]
    pub kind: NuggetKind,

    /// First few words of the passage, for display and highlighting
    #[serde(rename = "startContent")]
    pub start_content: String,

    /// Last few words of the passage, for display and highlighting
    #[serde(rename = "endContent")]
    pub end_content: String,

    /// The complete passage text
    #[serde(rename = "fullContent")]
    pub full_content: String,

    /// Confidence carried over from the phase-1 candidate
    pub confidence: f64,

    /// How the boundaries were resolved
    #[serde(rename = "extractionMethod")]
    pub extraction_method: ExtractionMethod,

    /// Agreement between the claimed passage and the located source span,
    /// when a span was located and there was a claim to verify
    #[serde(rename = "validationScore", skip_serializing_if = "Option::is_none")]
    pub validation_score: Option<f64>,
}
