//! Raw extraction candidates produced by phase 1

use crate::kind::NuggetKind;
use serde::{Deserialize, Serialize};

/// An imprecise, confidence-scored description of a passage
///
/// Phase 1 of extraction over-generates these, favoring recall. The fields
/// the LLM supplies are unreliable: `start_content`/`end_content` may carry
/// hallucinated trailing punctuation, and `full_content` may not occur
/// verbatim where the model claims. Candidates are filtered by confidence
/// and then reconciled against the source text in phase 2; they do not
/// survive past a single extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Canonical category, resolved by the response normalizer
    #[serde(rename = "type")]
    pub kind: NuggetKind,

    /// The complete quote the LLM asserts corresponds to this nugget.
    /// When present, this is treated as ground truth downstream.
    #[serde(rename = "fullContent", skip_serializing_if = "Option::is_none")]
    pub full_content: Option<String>,

    /// First few words of the claimed span
    #[serde(rename = "startContent", skip_serializing_if = "Option::is_none")]
    pub start_content: Option<String>,

    /// Last few words of the claimed span
    #[serde(rename = "endContent", skip_serializing_if = "Option::is_none")]
    pub end_content: Option<String>,

    /// Model-assigned confidence in [0.0, 1.0]
    pub confidence: f64,
}

impl RawCandidate {
    /// Validate that the candidate is usable for reconciliation
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "confidence {} out of range [0.0, 1.0]",
                self.confidence
            ));
        }
        let has_full = self
            .full_content
            .as_deref()
            .map_or(false, |s| !s.trim().is_empty());
        let has_boundaries = self.has_boundaries();
        if !has_full && !has_boundaries {
            return Err("candidate has neither full content nor a boundary pair".to_string());
        }
        Ok(())
    }

    /// Whether both boundary fields are present and non-empty after trimming
    pub fn has_boundaries(&self) -> bool {
        let usable = |s: &Option<String>| s.as_deref().map_or(false, |v| !v.trim().is_empty());
        usable(&self.start_content) && usable(&self.end_content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(full: Option<&str>, start: Option<&str>, end: Option<&str>) -> RawCandidate {
        RawCandidate {
            kind: NuggetKind::Tool,
            full_content: full.map(String::from),
            start_content: start.map(String::from),
            end_content: end.map(String::from),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_valid_with_full_content() {
        assert!(candidate(Some("a full quote"), None, None).validate().is_ok());
    }

    #[test]
    fn test_valid_with_boundaries() {
        assert!(candidate(None, Some("a full"), Some("quote")).validate().is_ok());
    }

    #[test]
    fn test_invalid_empty() {
        assert!(candidate(None, None, None).validate().is_err());
        assert!(candidate(Some("  "), Some(""), Some("x")).validate().is_err());
    }

    #[test]
    fn test_invalid_confidence() {
        let mut c = candidate(Some("quote"), None, None);
        c.confidence = 1.2;
        assert!(c.validate().is_err());
        c.confidence = -0.1;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_has_boundaries_requires_both() {
        assert!(!candidate(Some("q"), Some("start"), None).has_boundaries());
        assert!(!candidate(Some("q"), None, Some("end")).has_boundaries());
        assert!(candidate(None, Some("start"), Some("end")).has_boundaries());
    }

    #[test]
    fn test_wire_field_names() {
        let c = candidate(Some("full"), Some("s"), Some("e"));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["type"], "tool");
        assert_eq!(json["fullContent"], "full");
        assert_eq!(json["startContent"], "s");
        assert_eq!(json["endContent"], "e");
    }
}
