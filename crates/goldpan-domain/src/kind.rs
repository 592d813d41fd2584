//! Nugget kind module - canonical insight categories

use serde::{Deserialize, Serialize};

/// Canonical category of an extracted nugget
///
/// Every nugget belongs to exactly one of these five categories. Provider
/// responses use looser vocabulary ("framework", "technique", ...); the
/// response normalizer resolves those to this enum before any core logic
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NuggetKind {
    /// A concrete tool, technique, or method
    Tool,

    /// A resource: book, article, video, dataset
    Media,

    /// An explanation or "aha! moment" insight
    Explanation,

    /// An analogy or comparison that illuminates a concept
    Analogy,

    /// A mental model or framework
    Model,
}

impl NuggetKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            NuggetKind::Tool => "tool",
            NuggetKind::Media => "media",
            NuggetKind::Explanation => "explanation",
            NuggetKind::Analogy => "analogy",
            NuggetKind::Model => "model",
        }
    }

    /// Parse a canonical kind name (case-insensitive)
    ///
    /// Only canonical names are accepted here. Synonym vocabulary from
    /// provider responses is resolved by the response normalizer.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tool" => Some(NuggetKind::Tool),
            "media" => Some(NuggetKind::Media),
            "explanation" => Some(NuggetKind::Explanation),
            "analogy" => Some(NuggetKind::Analogy),
            "model" => Some(NuggetKind::Model),
            _ => None,
        }
    }

    /// All canonical kinds, in declaration order
    pub fn all() -> [NuggetKind; 5] {
        [
            NuggetKind::Tool,
            NuggetKind::Media,
            NuggetKind::Explanation,
            NuggetKind::Analogy,
            NuggetKind::Model,
        ]
    }
}

impl std::str::FromStr for NuggetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid nugget kind: {}", s))
    }
}

impl std::fmt::Display for NuggetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_round_trip() {
        for kind in NuggetKind::all() {
            assert_eq!(NuggetKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(NuggetKind::parse("TOOL"), Some(NuggetKind::Tool));
        assert_eq!(NuggetKind::parse("Explanation"), Some(NuggetKind::Explanation));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(NuggetKind::parse("framework"), None);
        assert_eq!(NuggetKind::parse(""), None);
    }

    #[test]
    fn test_from_str() {
        let kind: NuggetKind = "media".parse().unwrap();
        assert_eq!(kind, NuggetKind::Media);
        assert!("gadget".parse::<NuggetKind>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&NuggetKind::Analogy).unwrap();
        assert_eq!(json, "\"analogy\"");
        let kind: NuggetKind = serde_json::from_str("\"model\"").unwrap();
        assert_eq!(kind, NuggetKind::Model);
    }
}
