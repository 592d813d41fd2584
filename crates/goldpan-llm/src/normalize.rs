//! Canonicalize raw LLM responses
//!
//! Backends disagree about everything: some wrap JSON in markdown fences,
//! some use loose category vocabulary, some predate the boundary fields and
//! return a single `content` string. Everything is resolved here, at the
//! provider boundary, so the rest of the pipeline only ever sees
//! [`RawCandidate`]s.

use goldpan_domain::{NuggetKind, RawCandidate};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Kind assigned when a response label is unrecognized or missing
const DEFAULT_KIND: NuggetKind = NuggetKind::Explanation;

/// Characters taken from each side of a legacy `content` field when a
/// boundary has to be synthesized. A heuristic default, not a contract:
/// the cut lands wherever character 100 falls, word-aligned or not.
const LEGACY_BOUNDARY_CHARS: usize = 100;

/// How much of an offending payload to reproduce in logs
const PAYLOAD_LOG_LIMIT: usize = 200;

/// One item of a provider response, in either known layout
///
/// The bounded layout carries both boundary fields; anything else with a
/// `content` field is the legacy single-field layout. Items matching
/// neither fail deserialization and are dropped individually.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireNugget {
    Bounded {
        #[serde(rename = "type")]
        kind: Option<String>,
        #[serde(rename = "startContent")]
        start_content: String,
        #[serde(rename = "endContent")]
        end_content: String,
        #[serde(rename = "fullContent")]
        full_content: Option<String>,
        confidence: Option<f64>,
    },
    Legacy {
        #[serde(rename = "type")]
        kind: Option<String>,
        content: String,
        #[serde(rename = "startContent")]
        start_content: Option<String>,
        #[serde(rename = "endContent")]
        end_content: Option<String>,
        #[serde(rename = "fullContent")]
        full_content: Option<String>,
        confidence: Option<f64>,
    },
}

/// Parse and canonicalize a raw provider response
///
/// Never fails: a payload that cannot be used at all logs a warning with
/// the offending text and yields an empty list, and individual malformed
/// items are dropped without affecting their siblings. `provider_id` is
/// only used to attribute log lines.
pub fn normalize_response(raw: &str, provider_id: &str) -> Vec<RawCandidate> {
    let json_str = extract_json(raw);
    let json: Value = match serde_json::from_str(&json_str) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                provider = provider_id,
                error = %e,
                payload = payload_snippet(raw),
                "response is not JSON"
            );
            return Vec::new();
        }
    };

    let items = match preprocess(&json) {
        Some(items) => items,
        None => {
            warn!(
                provider = provider_id,
                payload = payload_snippet(raw),
                "response has no nugget list"
            );
            return Vec::new();
        }
    };

    let mut candidates = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        match serde_json::from_value::<WireNugget>(item.clone()) {
            Ok(wire) => {
                if let Some(candidate) = canonicalize(wire, provider_id, idx) {
                    candidates.push(candidate);
                }
            }
            Err(e) => {
                warn!(
                    provider = provider_id,
                    item = idx,
                    error = %e,
                    "dropping unrecognizable nugget item"
                );
            }
        }
    }
    candidates
}

/// Pull JSON out of a response, stripping a markdown code fence if present
fn extract_json(response: &str) -> String {
    let trimmed = response.trim();
    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return String::new();
        }
        // Drop the opening ```json line and the closing ``` line
        let last = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        lines[1..last].join("\n")
    } else {
        trimmed.to_string()
    }
}

/// Find the item list: `{"golden_nuggets": [...]}` or a bare array
///
/// `null`, non-objects, and a missing or non-array list all normalize to
/// nothing rather than failing.
fn preprocess(json: &Value) -> Option<&Vec<Value>> {
    match json {
        Value::Array(items) => Some(items),
        Value::Object(obj) => obj.get("golden_nuggets").and_then(Value::as_array),
        _ => None,
    }
}

fn canonicalize(wire: WireNugget, provider_id: &str, idx: usize) -> Option<RawCandidate> {
    let (kind_label, start, end, full, confidence) = match wire {
        WireNugget::Bounded {
            kind,
            start_content,
            end_content,
            full_content,
            confidence,
        } => (kind, start_content, end_content, full_content, confidence),
        WireNugget::Legacy {
            kind,
            content,
            start_content,
            end_content,
            full_content,
            confidence,
        } => {
            let (start, end) = synthesize_boundaries(
                start_content.as_deref(),
                end_content.as_deref(),
                &content,
                provider_id,
                idx,
            );
            (kind, start, end, full_content.or(Some(content)), confidence)
        }
    };

    let start = start.trim().to_string();
    let end = end.trim().to_string();
    if start.is_empty() || end.is_empty() {
        warn!(
            provider = provider_id,
            item = idx,
            "dropping nugget with empty boundary content"
        );
        return None;
    }

    Some(RawCandidate {
        kind: resolve_kind(kind_label.as_deref(), provider_id),
        full_content: full,
        start_content: Some(start),
        end_content: Some(end),
        confidence: confidence.unwrap_or(1.0).clamp(0.0, 1.0),
    })
}

/// Fill in missing boundaries from a legacy `content` field
///
/// Both missing: the content stands in for both (whole-span behavior). One
/// missing: the first or last [`LEGACY_BOUNDARY_CHARS`] characters stand in
/// for it, which is a guess worth a warning.
fn synthesize_boundaries(
    start: Option<&str>,
    end: Option<&str>,
    content: &str,
    provider_id: &str,
    idx: usize,
) -> (String, String) {
    let start = start.filter(|s| !s.trim().is_empty());
    let end = end.filter(|s| !s.trim().is_empty());

    match (start, end) {
        (Some(s), Some(e)) => (s.to_string(), e.to_string()),
        (None, None) => (content.to_string(), content.to_string()),
        (Some(s), None) => {
            warn!(
                provider = provider_id,
                item = idx,
                "synthesizing end boundary from legacy content tail"
            );
            (s.to_string(), tail_chars(content, LEGACY_BOUNDARY_CHARS).to_string())
        }
        (None, Some(e)) => {
            warn!(
                provider = provider_id,
                item = idx,
                "synthesizing start boundary from legacy content head"
            );
            (head_chars(content, LEGACY_BOUNDARY_CHARS).to_string(), e.to_string())
        }
    }
}

/// Resolve a response's category label to the canonical enum
///
/// Case-insensitive; knows the synonym vocabulary backends actually use.
/// Unrecognized or missing labels map to [`DEFAULT_KIND`] rather than
/// rejecting the item.
fn resolve_kind(label: Option<&str>, provider_id: &str) -> NuggetKind {
    let Some(label) = label else {
        return DEFAULT_KIND;
    };
    let lowered = label.trim().to_lowercase();
    if let Some(kind) = NuggetKind::parse(&lowered) {
        return kind;
    }
    match lowered.as_str() {
        "mental model" | "mental_model" | "framework" => NuggetKind::Model,
        "technique" | "method" => NuggetKind::Tool,
        "resource" | "book" | "article" => NuggetKind::Media,
        "concept" | "aha moment" | "aha! moment" => NuggetKind::Explanation,
        "comparison" | "metaphor" => NuggetKind::Analogy,
        _ => {
            warn!(provider = provider_id, label, "unrecognized nugget type label");
            DEFAULT_KIND
        }
    }
}

fn payload_snippet(raw: &str) -> &str {
    head_chars(raw, PAYLOAD_LOG_LIMIT)
}

fn head_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

fn tail_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    match s.char_indices().nth(count - n) {
        Some((i, _)) => &s[i..],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bounded_items() {
        let raw = r#"{"golden_nuggets": [
            {"type": "tool", "startContent": "use ripgrep", "endContent": "for speed", "fullContent": "use ripgrep everywhere for speed", "confidence": 0.9}
        ]}"#;
        let candidates = normalize_response(raw, "test");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, NuggetKind::Tool);
        assert_eq!(candidates[0].start_content.as_deref(), Some("use ripgrep"));
        assert_eq!(candidates[0].end_content.as_deref(), Some("for speed"));
        assert_eq!(
            candidates[0].full_content.as_deref(),
            Some("use ripgrep everywhere for speed")
        );
        assert_eq!(candidates[0].confidence, 0.9);
    }

    #[test]
    fn test_normalize_bare_array() {
        let raw = r#"[{"type": "media", "startContent": "a", "endContent": "b"}]"#;
        let candidates = normalize_response(raw, "test");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, NuggetKind::Media);
    }

    #[test]
    fn test_normalize_markdown_fenced() {
        let raw = "```json\n{\"golden_nuggets\": [{\"type\": \"tool\", \"startContent\": \"a\", \"endContent\": \"b\"}]}\n```";
        assert_eq!(normalize_response(raw, "test").len(), 1);
    }

    #[test]
    fn test_normalize_fence_without_language() {
        let raw = "```\n[{\"type\": \"tool\", \"startContent\": \"a\", \"endContent\": \"b\"}]\n```";
        assert_eq!(normalize_response(raw, "test").len(), 1);
    }

    #[test]
    fn test_not_json_yields_empty() {
        assert!(normalize_response("the model rambled instead", "test").is_empty());
        assert!(normalize_response("", "test").is_empty());
    }

    #[test]
    fn test_structural_junk_yields_empty() {
        assert!(normalize_response("null", "test").is_empty());
        assert!(normalize_response("42", "test").is_empty());
        assert!(normalize_response(r#"{"golden_nuggets": null}"#, "test").is_empty());
        assert!(normalize_response(r#"{"other_key": []}"#, "test").is_empty());
        assert!(normalize_response(r#"{"golden_nuggets": "oops"}"#, "test").is_empty());
    }

    #[test]
    fn test_malformed_item_dropped_not_fatal() {
        let raw = r#"{"golden_nuggets": [
            {"type": "tool", "startContent": "good", "endContent": "item"},
            {"type": "tool"},
            {"type": "media", "startContent": "another", "endContent": "good one"}
        ]}"#;
        let candidates = normalize_response(raw, "test");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].start_content.as_deref(), Some("good"));
        assert_eq!(candidates[1].kind, NuggetKind::Media);
    }

    #[test]
    fn test_empty_boundary_after_trim_dropped() {
        let raw = r#"[{"type": "tool", "startContent": "  ", "endContent": "b"}]"#;
        assert!(normalize_response(raw, "test").is_empty());
    }

    #[test]
    fn test_synonym_table() {
        let cases = [
            ("mental model", NuggetKind::Model),
            ("mental_model", NuggetKind::Model),
            ("framework", NuggetKind::Model),
            ("technique", NuggetKind::Tool),
            ("method", NuggetKind::Tool),
            ("resource", NuggetKind::Media),
            ("book", NuggetKind::Media),
            ("article", NuggetKind::Media),
            ("concept", NuggetKind::Explanation),
            ("comparison", NuggetKind::Analogy),
            ("metaphor", NuggetKind::Analogy),
        ];
        for (label, expected) in cases {
            assert_eq!(resolve_kind(Some(label), "test"), expected, "label: {}", label);
            assert_eq!(
                resolve_kind(Some(&label.to_uppercase()), "test"),
                expected,
                "label: {}",
                label
            );
        }
    }

    #[test]
    fn test_canonical_labels_resolve_to_themselves() {
        for kind in NuggetKind::all() {
            assert_eq!(resolve_kind(Some(kind.as_str()), "test"), kind);
        }
    }

    #[test]
    fn test_unknown_label_maps_to_default() {
        assert_eq!(resolve_kind(Some("galaxy brain"), "test"), DEFAULT_KIND);
        assert_eq!(resolve_kind(None, "test"), DEFAULT_KIND);
        let raw = r#"[{"type": "galaxy brain", "startContent": "a", "endContent": "b"}]"#;
        let candidates = normalize_response(raw, "test");
        assert_eq!(candidates[0].kind, DEFAULT_KIND);
    }

    #[test]
    fn test_legacy_content_both_boundaries() {
        let raw = r#"[{"type": "tool", "content": "the whole nugget text"}]"#;
        let candidates = normalize_response(raw, "test");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].start_content.as_deref(), Some("the whole nugget text"));
        assert_eq!(candidates[0].end_content.as_deref(), Some("the whole nugget text"));
        assert_eq!(candidates[0].full_content.as_deref(), Some("the whole nugget text"));
    }

    #[test]
    fn test_legacy_content_synthesizes_missing_end() {
        let content = "a".repeat(250);
        let raw = format!(
            r#"[{{"type": "tool", "content": "{}", "startContent": "aaa"}}]"#,
            content
        );
        let candidates = normalize_response(&raw, "test");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].start_content.as_deref(), Some("aaa"));
        let end = candidates[0].end_content.as_deref().unwrap();
        assert_eq!(end.chars().count(), LEGACY_BOUNDARY_CHARS);
        assert_eq!(candidates[0].full_content.as_deref(), Some(content.as_str()));
    }

    #[test]
    fn test_legacy_content_synthesizes_missing_start() {
        let raw = r#"[{"type": "tool", "content": "short content", "endContent": "content"}]"#;
        let candidates = normalize_response(raw, "test");
        assert_eq!(candidates.len(), 1);
        // Content shorter than the synthesis window is used whole
        assert_eq!(candidates[0].start_content.as_deref(), Some("short content"));
    }

    #[test]
    fn test_missing_confidence_defaults_and_clamps() {
        let raw = r#"[
            {"type": "tool", "startContent": "a", "endContent": "b"},
            {"type": "tool", "startContent": "c", "endContent": "d", "confidence": 7.5}
        ]"#;
        let candidates = normalize_response(raw, "test");
        assert_eq!(candidates[0].confidence, 1.0);
        assert_eq!(candidates[1].confidence, 1.0);
    }

    #[test]
    fn test_tail_chars_multibyte_safe() {
        let s = "äöü".repeat(50);
        assert_eq!(tail_chars(&s, 10).chars().count(), 10);
        assert_eq!(head_chars(&s, 10).chars().count(), 10);
        assert_eq!(head_chars("ab", 10), "ab");
    }
}
