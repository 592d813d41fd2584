//! Boundary matching against source text
//!
//! A candidate's `start_content`/`end_content` are searched for in a
//! normalized rendering of the source document, and the winning span is
//! mapped back to byte offsets in the original text so the returned slice
//! keeps its casing, punctuation, and spacing exactly as the page has them.

use crate::sanitize::sanitize_end_content;
use goldpan_domain::{RawCandidate, ReconciledNugget};
use thiserror::Error;
use tracing::debug;

/// Quote characters dropped during normalization
///
/// Models swap straight and typographic quotes freely, so quotes carry no
/// signal when locating text. All other punctuation is distinguishing and
/// kept.
const QUOTE_CHARS: [char; 7] = ['"', '\'', '`', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}'];

/// A span located in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanMatch {
    /// The literal slice of the source over the span, original casing intact
    pub text: String,

    /// Byte offset of the span start in the source
    pub start: usize,

    /// Byte offset one past the span end in the source
    pub end: usize,
}

/// Why a boundary pair could not be placed in the source
///
/// This is a returned value, not a raised failure; callers fall back to the
/// candidate's own content or drop the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatchFailure {
    /// The start boundary was empty after sanitization
    #[error("start content empty after sanitization")]
    EmptyStart,

    /// The end boundary was empty after sanitization
    #[error("end content empty after sanitization")]
    EmptyEnd,

    /// The start boundary does not occur in the source
    #[error("start content not found")]
    StartNotFound,

    /// The start occurs, but no end occurrence follows any of them
    #[error("end content not found after start")]
    EndNotFoundAfterStart,
}

/// Source text rendered for searching, with a map back to original bytes
struct NormalizedText {
    text: String,
    /// Original byte offset that produced each normalized byte
    starts: Vec<usize>,
    /// One past the original byte range that produced each normalized byte
    ends: Vec<usize>,
}

impl NormalizedText {
    fn new(source: &str) -> Self {
        let mut text = String::new();
        let mut starts = Vec::new();
        let mut ends = Vec::new();
        // Byte offset where the current whitespace run began, if one is open
        let mut pending_space: Option<usize> = None;

        for (offset, ch) in source.char_indices() {
            if QUOTE_CHARS.contains(&ch) {
                continue;
            }
            if ch.is_whitespace() {
                if !text.is_empty() && pending_space.is_none() {
                    pending_space = Some(offset);
                }
                continue;
            }
            if let Some(run_start) = pending_space.take() {
                text.push(' ');
                starts.push(run_start);
                ends.push(offset);
            }
            let char_end = offset + ch.len_utf8();
            for lowered in ch.to_lowercase() {
                let before = text.len();
                text.push(lowered);
                for _ in before..text.len() {
                    starts.push(offset);
                    ends.push(char_end);
                }
            }
        }
        // An unflushed run is trailing whitespace, which normalization trims

        Self { text, starts, ends }
    }
}

/// Normalize text for locating, not for scoring
///
/// Whitespace runs collapse to a single space, the result is lowercased and
/// trimmed, and quote characters are dropped. Everything else, punctuation
/// included, is preserved: this normalizer is used to *find* text and must
/// not destroy what distinguishes one passage from another. Empty input
/// normalizes to `""`.
pub fn normalize(text: &str) -> String {
    NormalizedText::new(text).text
}

/// Locate the span a boundary pair describes inside the source text
///
/// Both boundaries are sanitized and normalized, every occurrence of the
/// start is paired with the nearest end occurrence strictly after it, and
/// the *shortest* resulting span wins (earliest start breaks remaining
/// ties). Boundary phrases are short and recur; the tightest enclosing span
/// is assumed to be the intended one. There is no way to tell that reading
/// apart from a genuinely intended longer span, which is a known limit of
/// this search.
///
/// The returned [`SpanMatch::text`] is the literal slice of `source` over
/// the winning span, original casing, spacing, and punctuation intact.
pub fn locate_span(
    start_content: &str,
    end_content: &str,
    source: &str,
) -> Result<SpanMatch, MatchFailure> {
    let start_needle = normalize(&sanitize_end_content(start_content));
    if start_needle.is_empty() {
        return Err(MatchFailure::EmptyStart);
    }
    let end_needle = normalize(&sanitize_end_content(end_content));
    if end_needle.is_empty() {
        return Err(MatchFailure::EmptyEnd);
    }

    let norm = NormalizedText::new(source);
    let start_positions: Vec<usize> = norm
        .text
        .match_indices(&start_needle)
        .map(|(i, _)| i)
        .collect();
    if start_positions.is_empty() {
        return Err(MatchFailure::StartNotFound);
    }

    // (start, end) in normalized bytes; shortest span wins, earliest start
    // breaks ties. Scanning starts in order and replacing only on strictly
    // shorter spans gives both properties.
    let mut best: Option<(usize, usize)> = None;
    for &start in &start_positions {
        let search_from = start + start_needle.len();
        let Some(found) = norm.text[search_from..].find(&end_needle) else {
            continue;
        };
        let end = search_from + found + end_needle.len();
        let replace = match best {
            None => true,
            Some((best_start, best_end)) => end - start < best_end - best_start,
        };
        if replace {
            best = Some((start, end));
        }
    }
    let (start, end) = best.ok_or(MatchFailure::EndNotFoundAfterStart)?;

    let orig_start = norm.starts[start];
    let orig_end = norm.ends[end - 1];
    debug!(
        start = orig_start,
        end = orig_end,
        candidates = start_positions.len(),
        "located span"
    );
    Ok(SpanMatch {
        text: source[orig_start..orig_end].to_string(),
        start: orig_start,
        end: orig_end,
    })
}

/// Rebuild a candidate's passage text from its boundaries
///
/// Returns `""` when the candidate has no usable boundary pair, the located
/// source slice when the pair can be placed, and the
/// `"{start}...{end}"` placeholder when the source is empty or the search
/// finds nothing. Never panics.
pub fn reconstruct_full_content(candidate: &RawCandidate, source: &str) -> String {
    let (start, end) = match (
        candidate.start_content.as_deref(),
        candidate.end_content.as_deref(),
    ) {
        (Some(s), Some(e)) if !s.trim().is_empty() && !e.trim().is_empty() => (s, e),
        _ => return String::new(),
    };
    match locate_span(start, end, source) {
        Ok(span) => span.text,
        Err(_) => format!("{}...{}", start, end),
    }
}

/// Best available display text for a nugget
///
/// Prefers the nugget's own passage text; falls back to locating its
/// boundaries in `source` when given one, then to the boundary placeholder.
/// Returns `""` only when the nugget has no usable fields at all.
pub fn display_content(nugget: &ReconciledNugget, source: Option<&str>) -> String {
    if !nugget.full_content.trim().is_empty() {
        return nugget.full_content.clone();
    }
    let start = nugget.start_content.trim();
    let end = nugget.end_content.trim();
    if start.is_empty() || end.is_empty() {
        return String::new();
    }
    if let Some(source) = source {
        if let Ok(span) = locate_span(start, end, source) {
            return span.text;
        }
    }
    format!("{}...{}", start, end)
}

/// Derive display boundaries from a passage's own text
///
/// First and last `words` whitespace-words of `full_content`; the end side
/// is sanitized the same way a model-supplied boundary would be. A passage
/// shorter than `words` uses all of its words on both sides.
pub fn derive_boundaries(full_content: &str, words: usize) -> (String, String) {
    let tokens: Vec<&str> = full_content.split_whitespace().collect();
    if tokens.is_empty() {
        return (String::new(), String::new());
    }
    let take = words.max(1).min(tokens.len());
    let start = tokens[..take].join(" ");
    let end = sanitize_end_content(&tokens[tokens.len() - take..].join(" "));
    (start, end)
}

/// Check that a boundary pair can be found in the source
///
/// True when both boundaries, searched case-insensitively with whitespace
/// collapsed, occur somewhere in the source. This is the guarantee the
/// highlighting layer relies on; it is deliberately weaker than
/// [`locate_span`], because the boundaries of a short passage overlap and
/// both point at the same occurrence.
pub fn boundaries_locate(start_content: &str, end_content: &str, source: &str) -> bool {
    let normalized_source = normalize(source);
    let start = normalize(start_content);
    let end = normalize(end_content);
    !start.is_empty()
        && !end.is_empty()
        && normalized_source.contains(&start)
        && normalized_source.contains(&end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use goldpan_domain::{ExtractionMethod, NuggetId, NuggetKind};

    fn candidate(start: Option<&str>, end: Option<&str>) -> RawCandidate {
        RawCandidate {
            kind: NuggetKind::Explanation,
            full_content: None,
            start_content: start.map(String::from),
            end_content: end.map(String::from),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_normalize_collapses_and_lowercases() {
        assert_eq!(normalize("  Hello   World \t"), "hello world");
        assert_eq!(normalize("Line\none"), "line one");
    }

    #[test]
    fn test_normalize_preserves_punctuation() {
        assert_eq!(normalize("Mr. Smith, Ph.D.!"), "mr. smith, ph.d.!");
    }

    #[test]
    fn test_normalize_drops_quotes() {
        assert_eq!(normalize("\u{201C}don't\u{201D}"), "dont");
        assert_eq!(normalize("\"quoted\""), "quoted");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
    }

    #[test]
    fn test_locate_simple_span() {
        let source = "The quick brown fox jumps over the lazy dog.";
        let span = locate_span("The quick", "lazy dog", source).unwrap();
        assert_eq!(span.text, "The quick brown fox jumps over the lazy dog");
        assert_eq!(span.start, 0);
    }

    #[test]
    fn test_locate_ignores_case_and_spacing() {
        let source = "Some text.  THE QUICK\nbrown fox ends HERE, fine.";
        let span = locate_span("the quick", "ends here", source).unwrap();
        assert_eq!(span.text, "THE QUICK\nbrown fox ends HERE");
    }

    #[test]
    fn test_locate_sanitizes_boundaries() {
        let source = "Read Programming as Theory Building by Naur.pdf today";
        let span = locate_span("Read Programming", "Naur. pdf", source).unwrap();
        assert_eq!(span.text, "Read Programming as Theory Building by Naur.pdf");
    }

    #[test]
    fn test_locate_through_source_quotes() {
        let source = "He said \u{201C}simplicity wins\u{201D} and moved on.";
        let span = locate_span("He said", "simplicity wins", source).unwrap();
        assert_eq!(span.text, "He said \u{201C}simplicity wins");
    }

    #[test]
    fn test_shortest_span_wins_with_repeated_start() {
        // Start phrase occurs twice before the end phrase; the tighter
        // second span must win.
        let source = "alpha one filler filler alpha one beta two";
        let span = locate_span("alpha one", "beta two", source).unwrap();
        assert_eq!(span.text, "alpha one beta two");
        assert_eq!(span.start, 24);
    }

    #[test]
    fn test_earliest_start_breaks_length_ties() {
        let source = "x y z pad x y z";
        let span = locate_span("x", "z", source).unwrap();
        assert_eq!(span.start, 0);
        assert_eq!(span.text, "x y z");
    }

    #[test]
    fn test_start_not_found() {
        let err = locate_span("missing phrase", "dog", "the lazy dog").unwrap_err();
        assert_eq!(err, MatchFailure::StartNotFound);
    }

    #[test]
    fn test_end_not_found_after_start() {
        let err = locate_span("lazy dog", "the", "the lazy dog").unwrap_err();
        assert_eq!(err, MatchFailure::EndNotFoundAfterStart);
    }

    #[test]
    fn test_empty_boundaries_fail_with_side() {
        assert_eq!(
            locate_span("...", "dog", "the lazy dog").unwrap_err(),
            MatchFailure::EmptyStart
        );
        assert_eq!(
            locate_span("the", " \t", "the lazy dog").unwrap_err(),
            MatchFailure::EmptyEnd
        );
    }

    #[test]
    fn test_empty_source_never_panics() {
        assert_eq!(
            locate_span("start", "end", "").unwrap_err(),
            MatchFailure::StartNotFound
        );
    }

    #[test]
    fn test_locate_multibyte_source() {
        let source = "Vor dem Haus — ÜBER dem Tor — stand er.";
        let span = locate_span("über dem", "stand er", source).unwrap();
        assert_eq!(span.text, "ÜBER dem Tor — stand er");
    }

    #[test]
    fn test_reconstruct_found_span() {
        let source = "one two three four five";
        let c = candidate(Some("one two"), Some("four five"));
        assert_eq!(reconstruct_full_content(&c, source), "one two three four five");
    }

    #[test]
    fn test_reconstruct_missing_boundaries() {
        assert_eq!(reconstruct_full_content(&candidate(None, None), "text"), "");
        assert_eq!(reconstruct_full_content(&candidate(Some("a"), None), "text"), "");
        assert_eq!(reconstruct_full_content(&candidate(Some(" "), Some("b")), "text"), "");
    }

    #[test]
    fn test_reconstruct_placeholder_when_unfound() {
        let c = candidate(Some("alpha"), Some("omega"));
        assert_eq!(reconstruct_full_content(&c, "unrelated text"), "alpha...omega");
        assert_eq!(reconstruct_full_content(&c, ""), "alpha...omega");
    }

    #[test]
    fn test_display_content_prefers_full_content() {
        let nugget = ReconciledNugget {
            id: NuggetId::new(),
            kind: NuggetKind::Tool,
            start_content: "a".to_string(),
            end_content: "b".to_string(),
            full_content: "the whole passage".to_string(),
            confidence: 0.9,
            extraction_method: ExtractionMethod::Exact,
            validation_score: None,
        };
        assert_eq!(display_content(&nugget, None), "the whole passage");
    }

    #[test]
    fn test_display_content_falls_back_to_search_then_placeholder() {
        let nugget = ReconciledNugget {
            id: NuggetId::new(),
            kind: NuggetKind::Tool,
            start_content: "one two".to_string(),
            end_content: "four five".to_string(),
            full_content: String::new(),
            confidence: 0.9,
            extraction_method: ExtractionMethod::Fallback,
            validation_score: None,
        };
        assert_eq!(
            display_content(&nugget, Some("one two three four five")),
            "one two three four five"
        );
        assert_eq!(display_content(&nugget, Some("unrelated")), "one two...four five");
        assert_eq!(display_content(&nugget, None), "one two...four five");
    }

    #[test]
    fn test_display_content_empty_nugget() {
        let nugget = ReconciledNugget {
            id: NuggetId::new(),
            kind: NuggetKind::Tool,
            start_content: String::new(),
            end_content: String::new(),
            full_content: String::new(),
            confidence: 0.9,
            extraction_method: ExtractionMethod::Fallback,
            validation_score: None,
        };
        assert_eq!(display_content(&nugget, Some("source")), "");
    }

    #[test]
    fn test_derive_boundaries_long_passage() {
        let (start, end) = derive_boundaries("one two three four five six seven eight.", 3);
        assert_eq!(start, "one two three");
        assert_eq!(end, "six seven eight");
    }

    #[test]
    fn test_derive_boundaries_short_passage() {
        let (start, end) = derive_boundaries("just three words.", 5);
        assert_eq!(start, "just three words.");
        assert_eq!(end, "just three words");
    }

    #[test]
    fn test_derive_boundaries_empty() {
        assert_eq!(derive_boundaries("", 5), (String::new(), String::new()));
        assert_eq!(derive_boundaries("  \n ", 5), (String::new(), String::new()));
    }

    #[test]
    fn test_boundaries_locate_contract() {
        let source = "The quick brown fox jumps over the lazy dog.";
        assert!(boundaries_locate("THE  QUICK", "lazy dog", source));
        assert!(!boundaries_locate("purple fox", "lazy dog", source));
        assert!(!boundaries_locate("", "lazy dog", source));
    }

    #[test]
    fn test_boundaries_locate_accepts_overlapping_short_passage() {
        // A short passage derives overlapping boundaries that both point at
        // the same occurrence; that still satisfies the highlighter
        let source = "Profiling first matters. Then ship.";
        assert!(boundaries_locate(
            "Profiling first matters.",
            "Profiling first matters",
            source
        ));
    }
}
