//! Per-candidate boundary resolution for phase 2
//!
//! Each surviving candidate is placed in the source text locally when
//! possible; what cannot be placed goes to the remote refinement call, and
//! what survives neither becomes an explicitly-unmatched fallback nugget or
//! is dropped. Whatever path resolves a candidate, an LLM-supplied
//! `full_content` is emitted byte-for-byte and the display boundaries are
//! derived from it: a successful search is never allowed to overwrite a
//! verbatim quote with whatever the page happened to contain.

use goldpan_domain::{ExtractionMethod, NuggetId, RawCandidate, ReconciledNugget};
use goldpan_grouper::word_overlap_similarity;
use goldpan_reconciler::{boundaries_locate, derive_boundaries, locate_span, normalize};
use tracing::warn;

/// How a candidate was placed in the source, before tagging
struct Placement {
    full_content: String,
    method: ExtractionMethod,
    validation_score: Option<f64>,
}

fn usable(opt: &Option<String>) -> Option<&str> {
    opt.as_deref().filter(|s| !s.trim().is_empty())
}

/// Try to place a candidate in the source text without a remote call
fn try_place(candidate: &RawCandidate, content: &str) -> Option<Placement> {
    if let Some(full) = usable(&candidate.full_content) {
        if content.contains(full) {
            return Some(Placement {
                full_content: full.to_string(),
                method: ExtractionMethod::Exact,
                validation_score: Some(1.0),
            });
        }
        let normalized_full = normalize(full);
        if !normalized_full.is_empty() && normalize(content).contains(&normalized_full) {
            return Some(Placement {
                full_content: full.to_string(),
                method: ExtractionMethod::Fuzzy,
                validation_score: Some(1.0),
            });
        }
    }

    if candidate.has_boundaries() {
        let start = candidate.start_content.as_deref().unwrap_or_default();
        let end = candidate.end_content.as_deref().unwrap_or_default();
        if let Ok(span) = locate_span(start, end, content) {
            return Some(match usable(&candidate.full_content) {
                // The quote stays authoritative; the span only scores it
                Some(full) => Placement {
                    full_content: full.to_string(),
                    method: ExtractionMethod::Fuzzy,
                    validation_score: Some(word_overlap_similarity(full, &span.text)),
                },
                // No quote was supplied, so the located span becomes the text
                None => Placement {
                    full_content: span.text,
                    method: ExtractionMethod::Fuzzy,
                    validation_score: None,
                },
            });
        }
    }

    None
}

fn build(
    candidate: &RawCandidate,
    placement: Placement,
    content: &str,
    boundary_words: usize,
) -> ReconciledNugget {
    let (start_content, end_content) = derive_boundaries(&placement.full_content, boundary_words);
    // Display boundaries the highlighter cannot find make the nugget an
    // explicitly-unmatched fallback, never a silently wrong match
    let (method, validation_score) = if placement.method.is_matched()
        && !boundaries_locate(&start_content, &end_content, content)
    {
        (ExtractionMethod::Fallback, None)
    } else {
        (placement.method, placement.validation_score)
    };
    ReconciledNugget {
        id: NuggetId::new(),
        kind: candidate.kind,
        start_content,
        end_content,
        full_content: placement.full_content,
        confidence: candidate.confidence,
        extraction_method: method,
        validation_score,
    }
}

/// Resolve a candidate against the source text locally
///
/// `None` means the candidate needs the remote refinement call.
pub(crate) fn resolve_locally(
    candidate: &RawCandidate,
    content: &str,
    boundary_words: usize,
) -> Option<ReconciledNugget> {
    try_place(candidate, content).map(|p| build(candidate, p, content, boundary_words))
}

/// Resolve a candidate using the boundaries a refinement call produced
///
/// The refined fields only help with *locating*; the original candidate's
/// `full_content` stays authoritative. A candidate the refinement still
/// cannot place degrades to [`fallback_nugget`].
pub(crate) fn resolve_refined(
    original: &RawCandidate,
    refined: &RawCandidate,
    content: &str,
    boundary_words: usize,
) -> Option<ReconciledNugget> {
    let probe = RawCandidate {
        kind: original.kind,
        full_content: original
            .full_content
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| refined.full_content.clone()),
        start_content: refined.start_content.clone().or_else(|| original.start_content.clone()),
        end_content: refined.end_content.clone().or_else(|| original.end_content.clone()),
        confidence: original.confidence,
    };

    match try_place(&probe, content) {
        Some(mut placement) => {
            placement.method = ExtractionMethod::Llm;
            Some(build(&probe, placement, content, boundary_words))
        }
        None => fallback_nugget(&probe, content, boundary_words),
    }
}

/// Emit an explicitly-unmatched nugget for a candidate that could not be
/// placed anywhere, or drop it when there is no quote to carry
pub(crate) fn fallback_nugget(
    candidate: &RawCandidate,
    content: &str,
    boundary_words: usize,
) -> Option<ReconciledNugget> {
    match usable(&candidate.full_content) {
        Some(full) => Some(build(
            candidate,
            Placement {
                full_content: full.to_string(),
                method: ExtractionMethod::Fallback,
                validation_score: None,
            },
            content,
            boundary_words,
        )),
        None => {
            warn!(
                kind = %candidate.kind,
                "dropping candidate: no span located and no full content to fall back on"
            );
            None
        }
    }
}
