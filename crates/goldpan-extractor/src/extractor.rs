//! Two-phase extraction coordinator

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::phase_two;
use crate::types::{ExtractionRequest, ExtractionResult};
use goldpan_domain::{
    BoundaryRefinement, CandidateProvider, ExtractionMetadata, ExtractionMethod, RawCandidate,
    ReconciledNugget,
};
use goldpan_grouper::{Grouper, GrouperConfig};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

/// Coordinates the two-phase extraction pipeline
///
/// Phase 1 asks the provider for high-recall, confidence-scored candidates;
/// the confidence filter keeps the survivors; phase 2 pins each survivor's
/// boundaries down against the source text, locally where it can and
/// through the provider's refinement call where it cannot.
///
/// Only the phase-1 call can fail the run. Everything after it degrades
/// per candidate: an unresolvable candidate becomes an explicitly-unmatched
/// fallback nugget or is dropped with a logged reason, and the rest of the
/// batch proceeds.
pub struct Extractor<P>
where
    P: CandidateProvider,
{
    provider: Arc<P>,
    config: ExtractionConfig,
}

impl<P> Extractor<P>
where
    P: CandidateProvider + Send + Sync + 'static,
    P::Error: std::fmt::Display,
{
    /// Create a new extractor over a candidate provider
    pub fn new(provider: P, config: ExtractionConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
        }
    }

    /// The configuration this extractor runs with
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run the full extract-then-reconcile pipeline
    pub async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<ExtractionResult, ExtractError> {
        if request.content.len() > self.config.max_content_length {
            return Err(ExtractError::ContentTooLong(
                request.content.len(),
                self.config.max_content_length,
            ));
        }

        let start_time = SystemTime::now();
        info!(content_len = request.content.len(), "starting extraction");

        // Phase 1: the only call allowed to fail the analysis
        let candidates = self.call_phase_one(&request).await?;
        let phase1_count = candidates.len();
        debug!(count = phase1_count, "phase 1 returned candidates");

        // Confidence filter. Only the failing candidates are dropped; a
        // batch where most candidates miss the threshold still processes
        // the ones that clear it, and processing stops early only when
        // nothing at all survives.
        let threshold = self.config.confidence_threshold;
        let survivors: Vec<RawCandidate> = candidates
            .into_iter()
            .filter(|c| c.confidence >= threshold)
            .collect();
        let phase1_filtered_count = survivors.len();

        if survivors.is_empty() {
            info!(phase1_count, threshold, "no candidates passed the confidence filter");
            return Ok(ExtractionResult {
                nuggets: Vec::new(),
                metadata: ExtractionMetadata {
                    phase1_count,
                    phase1_filtered_count: 0,
                    phase2_fuzzy_count: 0,
                    phase2_llm_count: 0,
                    no_nuggets_passed: true,
                    aborted_due_to_low_confidence: false,
                    total_processing_time_ms: elapsed_ms(start_time),
                    confidence_threshold: threshold,
                },
            });
        }

        let (fuzzy_matched, llm_matched) =
            self.execute_phase_two(&request.content, survivors).await;
        let phase2_fuzzy_count = fuzzy_matched.len();
        let phase2_llm_count = llm_matched.len();

        let mut nuggets = fuzzy_matched;
        nuggets.extend(llm_matched);

        if self.config.dedupe_similar && nuggets.len() > 1 {
            let before = nuggets.len();
            let grouper = Grouper::new(GrouperConfig::default());
            nuggets = grouper
                .group(&nuggets)
                .into_iter()
                .filter_map(|group| group.nuggets.into_iter().next())
                .collect();
            debug!(before, after = nuggets.len(), "deduplicated nuggets");
        }

        info!(
            phase2_fuzzy_count,
            phase2_llm_count,
            total = nuggets.len(),
            "extraction complete"
        );

        Ok(ExtractionResult {
            nuggets,
            metadata: ExtractionMetadata {
                phase1_count,
                phase1_filtered_count,
                phase2_fuzzy_count,
                phase2_llm_count,
                no_nuggets_passed: false,
                aborted_due_to_low_confidence: false,
                total_processing_time_ms: elapsed_ms(start_time),
                confidence_threshold: threshold,
            },
        })
    }

    /// Resolve every survivor's boundaries, locally first, remotely second
    ///
    /// Returns the locally-resolved bucket (exact/fuzzy placements plus
    /// explicitly-unmatched fallbacks) and the remotely-resolved bucket.
    async fn execute_phase_two(
        &self,
        content: &str,
        survivors: Vec<RawCandidate>,
    ) -> (Vec<ReconciledNugget>, Vec<ReconciledNugget>) {
        let boundary_words = self.config.boundary_words;

        let mut fuzzy_matched = Vec::new();
        let mut pending = Vec::new();
        for candidate in survivors {
            match phase_two::resolve_locally(&candidate, content, boundary_words) {
                Some(nugget) => fuzzy_matched.push(nugget),
                None => pending.push(candidate),
            }
        }

        let mut llm_matched = Vec::new();
        if pending.is_empty() {
            return (fuzzy_matched, llm_matched);
        }

        debug!(count = pending.len(), "requesting boundary refinement");
        match self.call_refinement(content, pending.clone()).await {
            Ok(refinement) => {
                // Pair each pending candidate with the first unclaimed
                // refined candidate of its kind, in provider order
                let mut pool: Vec<Option<RawCandidate>> =
                    refinement.into_candidates().into_iter().map(Some).collect();
                for original in &pending {
                    let refined = pool
                        .iter_mut()
                        .find(|slot| {
                            slot.as_ref().map_or(false, |r| r.kind == original.kind)
                        })
                        .and_then(|slot| slot.take());
                    let nugget = match refined {
                        Some(refined) => phase_two::resolve_refined(
                            original,
                            &refined,
                            content,
                            boundary_words,
                        ),
                        None => phase_two::fallback_nugget(original, content, boundary_words),
                    };
                    match nugget {
                        Some(n) if n.extraction_method == ExtractionMethod::Llm => {
                            llm_matched.push(n)
                        }
                        Some(n) => fuzzy_matched.push(n),
                        None => {}
                    }
                }
            }
            Err(reason) => {
                // A refinement failure costs only the pending candidates,
                // and even those keep their quotes as fallback nuggets
                warn!(error = %reason, "refinement call failed; degrading pending candidates");
                for original in &pending {
                    if let Some(nugget) =
                        phase_two::fallback_nugget(original, content, boundary_words)
                    {
                        fuzzy_matched.push(nugget);
                    }
                }
            }
        }

        (fuzzy_matched, llm_matched)
    }

    async fn call_phase_one(
        &self,
        request: &ExtractionRequest,
    ) -> Result<Vec<RawCandidate>, ExtractError> {
        let provider = Arc::clone(&self.provider);
        let content = request.content.clone();
        let prompt = request.prompt.clone();
        let kinds = request.selected_kinds.clone();
        let temperature = self.config.phase1_temperature;

        // The provider trait is blocking; run it off the async runtime
        tokio::task::spawn_blocking(move || {
            provider
                .extract_candidates(&content, &prompt, temperature, kinds.as_deref())
                .map_err(|e| ExtractError::Provider(e.to_string()))
        })
        .await
        .map_err(|e| ExtractError::Provider(format!("Task join error: {}", e)))?
    }

    async fn call_refinement(
        &self,
        content: &str,
        candidates: Vec<RawCandidate>,
    ) -> Result<BoundaryRefinement, String> {
        let provider = Arc::clone(&self.provider);
        let content = content.to_string();
        let temperature = self.config.phase2_temperature;

        tokio::task::spawn_blocking(move || {
            provider
                .refine_boundaries(&content, &candidates, temperature)
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| format!("Task join error: {}", e))?
    }
}

fn elapsed_ms(start: SystemTime) -> u64 {
    start
        .elapsed()
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as u64
}
