use serde_json::Value;
use std::cmp::Ordering;

use crate::core::{
    error::EngineError,
    filters::{is_available, matches_availability},
    normalizer::RecordNormalizer,
    paging::{paginate, reconcile, PageParams},
    scoring::Scorer,
};
use crate::models::{CandidateAnimal, PartialPage, ResultPage, ScoredCandidate, SeniorPreference};

/// Per-call ranking switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankOptions {
    /// Drop candidates whose process state is not available before paging
    pub available_only: bool,
}

/// Sort descending by score. Stable: equal scores keep their input order.
pub fn sort_by_score_desc(scored: &mut [ScoredCandidate]) {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// Score every candidate against `preference` and rank them
pub fn rank(
    candidates: Vec<CandidateAnimal>,
    preference: &SeniorPreference,
    scorer: &Scorer,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|animal| {
            let (score, classification) = scorer.score(&animal, preference);
            let available = is_available(animal.process_state.as_deref());
            ScoredCandidate {
                animal,
                score,
                classification,
                available,
            }
        })
        .collect();

    sort_by_score_desc(&mut scored);
    scored
}

/// Recommendation pipeline orchestrator
///
/// # Pipeline Stages
/// 1. Normalize raw upstream records
/// 2. Classify notes and score each candidate
/// 3. Stable descending rank
/// 4. Paginate
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    normalizer: RecordNormalizer,
    scorer: Scorer,
}

impl Recommender {
    pub fn new(normalizer: RecordNormalizer, scorer: Scorer) -> Self {
        Self { normalizer, scorer }
    }

    /// Rank a batch of raw records for one preference and return the
    /// requested page. Fails only when the preference is missing.
    pub fn recommend(
        &self,
        records: &[Value],
        preference: Option<&SeniorPreference>,
        params: PageParams,
        options: RankOptions,
    ) -> Result<ResultPage<ScoredCandidate>, EngineError> {
        let preference = preference.ok_or(EngineError::MissingPreference)?;

        let mut candidates = self.normalizer.normalize_all(records);
        let total_candidates = candidates.len();
        if options.available_only {
            candidates.retain(matches_availability);
        }

        let ranked = rank(candidates, preference, &self.scorer);

        tracing::debug!(
            "Ranked {} of {} candidates (available_only: {})",
            ranked.len(),
            total_candidates,
            options.available_only
        );

        Ok(paginate(ranked, params))
    }

    /// Rank one upstream batch.
    ///
    /// A batch that carries page metadata is already a single page: its
    /// content is ranked as a whole and the metadata reconciled. A bare
    /// list is treated as the full candidate set and paged locally.
    pub fn recommend_batch(
        &self,
        batch: PartialPage<Value>,
        preference: Option<&SeniorPreference>,
        params: PageParams,
        options: RankOptions,
    ) -> Result<ResultPage<ScoredCandidate>, EngineError> {
        let has_metadata = batch.number.is_some()
            || batch.total_elements.is_some()
            || batch.total_pages.is_some();
        if !has_metadata {
            return self.recommend(&batch.content, preference, params, options);
        }

        let preference = preference.ok_or(EngineError::MissingPreference)?;
        let PartialPage {
            content,
            number,
            size,
            total_elements,
            total_pages,
            first,
            last,
            empty,
        } = batch;

        let mut candidates = self.normalizer.normalize_all(&content);
        if options.available_only {
            candidates.retain(matches_availability);
        }

        Ok(reconcile(
            PartialPage {
                content: rank(candidates, preference, &self.scorer),
                number,
                size,
                total_elements,
                total_pages,
                first,
                last,
                empty,
            },
            params,
        ))
    }
}
