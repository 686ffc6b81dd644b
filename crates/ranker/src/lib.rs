//! Result Ranker: scores, merges, tie-breaks, dedups and
//! normalizes hits from every successful [`SearchResult`]. Purely
//! computational — no suspension points — and never fails; a
//! degenerate input just yields an empty [`RankedResults`].

pub mod algorithms;
pub mod candidate;
pub mod merge;
pub mod metrics;
pub mod normalize;
pub mod scoring;
pub mod tie_break;

use std::time::Instant;

use thai_search_config::RankingConfig;
use thai_search_core::{PrimaryLanguage, QueryContext, RankedResults, SearchResult};
use thiserror::Error;

use algorithms::AlgorithmId;
use candidate::Candidate;

/// Raised only at construction time, never by [`Ranker::rank`] itself — the
/// ranker's runtime contract is to never fail.
#[derive(Error, Debug, Clone)]
pub enum RankerError {
    #[error("unrecognized ranking algorithm: {0}")]
    InvalidAlgorithm(String),
}

pub struct Ranker {
    config: RankingConfig,
    ab_testing_enabled: bool,
    deduplication_enabled: bool,
}

impl Ranker {
    /// `deduplication_enabled` comes from `SearchConfig` (a fan-out knob
    /// the pipeline happens to share with the ranker, not a `RankingConfig`
    /// field) — it gates the `Weighted`/`Experimental` merge pass.
    pub fn new(config: RankingConfig, ab_testing_enabled: bool, deduplication_enabled: bool) -> Self {
        Self { config, ab_testing_enabled, deduplication_enabled }
    }

    /// Fails fast on an unrecognized `config.algorithm` at startup, rather
    /// than silently defaulting — for callers that want strict config
    /// validation ahead of serving traffic.
    pub fn try_new(config: RankingConfig, ab_testing_enabled: bool, deduplication_enabled: bool) -> Result<Self, RankerError> {
        const VALID: &[&str] = &["weighted_score", "optimized_score", "simple", "experimental"];
        if !VALID.contains(&config.algorithm.as_str()) {
            return Err(RankerError::InvalidAlgorithm(config.algorithm.clone()));
        }
        Ok(Self::new(config, ab_testing_enabled, deduplication_enabled))
    }

    /// `Rank(results, original_query, context?, session_id?) → RankedResults`.
    pub fn rank(
        &self,
        results: Vec<SearchResult>,
        original_query: &str,
        context: Option<QueryContext>,
        session_id: Option<&str>,
    ) -> RankedResults {
        let start = Instant::now();
        let context = context.unwrap_or_else(|| infer_context(original_query, &results));
        let total_input_hits: usize = results.iter().map(|r| r.hits.len()).sum();

        let algorithm_id = self.select_algorithm(original_query, session_id);

        let candidates = build_candidates(results, original_query, &context, &self.config);
        let (hits, duplicates_removed) =
            algorithms::run(algorithm_id, candidates, &self.config, &context, self.deduplication_enabled);
        let (hits, below_threshold) = normalize::normalize_and_filter(
            hits,
            self.config.enable_score_normalization,
            self.config.min_score_threshold,
        );

        let deduplication_count = total_input_hits.saturating_sub(hits.len());
        let ranking_time_ms = start.elapsed().as_millis() as u64;
        metrics::record_ranking(algorithm_id.as_str(), ranking_time_ms, duplicates_removed + below_threshold);

        RankedResults {
            unique_hit_count: hits.len(),
            hits,
            deduplication_count,
            ranking_time_ms,
            algorithm_id: algorithm_id.as_str().to_string(),
            context,
        }
    }

    fn select_algorithm(&self, original_query: &str, session_id: Option<&str>) -> AlgorithmId {
        let picked = ab_test::select_algorithm(
            &self.config.algorithm,
            self.config.ab_test_algorithm.as_deref(),
            self.config.ab_traffic_percentage,
            session_id,
            original_query,
            self.ab_testing_enabled,
        );
        AlgorithmId::parse(picked)
    }
}

/// Scores every hit of every successful result into a flat candidate list,
/// ready for whichever algorithm runs next. Failed variants contribute no
/// hits — their absence is already reflected upstream in the executor's
/// diagnostics.
fn build_candidates(
    results: Vec<SearchResult>,
    original_query: &str,
    context: &QueryContext,
    config: &RankingConfig,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for result in results {
        if !result.success {
            continue;
        }
        let variant = result.variant;
        for (position, mut hit) in result.hits.into_iter().enumerate() {
            scoring::score_hit(&mut hit, variant.kind, &variant.engine_id, position, original_query, context, config);
            candidates.push(Candidate {
                hit,
                kind: variant.kind,
                engine_id: variant.engine_id.clone(),
                position,
                variant_weight: variant.weight,
            });
        }
    }
    candidates
}

/// Builds a coarse [`QueryContext`] when the caller doesn't supply one —
/// the Orchestrator normally passes a precise context built from the
/// `ProcessedQuery` it already has, but `context` is optional in the
/// ranker's own contract, so standalone callers (including
/// these unit tests) still get a usable one.
fn infer_context(original_query: &str, results: &[SearchResult]) -> QueryContext {
    let non_whitespace = original_query.chars().filter(|c| !c.is_whitespace()).count().max(1) as f32;
    let thai_count = original_query.chars().filter(|c| thai_search_core::is_thai_char(*c)).count() as f32;
    let thai_ratio = thai_count / non_whitespace;

    let primary_language = if thai_ratio > 0.5 {
        PrimaryLanguage::Thai
    } else if thai_ratio > 0.0 {
        PrimaryLanguage::Mixed
    } else {
        PrimaryLanguage::English
    };

    let average_weight = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.variant.weight).sum::<f32>() / results.len() as f32
    };

    QueryContext {
        original_text: original_query.to_string(),
        processed_text: original_query.to_string(),
        thai_ratio,
        mixed_content: false,
        primary_language,
        query_length: original_query.chars().count(),
        tokenization_confidence: average_weight,
        variant_count: results.len(),
        upstream_processing_time_ms: results.iter().map(|r| r.wall_time_ms).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};
    use thai_search_core::{QueryVariant, SearchHit, VariantKind};

    fn result_with_hit(variant_text: &str, kind: VariantKind, doc_id: &str, score: f32) -> SearchResult {
        let mut document = Map::new();
        document.insert("title".to_string(), Value::String("ค้นหาเอกสาร".to_string()));
        let hit = SearchHit { document_id: doc_id.to_string(), score, document, highlight: None, ranking_info: Map::new() };
        SearchResult {
            variant: QueryVariant::new(variant_text, kind, "newmm", 1.0),
            hits: vec![hit],
            total_hits: 1,
            wall_time_ms: 5,
            success: true,
            error: None,
            backend_metadata: Map::new(),
        }
    }

    #[test]
    fn empty_input_yields_empty_ranked_results() {
        let ranker = Ranker::new(RankingConfig::default(), false, true);
        let ranked = ranker.rank(Vec::new(), "ค้นหา", None, None);
        assert!(ranked.hits.is_empty());
        assert_eq!(ranked.deduplication_count, 0);
    }

    #[test]
    fn duplicate_document_ids_are_collapsed_to_one_hit() {
        let ranker = Ranker::new(RankingConfig::default(), false, true);
        let results = vec![result_with_hit("ค้นหา เอกสาร", VariantKind::Tokenized, "doc-1", 0.8), result_with_hit("ค้นหาเอกสาร", VariantKind::Original, "doc-1", 0.95)];
        let ranked = ranker.rank(results, "ค้นหาเอกสาร", None, None);
        assert_eq!(ranked.unique_hit_count, 1);
        assert!(ranked.deduplication_count >= 1);
    }

    #[test]
    fn failed_variants_contribute_no_candidates() {
        let ranker = Ranker::new(RankingConfig::default(), false, true);
        let mut failed = result_with_hit("x", VariantKind::Fallback, "doc-9", 0.5);
        failed.success = false;
        failed.hits.clear();
        let ranked = ranker.rank(vec![failed], "x", None, None);
        assert!(ranked.hits.is_empty());
    }

    #[test]
    fn try_new_rejects_unknown_algorithm() {
        let mut config = RankingConfig::default();
        config.algorithm = "not_a_real_algorithm".to_string();
        assert!(Ranker::try_new(config, false, true).is_err());
    }

    #[test]
    fn output_is_sorted_descending_by_score() {
        let ranker = Ranker::new(RankingConfig::default(), false, true);
        let results = vec![result_with_hit("a", VariantKind::Tokenized, "doc-1", 0.3), result_with_hit("b", VariantKind::Tokenized, "doc-2", 0.9)];
        let ranked = ranker.rank(results, "ค้นหา", None, None);
        assert!(ranked.hits.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
