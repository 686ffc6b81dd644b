//! The four ranking algorithms.

use std::cmp::Ordering;
use std::collections::HashMap;

use thai_search_config::RankingConfig;
use thai_search_core::{QueryContext, SearchHit};

use crate::candidate::Candidate;
use crate::merge;
use crate::tie_break;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmId {
    Weighted,
    Optimised,
    Simple,
    Experimental,
}

impl AlgorithmId {
    /// Parses a configured algorithm id, defaulting unrecognised values to
    /// the rigorous `Weighted` path rather than failing (the ranker never
    /// fails per its contract).
    pub fn parse(id: &str) -> Self {
        match id {
            "optimized_score" => Self::Optimised,
            "simple" => Self::Simple,
            "experimental" => Self::Experimental,
            _ => Self::Weighted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weighted => "weighted_score",
            Self::Optimised => "optimized_score",
            Self::Simple => "simple",
            Self::Experimental => "experimental",
        }
    }
}

/// Runs the selected algorithm end to end, returning the resulting hits
/// (still carrying per-hit scores, pre-normalization) and the number of
/// duplicates it eliminated. `deduplication_enabled` gates the `Weighted`
/// (and `Experimental`, which wraps it) merge pass only — `Optimised` and
/// `Simple` always collapse by `document_id` as part of their own contract.
pub fn run(
    id: AlgorithmId,
    candidates: Vec<Candidate>,
    config: &RankingConfig,
    context: &QueryContext,
    deduplication_enabled: bool,
) -> (Vec<SearchHit>, usize) {
    match id {
        AlgorithmId::Weighted => weighted(candidates, config, deduplication_enabled),
        AlgorithmId::Optimised => optimised(candidates),
        AlgorithmId::Simple => simple(candidates),
        AlgorithmId::Experimental => experimental(candidates, config, context, deduplication_enabled),
    }
}

/// The rigorous path: full id+similarity merge (unless
/// `deduplication_enabled` is false, in which case every candidate stands
/// as its own representative), then a variant-weight factor relative to the
/// strongest variant in this request on top of the plain `variant.weight`
/// multiplier.
fn weighted(candidates: Vec<Candidate>, config: &RankingConfig, deduplication_enabled: bool) -> (Vec<SearchHit>, usize) {
    let max_variant_weight = candidates
        .iter()
        .map(|c| c.variant_weight)
        .fold(0.0_f32, f32::max)
        .max(f32::EPSILON);

    let (representatives, duplicates_removed) = if deduplication_enabled {
        let outcome = merge::merge(candidates, config.similarity_threshold);
        (outcome.representatives, outcome.duplicates_removed)
    } else {
        (candidates, 0)
    };

    let hits = representatives
        .into_iter()
        .map(|mut candidate| {
            let variant_weight_factor = candidate.variant_weight / max_variant_weight;
            candidate.hit.score *= candidate.variant_weight * variant_weight_factor;
            candidate.hit.ranking_info_insert("variant_weight_factor", variant_weight_factor as f64);
            candidate.hit
        })
        .collect();

    (hits, duplicates_removed)
}

/// The fast path: a single pass keeping the tie-break winner per
/// `document_id`, no similarity clustering.
fn optimised(candidates: Vec<Candidate>) -> (Vec<SearchHit>, usize) {
    let mut best: HashMap<String, Candidate> = HashMap::new();
    let mut duplicates = 0usize;

    for candidate in candidates {
        let id = candidate.hit.document_id.clone();
        let replace = match best.get(&id) {
            Some(existing) => {
                duplicates += 1;
                tie_break::compare(&candidate, existing) == Ordering::Less
            }
            None => true,
        };
        if replace {
            best.insert(id, candidate);
        }
    }

    let hits = best
        .into_values()
        .map(|mut candidate| {
            candidate.hit.score *= candidate.variant_weight;
            candidate.hit
        })
        .collect();

    (hits, duplicates)
}

/// ID-dedup keeping the maximum score; no boost logic beyond §4.3.1.
fn simple(candidates: Vec<Candidate>) -> (Vec<SearchHit>, usize) {
    let mut best: HashMap<String, Candidate> = HashMap::new();
    let mut duplicates = 0usize;

    for candidate in candidates {
        let id = candidate.hit.document_id.clone();
        let replace = match best.get(&id) {
            Some(existing) => {
                duplicates += 1;
                candidate.hit.score > existing.hit.score
            }
            None => true,
        };
        if replace {
            best.insert(id, candidate);
        }
    }

    (best.into_values().map(|c| c.hit).collect(), duplicates)
}

/// `Weighted` with an extra boost when the query is strongly Thai.
fn experimental(
    candidates: Vec<Candidate>,
    config: &RankingConfig,
    context: &QueryContext,
    deduplication_enabled: bool,
) -> (Vec<SearchHit>, usize) {
    let (mut hits, duplicates) = weighted(candidates, config, deduplication_enabled);
    if context.thai_ratio > 0.7 {
        for hit in hits.iter_mut() {
            hit.score *= 1.2;
            hit.ranking_info_insert("experimental_boost", 1.2_f64);
        }
    }
    (hits, duplicates)
}
