//! Per-hit scoring.

use thai_search_config::RankingConfig;
use thai_search_core::{QueryContext, SearchHit, VariantKind};

/// Kind factor of `variant_boost`.
fn kind_factor(kind: VariantKind, boost_compound_matches: f32) -> f32 {
    match kind {
        VariantKind::Original => 1.1,
        VariantKind::Tokenized => 1.2,
        VariantKind::CompoundSplit => boost_compound_matches,
        VariantKind::MixedLanguage => 1.0,
        VariantKind::Fallback => 0.8,
    }
}

/// Engine factor of `variant_boost`.
fn engine_factor(engine_id: &str) -> f32 {
    match engine_id {
        "newmm" => 1.1,
        "attacut" | "deepcut" => 1.0,
        _ => 0.9,
    }
}

fn exact_match(original_query: &str, hit: &SearchHit) -> bool {
    let needle = original_query.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    hit.title_lower().contains(&needle) || hit.content_lower().contains(&needle)
}

/// One hit's factor breakdown plus its clamped final score.
pub struct ScoreBreakdown {
    pub base_score: f32,
    pub variant_boost: f32,
    pub thai_boost: f32,
    pub exact_match_boost: f32,
    pub tokenization_boost: f32,
    pub position_penalty: f32,
    pub final_score: f32,
}

/// Computes the per-hit score and writes the diagnostic breakdown into
/// `hit.ranking_info`. `position` is the hit's index within its variant's
/// result list (for `position_penalty`).
pub fn score_hit(
    hit: &mut SearchHit,
    kind: VariantKind,
    engine_id: &str,
    position: usize,
    original_query: &str,
    context: &QueryContext,
    config: &RankingConfig,
) -> ScoreBreakdown {
    let base_score = hit.score;

    let variant_boost = kind_factor(kind, config.boost_compound_matches) * engine_factor(engine_id);

    let thai_boost = if context.thai_ratio > 0.5 { config.boost_thai_matches } else { 1.0 };

    let exact_match_boost = if exact_match(original_query, hit) {
        let mut boost = config.boost_exact_matches;
        if kind == VariantKind::CompoundSplit {
            boost *= config.boost_compound_matches;
        }
        boost
    } else {
        1.0
    };

    let tokenization_boost = if context.tokenization_confidence > 0.8 {
        1.0 + (context.tokenization_confidence - 0.8) * 0.5
    } else {
        1.0
    };

    let position_penalty = if position > 0 {
        (-config.decay_factor * position as f32).exp()
    } else {
        1.0
    };

    let final_score = (base_score * variant_boost * thai_boost * exact_match_boost * tokenization_boost * position_penalty)
        .clamp(0.0, 1.0);

    hit.score = final_score;
    hit.ranking_info_insert("base_score", base_score as f64);
    hit.ranking_info_insert("variant_boost", variant_boost as f64);
    hit.ranking_info_insert("thai_boost", thai_boost as f64);
    hit.ranking_info_insert("exact_match_boost", exact_match_boost as f64);
    hit.ranking_info_insert("tokenization_boost", tokenization_boost as f64);
    hit.ranking_info_insert("position_penalty", position_penalty as f64);
    hit.ranking_info_insert("final_score", final_score as f64);

    ScoreBreakdown {
        base_score,
        variant_boost,
        thai_boost,
        exact_match_boost,
        tokenization_boost,
        position_penalty,
        final_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};
    use thai_search_core::PrimaryLanguage;

    fn hit(score: f32, title: &str) -> SearchHit {
        let mut document = Map::new();
        document.insert("title".to_string(), Value::String(title.to_string()));
        SearchHit { document_id: "doc-1".to_string(), score, document, highlight: None, ranking_info: Map::new() }
    }

    fn context(thai_ratio: f32, confidence: f32) -> QueryContext {
        QueryContext {
            original_text: "x".to_string(),
            processed_text: "x".to_string(),
            thai_ratio,
            mixed_content: false,
            primary_language: PrimaryLanguage::Thai,
            query_length: 1,
            tokenization_confidence: confidence,
            variant_count: 1,
            upstream_processing_time_ms: 0,
        }
    }

    #[test]
    fn exact_title_match_applies_configured_boost() {
        let mut h = hit(0.3, "ค้นหาเอกสาร");
        let config = RankingConfig::default();
        let breakdown = score_hit(&mut h, VariantKind::Original, "newmm", 0, "ค้นหาเอกสาร", &context(0.9, 0.5), &config);
        assert!((breakdown.exact_match_boost - config.boost_exact_matches).abs() < 1e-6);
    }

    #[test]
    fn position_penalty_decays_with_rank() {
        let config = RankingConfig::default();
        let mut first = hit(0.5, "unrelated");
        let b0 = score_hit(&mut first, VariantKind::Tokenized, "newmm", 0, "zzz", &context(0.0, 0.5), &config);
        let mut later = hit(0.5, "unrelated");
        let b5 = score_hit(&mut later, VariantKind::Tokenized, "newmm", 5, "zzz", &context(0.0, 0.5), &config);
        assert!(b5.position_penalty < b0.position_penalty);
    }

    #[test]
    fn final_score_is_clamped_to_unit_interval() {
        let config = RankingConfig::default();
        let mut h = hit(1.0, "exact needle match here");
        let breakdown = score_hit(&mut h, VariantKind::Tokenized, "newmm", 0, "exact needle match here", &context(0.9, 0.95), &config);
        assert!(breakdown.final_score <= 1.0);
    }
}
