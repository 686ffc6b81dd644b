//! Assembles the external [`SearchResponse`] envelope from the
//! pipeline's internal outputs.

use chrono::Utc;
use thai_search_core::{
    PaginationInfo, ProcessedQuery, QueryInfo, RankedResults, SearchOptions, SearchRequest, SearchResponse,
    TokenizationInfo,
};

/// Builds the successful-path response once tokenization, execution and
/// ranking have all run. `total_hits` is the largest `estimated_total_hits`
/// reported across variants, the most generous honest estimate available.
pub fn build(
    request: &SearchRequest,
    processed: &ProcessedQuery,
    total_hits: u64,
    ranked: RankedResults,
    processing_time_ms: f64,
) -> SearchResponse {
    let options = &request.options;

    let hits = ranked
        .hits
        .into_iter()
        .skip(options.offset as usize)
        .take(options.limit as usize)
        .collect();

    let tokenization_info = request.include_tokenization_info.then(|| tokenization_info(processed));

    SearchResponse {
        hits,
        total_hits,
        processing_time_ms,
        query_info: QueryInfo {
            original_query: processed.original_text.clone(),
            processed_query: ranked.context.processed_text.clone(),
            thai_content_detected: processed.thai_detected,
            mixed_content: processed.mixed_content,
            query_variants_used: processed.variants.len(),
            fallback_used: processed.fallback_used,
        },
        pagination: PaginationInfo::new(options.offset, options.limit, total_hits),
        tokenization_info,
        timestamp: Utc::now(),
    }
}

/// Builds a degraded-but-well-formed response when any pipeline stage
/// failed outright: empty hits, `fallback_used=true`, whatever timing was
/// actually recorded.
pub fn degraded(request: &SearchRequest, processing_time_ms: f64) -> SearchResponse {
    let options = &request.options;
    SearchResponse {
        hits: Vec::new(),
        total_hits: 0,
        processing_time_ms,
        query_info: QueryInfo {
            original_query: request.query.clone(),
            processed_query: request.query.clone(),
            thai_content_detected: false,
            mixed_content: false,
            query_variants_used: 0,
            fallback_used: true,
        },
        pagination: PaginationInfo::new(options.offset, options.limit, 0),
        tokenization_info: None,
        timestamp: Utc::now(),
    }
}

fn tokenization_info(processed: &ProcessedQuery) -> TokenizationInfo {
    TokenizationInfo {
        engines_attempted: processed.tokenization_results.iter().map(|r| r.engine_id.clone()).collect(),
        engines_succeeded: processed
            .tokenization_results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.engine_id.clone())
            .collect(),
        average_confidence: processed.average_tokenization_confidence(),
        variants: processed.variants.iter().map(|v| v.text.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thai_search_core::{PrimaryLanguage, QueryContext};

    fn request() -> SearchRequest {
        SearchRequest {
            query: "ค้นหา".to_string(),
            index_name: "documents".to_string(),
            options: SearchOptions::default(),
            include_tokenization_info: false,
            session_id: None,
        }
    }

    fn processed() -> ProcessedQuery {
        ProcessedQuery {
            original_text: "ค้นหา".to_string(),
            tokenization_results: Vec::new(),
            variants: Vec::new(),
            total_processing_time_ms: 1,
            thai_detected: true,
            mixed_content: false,
            fallback_used: false,
            primary_language: PrimaryLanguage::Thai,
        }
    }

    fn empty_ranked() -> RankedResults {
        RankedResults {
            hits: Vec::new(),
            unique_hit_count: 0,
            deduplication_count: 0,
            ranking_time_ms: 0,
            algorithm_id: "weighted_score".to_string(),
            context: QueryContext {
                original_text: "ค้นหา".to_string(),
                processed_text: "ค้นหา".to_string(),
                thai_ratio: 1.0,
                mixed_content: false,
                primary_language: PrimaryLanguage::Thai,
                query_length: 5,
                tokenization_confidence: 0.0,
                variant_count: 0,
                upstream_processing_time_ms: 1,
            },
        }
    }

    #[test]
    fn degraded_response_has_empty_hits_and_fallback_flag() {
        let response = degraded(&request(), 5.0);
        assert!(response.hits.is_empty());
        assert!(response.query_info.fallback_used);
    }

    #[test]
    fn successful_response_omits_tokenization_info_unless_requested() {
        let response = build(&request(), &processed(), 0, empty_ranked(), 5.0);
        assert!(response.tokenization_info.is_none());
    }
}
