//! Builds the [`QueryContext`] the Ranker scores against, from the
//! Query Processor's output and the Executor's results.

use thai_search_core::{ProcessedQuery, QueryContext, SearchResult};

pub fn build(processed: &ProcessedQuery, results: &[SearchResult]) -> QueryContext {
    let analysis = thai_search_query::language::analyze(&processed.original_text);
    let upstream_processing_time_ms =
        processed.total_processing_time_ms + results.iter().map(|r| r.wall_time_ms).sum::<u64>();

    QueryContext {
        original_text: processed.original_text.clone(),
        processed_text: processed.first_tokenized_text().unwrap_or(&processed.original_text).to_string(),
        thai_ratio: analysis.thai_ratio,
        mixed_content: processed.mixed_content,
        primary_language: processed.primary_language,
        query_length: processed.original_text.chars().count(),
        tokenization_confidence: processed.average_tokenization_confidence(),
        variant_count: processed.variants.len(),
        upstream_processing_time_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thai_search_core::PrimaryLanguage;

    fn processed(text: &str) -> ProcessedQuery {
        ProcessedQuery {
            original_text: text.to_string(),
            tokenization_results: Vec::new(),
            variants: Vec::new(),
            total_processing_time_ms: 3,
            thai_detected: true,
            mixed_content: false,
            fallback_used: false,
            primary_language: PrimaryLanguage::Thai,
        }
    }

    #[test]
    fn thai_ratio_is_recomputed_from_original_text() {
        let context = build(&processed("ค้นหาเอกสาร"), &[]);
        assert!(context.thai_ratio > 0.9);
    }

    #[test]
    fn processing_time_sums_upstream_stages() {
        let context = build(&processed("x"), &[]);
        assert_eq!(context.upstream_processing_time_ms, 3);
    }
}
