//! Query Processor: turns raw user input into a
//! [`ProcessedQuery`] carrying every candidate search string the Executor
//! should try, each weighted by how much the Ranker should trust it.

pub mod language;
pub mod last_resort;
pub mod variants;

use std::sync::Arc;
use std::time::Duration;

use thai_search_config::TokenizationConfig;
use thai_search_core::{ProcessedQuery, TokenizationResult};
use thai_search_tokenize::TokenizerEngine;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum QueryError {
    #[error("invalid query: {message}")]
    InvalidArgument { message: String },
}

/// Turns raw text into a [`ProcessedQuery`]. Holds the configured primary
/// and fallback tokenizer engines; everything else (language detection,
/// last-resort segmentation, variant weighting) is pure and stateless.
pub struct QueryProcessor {
    primary: Arc<dyn TokenizerEngine>,
    fallbacks: Vec<Arc<dyn TokenizerEngine>>,
    config: TokenizationConfig,
    max_query_variants: usize,
    enable_fallback_search: bool,
}

impl QueryProcessor {
    /// `enable_fallback_search` comes from `SearchConfig` (not
    /// `TokenizationConfig`) — it gates the last-resort character-level
    /// segmentation path when every configured engine fails.
    pub fn new(
        primary: Arc<dyn TokenizerEngine>,
        fallbacks: Vec<Arc<dyn TokenizerEngine>>,
        config: TokenizationConfig,
        max_query_variants: usize,
        enable_fallback_search: bool,
    ) -> Self {
        Self { primary, fallbacks, config, max_query_variants, enable_fallback_search }
    }

    pub async fn process(&self, query: &str) -> Result<ProcessedQuery, QueryError> {
        let start = std::time::Instant::now();

        if query.trim().is_empty() {
            return Err(QueryError::InvalidArgument { message: "query must not be blank".to_string() });
        }

        let analysis = language::analyze(query);
        let deadline = Duration::from_millis(self.config.timeout_ms);

        let mut tokenization_results: Vec<TokenizationResult> = Vec::new();

        if analysis.thai_detected || self.config.mixed_language_detection && analysis.mixed_content {
            let primary_result = self.invoke(self.primary.as_ref(), query, deadline).await;
            let primary_accepted =
                primary_result.success && primary_result.confidence >= self.config.confidence_threshold;
            tokenization_results.push(primary_result);

            if !primary_accepted || self.config.enable_compound_splitting {
                for engine in &self.fallbacks {
                    let result = self.invoke(engine.as_ref(), query, deadline).await;
                    tokenization_results.push(result);
                }
            }
        }

        let any_success = tokenization_results.iter().any(|r| r.success);
        let attempted_tokenization = !tokenization_results.is_empty();
        let all_engines_failed = attempted_tokenization && !any_success;
        let mut fallback_used = false;

        if all_engines_failed && self.enable_fallback_search {
            fallback_used = true;
            let tokens = last_resort::segment(query);
            if !tokens.is_empty() {
                tracing::warn!(query = %query, "all tokenization engines failed, using character-level fallback");
                tokenization_results.push(TokenizationResult::success(
                    "fallback",
                    tokens,
                    0,
                    last_resort::FALLBACK_CONFIDENCE,
                ));
            }
        }

        let variants = variants::generate(
            query,
            &tokenization_results,
            &analysis,
            self.config.preserve_original,
            self.config.enable_compound_splitting,
            self.max_query_variants,
            all_engines_failed,
        );

        Ok(ProcessedQuery {
            original_text: query.to_string(),
            tokenization_results,
            variants,
            total_processing_time_ms: start.elapsed().as_millis() as u64,
            thai_detected: analysis.thai_detected,
            mixed_content: analysis.mixed_content,
            fallback_used,
            primary_language: analysis.primary_language,
        })
    }

    async fn invoke(&self, engine: &dyn TokenizerEngine, text: &str, deadline: Duration) -> TokenizationResult {
        let start = std::time::Instant::now();
        match engine.tokenize(text, deadline).await {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(engine = engine.engine_id(), error = %err, "tokenizer engine failed");
                TokenizationResult::failure(engine.engine_id(), start.elapsed().as_millis() as u64, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use thai_search_tokenize::TokenizeError;

    struct AlwaysFails;

    #[async_trait]
    impl TokenizerEngine for AlwaysFails {
        async fn tokenize(&self, _text: &str, _deadline: Duration) -> Result<TokenizationResult, TokenizeError> {
            Err(TokenizeError::Unavailable("down".to_string()))
        }
        fn engine_id(&self) -> &str {
            "broken"
        }
    }

    struct AlwaysSucceeds;

    #[async_trait]
    impl TokenizerEngine for AlwaysSucceeds {
        async fn tokenize(&self, text: &str, _deadline: Duration) -> Result<TokenizationResult, TokenizeError> {
            let tokens: Vec<String> = text.split_whitespace().map(|s| s.to_string()).collect();
            Ok(TokenizationResult::success("newmm", tokens, 5, 0.95))
        }
        fn engine_id(&self) -> &str {
            "newmm"
        }
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let processor = QueryProcessor::new(Arc::new(AlwaysSucceeds), vec![], TokenizationConfig::default(), 5, true);
        let err = processor.process("   ").await.unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn pure_english_never_invokes_tokenizer() {
        let processor = QueryProcessor::new(Arc::new(AlwaysFails), vec![], TokenizationConfig::default(), 5, true);
        let processed = processor.process("search documents database").await.unwrap();
        assert!(!processed.thai_detected);
        assert!(processed.tokenization_results.is_empty());
        assert_eq!(processed.variants.len(), 1);
    }

    #[tokio::test]
    async fn total_tokenizer_outage_falls_back_to_character_level() {
        let processor = QueryProcessor::new(
            Arc::new(AlwaysFails),
            vec![Arc::new(AlwaysFails)],
            TokenizationConfig::default(),
            5,
            true,
        );
        let processed = processor.process("ค้นหาเอกสาร").await.unwrap();
        assert!(processed.fallback_used);
        assert!(processed.variants.iter().any(|v| v.engine_id == "fallback"));
    }

    #[tokio::test]
    async fn disabled_fallback_search_skips_character_level_segmentation() {
        let processor = QueryProcessor::new(
            Arc::new(AlwaysFails),
            vec![Arc::new(AlwaysFails)],
            TokenizationConfig::default(),
            5,
            false,
        );
        let processed = processor.process("ค้นหาเอกสาร").await.unwrap();
        assert!(!processed.fallback_used);
        assert!(!processed.variants.iter().any(|v| v.engine_id == "fallback"));
    }

    #[tokio::test]
    async fn successful_primary_produces_tokenized_variant() {
        let processor = QueryProcessor::new(Arc::new(AlwaysSucceeds), vec![], TokenizationConfig::default(), 5, true);
        let processed = processor.process("ค้นหา เอกสาร ภาษา ไทย").await.unwrap();
        assert!(!processed.fallback_used);
        assert!(processed.variants.len() >= 2);
    }
}
