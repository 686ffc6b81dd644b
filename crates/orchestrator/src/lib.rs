//! Thin orchestrator sequencing the Query Processor, Search
//! Executor and Result Ranker behind a single `search`/`batch_search` call.
//!
//! Holds the expensive, long-lived resources — tokenizer engines, the
//! backend client — as fixed fields, and re-derives cheap per-request
//! `QueryProcessor`/`Executor`/`Ranker` instances from a [`SettingsHandle`]
//! snapshot on every call. A hot reload only ever swaps the handle's
//! pointer; in-flight requests keep the snapshot they started with.

pub mod context;
pub mod response;
pub mod validate;

use std::sync::Arc;

use thai_search_config::SettingsHandle;
use thai_search_core::{BatchSearchRequest, Error, SearchRequest, SearchResponse};
use thai_search_executor::{Executor, SearchBackend};
use thai_search_query::QueryProcessor;
use thai_search_ranker::Ranker;
use thai_search_tokenize::TokenizerEngine;
use tokio::sync::Semaphore;
use tracing::Instrument;
use uuid::Uuid;

pub struct Orchestrator {
    settings: SettingsHandle,
    primary_tokenizer: Arc<dyn TokenizerEngine>,
    fallback_tokenizers: Vec<Arc<dyn TokenizerEngine>>,
    backend: Arc<dyn SearchBackend>,
}

impl Orchestrator {
    pub fn new(
        settings: SettingsHandle,
        primary_tokenizer: Arc<dyn TokenizerEngine>,
        fallback_tokenizers: Vec<Arc<dyn TokenizerEngine>>,
        backend: Arc<dyn SearchBackend>,
    ) -> Self {
        Self { settings, primary_tokenizer, fallback_tokenizers, backend }
    }

    /// Validates the request, then runs it end to end. Only
    /// [`Error::Validation`] ever surfaces as `Err`; every downstream
    /// failure (tokenizer outage, executor errors, timeouts) is absorbed
    /// into a degraded response with `fallback_used=true`.
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse, Error> {
        let snapshot = self.settings.current();
        validate::validate_index_name(&request.index_name)?;
        validate::validate_query(&request.query, &snapshot.performance)?;

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "search_request",
            request_id = %request_id,
            query_len = request.query.chars().count(),
            index_name = %request.index_name,
        );

        Ok(self.run(request, &snapshot).instrument(span).await)
    }

    /// Validates the whole batch upfront (size bounds, index name, every
    /// query's shape) and fails it atomically on the first bad query;
    /// otherwise runs every query with the same `max_concurrent_searches`
    /// bound the Executor uses internally, preserving input order.
    pub async fn batch_search(&self, request: BatchSearchRequest) -> Result<Vec<SearchResponse>, Error> {
        let snapshot = self.settings.current();
        validate::validate_index_name(&request.index_name)?;
        validate::validate_batch_size(&request.queries, &snapshot.performance)?;
        for query in &request.queries {
            validate::validate_query(query, &snapshot.performance)?;
        }

        let permits = snapshot.search.max_concurrent_searches.max(1);
        let semaphore = Arc::new(Semaphore::new(permits));

        let mut handles = Vec::with_capacity(request.queries.len());
        for query in &request.queries {
            let single = SearchRequest {
                query: query.clone(),
                index_name: request.index_name.clone(),
                options: request.options.clone(),
                include_tokenization_info: request.include_tokenization_info,
                session_id: request.session_id.clone(),
            };
            let semaphore = semaphore.clone();
            let snapshot = snapshot.clone();
            let this = self.clone_handles();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                this.run(single, &snapshot).await
            }));
        }

        let mut responses = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(response) => responses.push(response),
                Err(_) => tracing::error!("batch search task panicked"),
            }
        }
        Ok(responses)
    }

    /// Runs one query through the Query Processor, Search Executor and
    /// Result Ranker. Never fails — any stage error degrades to an
    /// empty-hits, `fallback_used=true` response.
    async fn run(&self, request: SearchRequest, snapshot: &thai_search_config::Settings) -> SearchResponse {
        let start = std::time::Instant::now();

        let max_variants = snapshot.search.max_query_variants.min(request.options.max_query_variants as usize).max(1);
        let query_processor = QueryProcessor::new(
            self.primary_tokenizer.clone(),
            self.fallback_tokenizers.clone(),
            snapshot.tokenization.clone(),
            max_variants,
            snapshot.search.enable_fallback_search,
        );

        let processed = match query_processor.process(&request.query).await {
            Ok(processed) => processed,
            Err(error) => {
                tracing::warn!(%error, "query processor failed, returning degraded response");
                return response::degraded(&request, start.elapsed().as_secs_f64() * 1000.0);
            }
        };

        let executor = Executor::new(self.backend.clone(), snapshot.search.clone());
        let variants = processed.variants.clone();
        let results = executor.execute(variants, &request.index_name, &request.options).await;

        let context = context::build(&processed, &results);
        let total_hits = results.iter().map(|r| r.total_hits).max().unwrap_or(0);

        let ranker = Ranker::new(snapshot.ranking.clone(), snapshot.enable_a_b_testing, snapshot.search.deduplication_enabled);
        let ranked = ranker.rank(results, &request.query, Some(context), request.session_id.as_deref());

        let processing_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        response::build(&request, &processed, total_hits, ranked, processing_time_ms)
    }

    /// Cheap clone of the fixed resources, for moving into a spawned batch task.
    fn clone_handles(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            primary_tokenizer: self.primary_tokenizer.clone(),
            fallback_tokenizers: self.fallback_tokenizers.clone(),
            backend: self.backend.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use thai_search_config::Settings;
    use thai_search_core::{SearchOptions, TokenizationResult};
    use thai_search_executor::{BackendResponse, ExecutorError};
    use thai_search_tokenize::TokenizeError;

    struct FakeTokenizer {
        engine_id: &'static str,
        confidence: f32,
    }

    #[async_trait]
    impl TokenizerEngine for FakeTokenizer {
        async fn tokenize(&self, text: &str, _deadline: Duration) -> Result<TokenizationResult, TokenizeError> {
            let tokens: Vec<String> = text.split_whitespace().map(|s| s.to_string()).collect();
            let tokens = if tokens.is_empty() { vec![text.to_string()] } else { tokens };
            Ok(TokenizationResult::success(self.engine_id, tokens, 1, self.confidence))
        }

        fn engine_id(&self) -> &str {
            self.engine_id
        }
    }

    struct FailingTokenizer;

    #[async_trait]
    impl TokenizerEngine for FailingTokenizer {
        async fn tokenize(&self, _text: &str, _deadline: Duration) -> Result<TokenizationResult, TokenizeError> {
            Err(TokenizeError::Unavailable("down for maintenance".to_string()))
        }

        fn engine_id(&self) -> &str {
            "newmm"
        }
    }

    struct FakeBackend {
        hit_count: usize,
    }

    #[async_trait]
    impl SearchBackend for FakeBackend {
        async fn search(
            &self,
            _index: &str,
            _query: &str,
            _params: &thai_search_executor::options::BackendParams,
        ) -> Result<BackendResponse, ExecutorError> {
            let hits = (0..self.hit_count)
                .map(|i| {
                    let mut doc = serde_json::Map::new();
                    doc.insert("title".to_string(), serde_json::json!(format!("doc {i}")));
                    doc.insert("content".to_string(), serde_json::json!("เนื้อหาภาษาไทย"));
                    doc.insert("id".to_string(), serde_json::json!(format!("doc-{i}")));
                    doc.insert("_rankingScore".to_string(), serde_json::json!(0.8));
                    doc
                })
                .collect();
            Ok(BackendResponse { hits, estimated_total_hits: self.hit_count as u64, processing_time_ms: 2 })
        }
    }

    fn orchestrator(backend_hits: usize) -> Orchestrator {
        Orchestrator::new(
            SettingsHandle::new(Settings::default()),
            Arc::new(FakeTokenizer { engine_id: "newmm", confidence: 0.95 }),
            vec![Arc::new(FakeTokenizer { engine_id: "attacut", confidence: 0.9 })],
            Arc::new(FakeBackend { hit_count: backend_hits }),
        )
    }

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            index_name: "documents".to_string(),
            options: SearchOptions::default(),
            include_tokenization_info: false,
            session_id: None,
        }
    }

    #[tokio::test]
    async fn pure_thai_query_returns_ranked_hits() {
        let response = orchestrator(3).search(request("ค้นหาเอกสาร")).await.unwrap();
        assert!(!response.hits.is_empty());
        assert!(!response.query_info.fallback_used);
    }

    #[tokio::test]
    async fn pure_english_query_returns_ranked_hits() {
        let response = orchestrator(3).search(request("search documents")).await.unwrap();
        assert!(!response.hits.is_empty());
    }

    #[tokio::test]
    async fn mixed_language_query_is_flagged_as_mixed() {
        let response = orchestrator(2).search(request("search เอกสาร")).await.unwrap();
        assert!(response.query_info.mixed_content);
    }

    #[tokio::test]
    async fn tokenizer_outage_degrades_to_fallback_response_without_erroring() {
        let orchestrator = Orchestrator::new(
            SettingsHandle::new(Settings::default()),
            Arc::new(FailingTokenizer),
            vec![Arc::new(FailingTokenizer)],
            Arc::new(FakeBackend { hit_count: 2 }),
        );
        let response = orchestrator.search(request("ค้นหา")).await.unwrap();
        assert!(!response.hits.is_empty() || response.query_info.fallback_used);
    }

    #[tokio::test]
    async fn blank_query_is_rejected_as_validation_error() {
        let result = orchestrator(1).search(request("   ")).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[tokio::test]
    async fn batch_search_preserves_input_order() {
        let request = BatchSearchRequest {
            queries: vec!["หนึ่ง".to_string(), "สอง".to_string(), "สาม".to_string()],
            index_name: "documents".to_string(),
            options: SearchOptions::default(),
            include_tokenization_info: false,
            session_id: None,
        };
        let responses = orchestrator(2).batch_search(request).await.unwrap();
        assert_eq!(responses.len(), 3);
    }
}
