//! Search Executor: fans a weighted variant list out to the
//! backend under bounded concurrency, an overall deadline, and per-variant
//! retry, never raising on a single variant's failure.

pub mod filter;
pub mod hit;
pub mod meilisearch;
pub mod options;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thai_search_config::SearchConfig;
use thai_search_core::{QueryVariant, SearchHit, SearchOptions, SearchResult};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time::Instant;

pub use meilisearch::MeilisearchClient;

#[derive(Error, Debug, Clone)]
pub enum ExecutorError {
    #[error("backend unavailable: {message}")]
    BackendUnavailable { message: String },

    #[error("invalid backend response: {message}")]
    InvalidResponse { message: String },
}

/// Raw backend reply, prior to per-hit conversion.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub hits: Vec<Map<String, Value>>,
    pub estimated_total_hits: u64,
    pub processing_time_ms: u64,
}

/// A pluggable search backend. `MeilisearchClient` is the only shipped
/// implementation; tests substitute fakes that don't touch the network.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, index: &str, query: &str, params: &options::BackendParams) -> Result<BackendResponse, ExecutorError>;
}

/// Bounded-concurrency fan-out engine.
pub struct Executor {
    backend: Arc<dyn SearchBackend>,
    config: SearchConfig,
}

impl Executor {
    pub fn new(backend: Arc<dyn SearchBackend>, config: SearchConfig) -> Self {
        Self { backend, config }
    }

    /// Issues every variant against the backend and returns one
    /// [`SearchResult`] per variant, in input order, regardless of
    /// completion order or per-variant success.
    pub async fn execute(&self, variants: Vec<QueryVariant>, index: &str, options: &SearchOptions) -> Vec<SearchResult> {
        if variants.is_empty() {
            return Vec::new();
        }

        let permits = if self.config.parallel_searches { self.config.max_concurrent_searches } else { 1 };
        let semaphore = Arc::new(Semaphore::new(permits.max(1)));

        let overall_timeout_ms = options.search_timeout_ms.min(self.config.timeout_ms);
        let deadline = Instant::now() + Duration::from_millis(overall_timeout_ms);

        let base = options::base_params(options);
        let mut handles = Vec::with_capacity(variants.len());

        for variant in variants {
            let semaphore = semaphore.clone();
            let backend = self.backend.clone();
            let index = index.to_string();
            let params = options::apply_variant_overrides(base.clone(), variant.kind);
            let retry_attempts = self.config.retry_attempts;
            let retry_delay = Duration::from_millis(self.config.retry_delay_ms);
            let timeout_fallback = variant.clone();

            let work = async move {
                let _permit = semaphore.acquire_owned().await;
                Self::execute_one(backend.as_ref(), &index, variant, &params, retry_attempts, retry_delay).await
            };

            handles.push(tokio::spawn(async move {
                match tokio::time::timeout_at(deadline, work).await {
                    Ok(result) => result,
                    Err(_) => SearchResult::failed(timeout_fallback, 0, "Search execution timed out"),
                }
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (position, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(result) => results.push(result),
                Err(_) => tracing::error!(position, "variant search task panicked"),
            }
        }
        results
    }

    async fn execute_one(
        backend: &dyn SearchBackend,
        index: &str,
        variant: QueryVariant,
        params: &options::BackendParams,
        retry_attempts: u32,
        retry_delay: Duration,
    ) -> SearchResult {
        let start = std::time::Instant::now();
        let mut attempt = 0;

        loop {
            match backend.search(index, &variant.text, params).await {
                Ok(response) => {
                    let hits: Vec<SearchHit> = response
                        .hits
                        .into_iter()
                        .filter_map(|record| {
                            let converted = hit::convert(record, &variant);
                            if converted.is_none() {
                                tracing::warn!(engine = %variant.engine_id, "skipping corrupt search record");
                            }
                            converted
                        })
                        .collect();

                    return SearchResult {
                        variant,
                        hits,
                        total_hits: response.estimated_total_hits,
                        wall_time_ms: start.elapsed().as_millis() as u64,
                        success: true,
                        error: None,
                        backend_metadata: Map::new(),
                    };
                }
                Err(e) => {
                    if attempt >= retry_attempts {
                        return SearchResult::failed(variant, start.elapsed().as_millis() as u64, e.to_string());
                    }
                    attempt += 1;
                    tokio::time::sleep(retry_delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use thai_search_core::VariantKind;

    struct FlakyBackend {
        fail_times: AtomicUsize,
    }

    #[async_trait]
    impl SearchBackend for FlakyBackend {
        async fn search(&self, _index: &str, _query: &str, _params: &options::BackendParams) -> Result<BackendResponse, ExecutorError> {
            if self.fail_times.fetch_sub(1, Ordering::SeqCst) > 0 {
                return Err(ExecutorError::BackendUnavailable { message: "transient".to_string() });
            }
            let mut record = Map::new();
            record.insert("id".to_string(), Value::String("doc-1".to_string()));
            record.insert("_rankingScore".to_string(), Value::from(0.5));
            Ok(BackendResponse { hits: vec![record], estimated_total_hits: 1, processing_time_ms: 1 })
        }
    }

    struct SleepyBackend;

    #[async_trait]
    impl SearchBackend for SleepyBackend {
        async fn search(&self, _index: &str, _query: &str, _params: &options::BackendParams) -> Result<BackendResponse, ExecutorError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(BackendResponse { hits: vec![], estimated_total_hits: 0, processing_time_ms: 0 })
        }
    }

    fn variant() -> QueryVariant {
        QueryVariant::new("ค้นหา", VariantKind::Original, "none", 0.8)
    }

    #[tokio::test]
    async fn output_order_matches_input_order() {
        let backend = Arc::new(FlakyBackend { fail_times: AtomicUsize::new(0) });
        let mut config = SearchConfig::default();
        config.max_concurrent_searches = 2;
        let executor = Executor::new(backend, config);

        let variants = vec![
            QueryVariant::new("a", VariantKind::Original, "none", 0.8),
            QueryVariant::new("b", VariantKind::Tokenized, "newmm", 0.9),
            QueryVariant::new("c", VariantKind::Fallback, "fallback", 0.3),
        ];
        let results = executor.execute(variants, "docs", &SearchOptions::default()).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].variant.text, "a");
        assert_eq!(results[1].variant.text, "b");
        assert_eq!(results[2].variant.text, "c");
    }

    #[tokio::test]
    async fn retries_recover_from_transient_failure() {
        let backend = Arc::new(FlakyBackend { fail_times: AtomicUsize::new(1) });
        let mut config = SearchConfig::default();
        config.retry_attempts = 2;
        config.retry_delay_ms = 1;
        let executor = Executor::new(backend, config);

        let results = executor.execute(vec![variant()], "docs", &SearchOptions::default()).await;
        assert!(results[0].success);
    }

    #[tokio::test]
    async fn overall_deadline_yields_failed_result_without_hanging() {
        let backend = Arc::new(SleepyBackend);
        let mut config = SearchConfig::default();
        config.timeout_ms = 1000;
        let executor = Executor::new(backend, config);

        let mut options = SearchOptions::default();
        options.search_timeout_ms = 100;

        let start = std::time::Instant::now();
        let results = executor.execute(vec![variant()], "docs", &options).await;
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
    }
}
