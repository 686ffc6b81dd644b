//! Search-side entities: the output of the Search Executor and the
//! input/output of the Result Ranker.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::{PrimaryLanguage, QueryVariant};

/// A single hit as returned (and progressively annotated) through the
/// pipeline. `score` is mutated in place by the ranker; `ranking_info` is
/// the public diagnostic payload exposed to API consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub document_id: String,
    pub score: f32,
    pub document: Map<String, Value>,
    pub highlight: Option<Map<String, Value>>,
    #[serde(default)]
    pub ranking_info: Map<String, Value>,
}

impl SearchHit {
    /// Lower-cased `title` field, if present and a string.
    pub fn title_lower(&self) -> String {
        self.document
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase()
    }

    /// Lower-cased `content` field, if present and a string.
    pub fn content_lower(&self) -> String {
        self.document
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase()
    }

    pub fn ranking_info_insert(&mut self, key: &str, value: impl Into<Value>) {
        self.ranking_info.insert(key.to_string(), value.into());
    }
}

/// Outcome of issuing one [`QueryVariant`] against the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub variant: QueryVariant,
    pub hits: Vec<SearchHit>,
    pub total_hits: u64,
    pub wall_time_ms: u64,
    pub success: bool,
    pub error: Option<String>,
    #[serde(default)]
    pub backend_metadata: Map<String, Value>,
}

impl SearchResult {
    pub fn failed(variant: QueryVariant, wall_time_ms: u64, error: impl Into<String>) -> Self {
        Self {
            variant,
            hits: Vec::new(),
            total_hits: 0,
            wall_time_ms,
            success: false,
            error: Some(error.into()),
            backend_metadata: Map::new(),
        }
    }
}

/// Derived query features the ranker uses for boosting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryContext {
    pub original_text: String,
    pub processed_text: String,
    pub thai_ratio: f32,
    pub mixed_content: bool,
    pub primary_language: PrimaryLanguage,
    pub query_length: usize,
    pub tokenization_confidence: f32,
    pub variant_count: usize,
    pub upstream_processing_time_ms: u64,
}

/// Final, ranked output of one search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResults {
    pub hits: Vec<SearchHit>,
    pub unique_hit_count: usize,
    pub deduplication_count: usize,
    pub ranking_time_ms: u64,
    pub algorithm_id: String,
    pub context: QueryContext,
}
