//! External request/response envelopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::StructuredFilter;

fn default_limit() -> u32 {
    20
}
fn default_offset() -> u32 {
    0
}
fn default_highlight() -> bool {
    true
}
fn default_crop_length() -> u32 {
    200
}
fn default_crop_marker() -> String {
    "...".to_string()
}
fn default_matching_strategy() -> String {
    "last".to_string()
}
fn default_enable_compound_search() -> bool {
    true
}
fn default_boost_exact_matches() -> f32 {
    1.5
}
fn default_boost_thai_matches() -> f32 {
    1.2
}
fn default_max_query_variants() -> u32 {
    5
}
fn default_search_timeout_ms() -> u64 {
    5000
}

/// External SearchOptions envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub limit: u32,
    pub offset: u32,
    pub filters: Option<StructuredFilter>,
    pub sort: Option<Vec<String>>,
    pub highlight: bool,
    pub attributes_to_retrieve: Option<Vec<String>>,
    pub attributes_to_highlight: Option<Vec<String>>,
    pub crop_length: u32,
    pub crop_marker: String,
    pub matching_strategy: String,
    pub force_tokenization: bool,
    pub tokenization_engine: Option<String>,
    pub enable_compound_search: bool,
    pub boost_exact_matches: f32,
    pub boost_thai_matches: f32,
    pub max_query_variants: u32,
    pub search_timeout_ms: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: default_offset(),
            filters: None,
            sort: None,
            highlight: default_highlight(),
            attributes_to_retrieve: None,
            attributes_to_highlight: None,
            crop_length: default_crop_length(),
            crop_marker: default_crop_marker(),
            matching_strategy: default_matching_strategy(),
            force_tokenization: false,
            tokenization_engine: None,
            enable_compound_search: default_enable_compound_search(),
            boost_exact_matches: default_boost_exact_matches(),
            boost_thai_matches: default_boost_thai_matches(),
            max_query_variants: default_max_query_variants(),
            search_timeout_ms: default_search_timeout_ms(),
        }
    }
}

/// External SearchRequest envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub index_name: String,
    #[serde(default)]
    pub options: SearchOptions,
    #[serde(default)]
    pub include_tokenization_info: bool,
    /// Opaque A/B bucketing identifier; not interpreted by the core beyond
    /// hashing.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// External BatchSearchRequest envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSearchRequest {
    pub queries: Vec<String>,
    pub index_name: String,
    #[serde(default)]
    pub options: SearchOptions,
    #[serde(default)]
    pub include_tokenization_info: bool,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// External QueryInfo envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryInfo {
    pub original_query: String,
    pub processed_query: String,
    pub thai_content_detected: bool,
    pub mixed_content: bool,
    pub query_variants_used: usize,
    pub fallback_used: bool,
}

/// External PaginationInfo envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub offset: u32,
    pub limit: u32,
    pub total_hits: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationInfo {
    pub fn new(offset: u32, limit: u32, total_hits: u64) -> Self {
        Self {
            offset,
            limit,
            total_hits,
            has_next_page: (offset as u64 + limit as u64) < total_hits,
            has_previous_page: offset > 0,
        }
    }
}

/// Optional tokenization diagnostics, included when
/// `include_tokenization_info` is set on the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizationInfo {
    pub engines_attempted: Vec<String>,
    pub engines_succeeded: Vec<String>,
    pub average_confidence: f32,
    pub variants: Vec<String>,
}

/// External SearchResponse envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<crate::search::SearchHit>,
    pub total_hits: u64,
    pub processing_time_ms: f64,
    pub query_info: QueryInfo,
    pub pagination: PaginationInfo,
    pub tokenization_info: Option<TokenizationInfo>,
    pub timestamp: DateTime<Utc>,
}
