//! `reqwest`-backed [`SearchBackend`] for a Meilisearch-compatible server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::options::BackendParams;
use crate::{BackendResponse, ExecutorError, SearchBackend};

#[derive(Debug, Serialize)]
struct MeiliSearchRequest<'a> {
    q: &'a str,
    limit: u32,
    offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<&'a [String]>,
    #[serde(rename = "matchingStrategy")]
    matching_strategy: &'a str,
    #[serde(rename = "showRankingScore")]
    show_ranking_score: bool,
    #[serde(rename = "showMatchesPosition")]
    show_matches_position: bool,
    #[serde(rename = "attributesToRetrieve", skip_serializing_if = "Option::is_none")]
    attributes_to_retrieve: Option<&'a [String]>,
    #[serde(rename = "attributesToHighlight", skip_serializing_if = "Option::is_none")]
    attributes_to_highlight: Option<&'a [String]>,
    #[serde(rename = "cropLength")]
    crop_length: u32,
    #[serde(rename = "cropMarker")]
    crop_marker: &'a str,
}

#[derive(Debug, Deserialize)]
struct MeiliSearchResponse {
    hits: Vec<Map<String, Value>>,
    #[serde(rename = "estimatedTotalHits", default)]
    estimated_total_hits: u64,
    #[serde(rename = "processingTimeMs", default)]
    processing_time_ms: u64,
}

pub struct MeilisearchClient {
    client: Client,
    base_url: String,
}

impl MeilisearchClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<&str>, timeout: Duration) -> Result<Self, ExecutorError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(key) = api_key {
            let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| ExecutorError::BackendUnavailable { message: e.to_string() })?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ExecutorError::BackendUnavailable { message: format!("failed to build HTTP client: {e}") })?;

        Ok(Self { client, base_url: base_url.into() })
    }
}

#[async_trait]
impl SearchBackend for MeilisearchClient {
    async fn search(&self, index: &str, query: &str, params: &BackendParams) -> Result<BackendResponse, ExecutorError> {
        let url = format!("{}/indexes/{}/search", self.base_url, index);

        let body = MeiliSearchRequest {
            q: query,
            limit: params.limit,
            offset: params.offset,
            filter: params.filter.as_deref(),
            sort: params.sort.as_deref(),
            matching_strategy: &params.matching_strategy,
            show_ranking_score: params.show_ranking_score,
            show_matches_position: params.show_matches_position,
            attributes_to_retrieve: params.attributes_to_retrieve.as_deref(),
            attributes_to_highlight: params.attributes_to_highlight.as_deref(),
            crop_length: params.crop_length,
            crop_marker: &params.crop_marker,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExecutorError::BackendUnavailable { message: e.to_string() })?;

        if !response.status().is_success() {
            return Err(ExecutorError::BackendUnavailable {
                message: format!("backend returned HTTP {}", response.status()),
            });
        }

        let parsed: MeiliSearchResponse = response
            .json()
            .await
            .map_err(|e| ExecutorError::InvalidResponse { message: e.to_string() })?;

        Ok(BackendResponse {
            hits: parsed.hits,
            estimated_total_hits: parsed.estimated_total_hits,
            processing_time_ms: parsed.processing_time_ms,
        })
    }
}
