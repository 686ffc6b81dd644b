//! HTTP client standing in for an externally hosted segmentation
//! microservice (e.g. attacut/deepcut served behind a REST API), built
//! around a plain `reqwest::Client` the same way any outbound HTTP
//! provider in this codebase is wired up.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thai_search_core::TokenizationResult;

use crate::{TokenizeError, TokenizerEngine};

#[derive(Debug, Serialize)]
struct TokenizeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenizeResponse {
    tokens: Vec<String>,
    #[serde(default)]
    confidence: Option<f32>,
}

pub struct RemoteHttpTokenizer {
    client: Client,
    endpoint: String,
    engine_id: String,
}

impl RemoteHttpTokenizer {
    /// `endpoint` should point at a service that accepts `{"text": "..."}`
    /// and replies `{"tokens": [...], "confidence": 0.0..1.0}`.
    pub fn new(engine_id: impl Into<String>, endpoint: impl Into<String>) -> Result<Self, TokenizeError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TokenizeError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint: endpoint.into(), engine_id: engine_id.into() })
    }
}

#[async_trait]
impl TokenizerEngine for RemoteHttpTokenizer {
    async fn tokenize(
        &self,
        text: &str,
        deadline: Duration,
    ) -> Result<TokenizationResult, TokenizeError> {
        let start = std::time::Instant::now();

        let call = self
            .client
            .post(&self.endpoint)
            .json(&TokenizeRequest { text })
            .send();

        let response = tokio::time::timeout(deadline, call)
            .await
            .map_err(|_| TokenizeError::Timeout)?
            .map_err(|e| TokenizeError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TokenizeError::Unavailable(format!("engine returned HTTP {}", response.status())));
        }

        let parsed: TokenizeResponse = tokio::time::timeout(deadline, response.json())
            .await
            .map_err(|_| TokenizeError::Timeout)?
            .map_err(|e| TokenizeError::InvalidResponse(e.to_string()))?;

        let wall_time_ms = start.elapsed().as_millis() as u64;
        if parsed.tokens.is_empty() {
            return Err(TokenizeError::InvalidResponse("engine returned no tokens".to_string()));
        }

        let confidence = parsed
            .confidence
            .unwrap_or_else(|| thai_search_core::tokenization_confidence(text, &parsed.tokens, wall_time_ms));

        Ok(TokenizationResult::success(self.engine_id.clone(), parsed.tokens, wall_time_ms, confidence))
    }

    fn engine_id(&self) -> &str {
        &self.engine_id
    }
}
