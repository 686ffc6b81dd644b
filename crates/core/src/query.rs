//! Query-side entities: the output of the Query Processor.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one tokenization engine invocation on the original text.
///
/// Invariant: `success` implies `tokens` is non-empty; `!success` implies
/// `failure_reason` is `Some`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizationResult {
    pub engine_id: String,
    pub tokens: Vec<String>,
    pub wall_time_ms: u64,
    pub confidence: f32,
    pub success: bool,
    pub failure_reason: Option<String>,
}

impl TokenizationResult {
    pub fn success(engine_id: impl Into<String>, tokens: Vec<String>, wall_time_ms: u64, confidence: f32) -> Self {
        debug_assert!(!tokens.is_empty(), "a successful tokenization must carry tokens");
        Self {
            engine_id: engine_id.into(),
            tokens,
            wall_time_ms,
            confidence,
            success: true,
            failure_reason: None,
        }
    }

    pub fn failure(engine_id: impl Into<String>, wall_time_ms: u64, reason: impl Into<String>) -> Self {
        Self {
            engine_id: engine_id.into(),
            tokens: Vec::new(),
            wall_time_ms,
            confidence: 0.0,
            success: false,
            failure_reason: Some(reason.into()),
        }
    }

    /// Whether this result clears the "high confidence" bar.
    pub fn is_high_confidence(&self) -> bool {
        self.confidence >= 0.8
    }
}

/// Provenance tag for a [`QueryVariant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Original,
    Tokenized,
    CompoundSplit,
    Fallback,
    MixedLanguage,
}

impl VariantKind {
    /// Base weight before content/length/confidence multipliers.
    pub fn base_weight(self) -> f32 {
        match self {
            VariantKind::Original => 0.8,
            VariantKind::Tokenized => 1.0,
            VariantKind::CompoundSplit => 0.9,
            VariantKind::MixedLanguage => 0.85,
            VariantKind::Fallback => 0.6,
        }
    }

    /// Tie-break priority used when candidates are otherwise equal — lower
    /// sorts first.
    pub fn tie_break_priority(self) -> u8 {
        match self {
            VariantKind::Tokenized => 0,
            VariantKind::Original => 1,
            VariantKind::CompoundSplit => 2,
            VariantKind::MixedLanguage => 2,
            VariantKind::Fallback => 3,
        }
    }
}

/// A single search string the executor will issue, with its backend option
/// overrides and the weight the ranker should give its hits.
///
/// Invariant: `text` is non-empty after trimming and is not whitespace-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryVariant {
    pub text: String,
    pub kind: VariantKind,
    pub engine_id: String,
    pub weight: f32,
    #[serde(default)]
    pub backend_options: HashMap<String, Value>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl QueryVariant {
    pub fn new(text: impl Into<String>, kind: VariantKind, engine_id: impl Into<String>, weight: f32) -> Self {
        Self {
            text: text.into(),
            kind,
            engine_id: engine_id.into(),
            weight: weight.clamp(0.1, 1.0),
            backend_options: HashMap::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.backend_options.insert(key.into(), value.into());
        self
    }

    /// Case-folded, trimmed form used for variant de-duplication.
    pub fn dedup_key(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

/// The primary detected language of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryLanguage {
    Thai,
    English,
    Mixed,
    Unknown,
}

/// Aggregate output of the Query Processor for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedQuery {
    pub original_text: String,
    pub tokenization_results: Vec<TokenizationResult>,
    pub variants: Vec<QueryVariant>,
    pub total_processing_time_ms: u64,
    pub thai_detected: bool,
    pub mixed_content: bool,
    pub fallback_used: bool,
    pub primary_language: PrimaryLanguage,
}

impl ProcessedQuery {
    /// Joined tokenized text, if any tokenization succeeded — used by the
    /// ranker to build [`crate::search::QueryContext::processed_text`].
    pub fn first_tokenized_text(&self) -> Option<&str> {
        self.variants
            .iter()
            .find(|v| v.kind == VariantKind::Tokenized)
            .map(|v| v.text.as_str())
    }

    pub fn average_tokenization_confidence(&self) -> f32 {
        let successes: Vec<f32> = self
            .tokenization_results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.confidence)
            .collect();
        if successes.is_empty() {
            0.0
        } else {
            successes.iter().sum::<f32>() / successes.len() as f32
        }
    }
}
