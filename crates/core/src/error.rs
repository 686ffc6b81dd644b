//! Top-level error type surfaced by the Orchestrator.
//!
//! Component crates define their own `thiserror` enums (`TokenizeError`,
//! `QueryError`, `ExecutorError`, `RankerError`) and convert into this one
//! at the Orchestrator boundary, mirroring how a top-level aggregate error
//! type composes per-component error enums.

use serde_json::Value;
use thiserror::Error;

use crate::search::SearchResult;

/// Machine-readable error kinds surfaced to API consumers.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("tokenization error: {message}")]
    Tokenization { message: String, fallback_used: bool },

    #[error("search execution error: {message}")]
    SearchExecution {
        message: String,
        partial: Option<Vec<SearchResult>>,
    },

    #[error("backend unavailable: {message}")]
    BackendUnavailable { message: String },

    #[error("ranking error: {message}")]
    Ranking { message: String },

    #[error("timeout: {message}")]
    Timeout { message: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Stable machine code for the error kind, for API consumers and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "validation_error",
            Error::Tokenization { .. } => "tokenization_error",
            Error::SearchExecution { .. } => "search_execution_error",
            Error::BackendUnavailable { .. } => "backend_unavailable",
            Error::Ranking { .. } => "ranking_error",
            Error::Timeout { .. } => "timeout",
            Error::Configuration { .. } => "configuration_error",
        }
    }

    /// Whether the request should still be served as a degraded response
    /// rather than rejected outright.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Validation { .. } | Error::Configuration { .. })
    }

    /// Structured details bag for out-of-band diagnostics.
    pub fn details(&self) -> Value {
        match self {
            Error::Validation { message } => serde_json::json!({ "message": message }),
            Error::Tokenization { message, fallback_used } => {
                serde_json::json!({ "message": message, "fallback_used": fallback_used })
            }
            Error::SearchExecution { message, partial } => serde_json::json!({
                "message": message,
                "partial_result_count": partial.as_ref().map(|p| p.len()).unwrap_or(0),
            }),
            Error::BackendUnavailable { message } => serde_json::json!({ "message": message }),
            Error::Ranking { message } => serde_json::json!({ "message": message }),
            Error::Timeout { message } => serde_json::json!({ "message": message }),
            Error::Configuration { message } => serde_json::json!({ "message": message }),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
