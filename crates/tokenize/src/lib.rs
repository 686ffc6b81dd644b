//! Tokenization engine capability and two concrete implementations:
//! a dictionary-based engine and a client for a remote segmentation
//! microservice.

pub mod dictionary;
pub mod engine;
pub mod remote;

use std::time::Duration;

use async_trait::async_trait;
use thai_search_core::TokenizationResult;
use thiserror::Error;

pub use dictionary::DictionaryTokenizer;
pub use remote::RemoteHttpTokenizer;

#[derive(Error, Debug, Clone)]
pub enum TokenizeError {
    #[error("tokenization timed out")]
    Timeout,

    #[error("tokenizer engine unavailable: {0}")]
    Unavailable(String),

    #[error("invalid tokenizer response: {0}")]
    InvalidResponse(String),
}

/// A pluggable tokenization engine. Implementations race their own work
/// against `deadline` and return a [`TokenizeError`] rather than panicking
/// or blocking past it — the query processor relies on every call
/// returning within the caller-supplied budget.
#[async_trait]
pub trait TokenizerEngine: Send + Sync {
    async fn tokenize(
        &self,
        text: &str,
        deadline: Duration,
    ) -> Result<TokenizationResult, TokenizeError>;

    fn engine_id(&self) -> &str;
}
