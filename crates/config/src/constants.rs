//! Centralized constants for the search proxy.
//!
//! This module holds only generic, domain-agnostic values: backend
//! endpoints and operational timeouts. Tuning knobs that a deployer might
//! reasonably want to change belong in [`crate::settings`] instead, where
//! they are part of the layered config rather than baked into the binary.

/// Backend service endpoints (env-overridable with sane local defaults).
pub mod endpoints {
    use once_cell::sync::Lazy;

    /// Meilisearch-compatible backend URL (env: `MEILISEARCH_URL`).
    pub static MEILISEARCH_DEFAULT: Lazy<String> = Lazy::new(|| {
        std::env::var("MEILISEARCH_URL").unwrap_or_else(|_| "http://localhost:7700".to_string())
    });
}

/// Timeouts, in milliseconds unless noted otherwise.
pub mod timeouts {
    /// Floor enforced on `tokenization.timeout_ms`.
    pub const TOKENIZATION_MIN_MS: u64 = 100;
    /// Ceiling enforced on `tokenization.timeout_ms`.
    pub const TOKENIZATION_MAX_MS: u64 = 30_000;
    /// Floor enforced on `search.timeout_ms`.
    pub const SEARCH_MIN_MS: u64 = 1_000;
    /// Ceiling enforced on `search.timeout_ms`.
    pub const SEARCH_MAX_MS: u64 = 60_000;
}
