//! Main settings module.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{endpoints, timeouts};
use crate::ConfigError;

/// Deployment environment; affects how strictly [`Settings::validate`] is
/// enforced elsewhere in the pipeline. Not a feature-flag system — just an
/// ambient tag that downstream code can read to relax or tighten checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Tokenization engine selection and fallback policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizationConfig {
    #[serde(default = "default_primary_engine")]
    pub primary_engine: String,
    #[serde(default = "default_fallback_engines")]
    pub fallback_engines: Vec<String>,
    #[serde(default = "default_tokenization_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    #[serde(default = "default_true")]
    pub enable_compound_splitting: bool,
    #[serde(default = "default_true")]
    pub preserve_original: bool,
    #[serde(default = "default_true")]
    pub mixed_language_detection: bool,
}

fn default_primary_engine() -> String {
    "newmm".to_string()
}
fn default_fallback_engines() -> Vec<String> {
    vec!["attacut".to_string(), "deepcut".to_string()]
}
fn default_tokenization_timeout_ms() -> u64 {
    5000
}
fn default_confidence_threshold() -> f32 {
    0.7
}
fn default_true() -> bool {
    true
}

impl Default for TokenizationConfig {
    fn default() -> Self {
        Self {
            primary_engine: default_primary_engine(),
            fallback_engines: default_fallback_engines(),
            timeout_ms: default_tokenization_timeout_ms(),
            confidence_threshold: default_confidence_threshold(),
            enable_compound_splitting: true,
            preserve_original: true,
            mixed_language_detection: true,
        }
    }
}

/// Search fan-out configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_true")]
    pub parallel_searches: bool,
    #[serde(default = "default_max_concurrent_searches")]
    pub max_concurrent_searches: usize,
    #[serde(default = "default_search_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_true")]
    pub enable_fallback_search: bool,
    #[serde(default = "default_max_query_variants")]
    pub max_query_variants: usize,
    #[serde(default = "default_true")]
    pub deduplication_enabled: bool,
}

fn default_max_concurrent_searches() -> usize {
    5
}
fn default_search_timeout_ms() -> u64 {
    10_000
}
fn default_retry_attempts() -> u32 {
    2
}
fn default_retry_delay_ms() -> u64 {
    100
}
fn default_max_query_variants() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            parallel_searches: true,
            max_concurrent_searches: default_max_concurrent_searches(),
            timeout_ms: default_search_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            enable_fallback_search: true,
            max_query_variants: default_max_query_variants(),
            deduplication_enabled: true,
        }
    }
}

/// Scoring and ranking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_boost_exact_matches")]
    pub boost_exact_matches: f32,
    #[serde(default = "default_boost_thai_matches")]
    pub boost_thai_matches: f32,
    #[serde(default = "default_boost_compound_matches")]
    pub boost_compound_matches: f32,
    #[serde(default = "default_decay_factor")]
    pub decay_factor: f32,
    #[serde(default = "default_min_score_threshold")]
    pub min_score_threshold: f32,
    #[serde(default = "default_max_results_per_variant")]
    pub max_results_per_variant: usize,
    #[serde(default = "default_true")]
    pub enable_score_normalization: bool,
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
    /// Test-arm algorithm id used when A/B testing is enabled; `None` means
    /// A/B testing has nothing to switch to and `algorithm` always wins.
    #[serde(default)]
    pub ab_test_algorithm: Option<String>,
    #[serde(default)]
    pub ab_traffic_percentage: f32,
}

fn default_algorithm() -> String {
    "weighted_score".to_string()
}
fn default_boost_exact_matches() -> f32 {
    2.0
}
fn default_boost_thai_matches() -> f32 {
    1.5
}
fn default_boost_compound_matches() -> f32 {
    1.3
}
fn default_decay_factor() -> f32 {
    0.1
}
fn default_min_score_threshold() -> f32 {
    0.1
}
fn default_max_results_per_variant() -> usize {
    100
}
fn default_similarity_threshold() -> f32 {
    0.85
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            boost_exact_matches: default_boost_exact_matches(),
            boost_thai_matches: default_boost_thai_matches(),
            boost_compound_matches: default_boost_compound_matches(),
            decay_factor: default_decay_factor(),
            min_score_threshold: default_min_score_threshold(),
            max_results_per_variant: default_max_results_per_variant(),
            enable_score_normalization: true,
            similarity_threshold: default_similarity_threshold(),
            ab_test_algorithm: None,
            ab_traffic_percentage: 0.0,
        }
    }
}

/// Operational limits and ambient monitoring switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    #[serde(default = "default_true")]
    pub enable_metrics: bool,
    #[serde(default)]
    pub enable_detailed_logging: bool,
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    #[serde(default = "default_memory_limit_mb")]
    pub memory_limit_mb: u32,
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
}

fn default_max_query_length() -> usize {
    1000
}
fn default_max_batch_size() -> usize {
    50
}
fn default_memory_limit_mb() -> u32 {
    256
}
fn default_cache_ttl_seconds() -> u64 {
    300
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            enable_metrics: true,
            enable_detailed_logging: false,
            max_query_length: default_max_query_length(),
            max_batch_size: default_max_batch_size(),
            memory_limit_mb: default_memory_limit_mb(),
            cache_enabled: true,
            cache_ttl_seconds: default_cache_ttl_seconds(),
        }
    }
}

/// Main application settings, assembled from defaults, an optional
/// config file, and `SEARCH_PROXY_`-prefixed environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub tokenization: TokenizationConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,

    #[serde(default = "default_meilisearch_url")]
    pub meilisearch_url: String,
    #[serde(default)]
    pub meilisearch_api_key: Option<String>,
    #[serde(default = "default_meilisearch_timeout_ms")]
    pub meilisearch_timeout_ms: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_true")]
    pub enable_structured_logging: bool,
    #[serde(default = "default_true")]
    pub enable_health_checks: bool,
    #[serde(default = "default_health_check_interval_seconds")]
    pub health_check_interval_seconds: u64,

    #[serde(default)]
    pub enable_experimental_features: bool,
    #[serde(default)]
    pub enable_a_b_testing: bool,
}

fn default_service_name() -> String {
    "thai-search-proxy".to_string()
}
fn default_service_version() -> String {
    "1.0.0".to_string()
}
fn default_meilisearch_url() -> String {
    endpoints::MEILISEARCH_DEFAULT.clone()
}
fn default_meilisearch_timeout_ms() -> u64 {
    30_000
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_health_check_interval_seconds() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            service_version: default_service_version(),
            environment: RuntimeEnvironment::default(),
            tokenization: TokenizationConfig::default(),
            search: SearchConfig::default(),
            ranking: RankingConfig::default(),
            performance: PerformanceConfig::default(),
            meilisearch_url: default_meilisearch_url(),
            meilisearch_api_key: None,
            meilisearch_timeout_ms: default_meilisearch_timeout_ms(),
            log_level: default_log_level(),
            enable_structured_logging: true,
            enable_health_checks: true,
            health_check_interval_seconds: default_health_check_interval_seconds(),
            enable_experimental_features: false,
            enable_a_b_testing: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment-optimized presets, mirroring the upstream system's
    /// development/production profiles.
    pub fn development() -> Self {
        let mut s = Self {
            environment: RuntimeEnvironment::Development,
            log_level: "debug".to_string(),
            ..Self::default()
        };
        s.search.max_concurrent_searches = 3;
        s.search.timeout_ms = 10_000;
        s.search.retry_attempts = 1;
        s.performance.enable_detailed_logging = true;
        s.performance.max_batch_size = 10;
        s.performance.cache_ttl_seconds = 60;
        s
    }

    pub fn production() -> Self {
        let mut s = Self {
            environment: RuntimeEnvironment::Production,
            log_level: "info".to_string(),
            ..Self::default()
        };
        s.tokenization.timeout_ms = 3000;
        s.tokenization.confidence_threshold = 0.8;
        s.tokenization.fallback_engines = vec!["attacut".to_string()];
        s.search.max_concurrent_searches = 10;
        s.search.timeout_ms = 5000;
        s
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_tokenization()?;
        self.validate_search()?;
        self.validate_ranking()?;
        Ok(())
    }

    fn validate_tokenization(&self) -> Result<(), ConfigError> {
        let t = &self.tokenization;
        if !(timeouts::TOKENIZATION_MIN_MS..=timeouts::TOKENIZATION_MAX_MS).contains(&t.timeout_ms) {
            return Err(ConfigError::InvalidValue {
                field: "tokenization.timeout_ms".to_string(),
                message: format!(
                    "must be between {} and {}, got {}",
                    timeouts::TOKENIZATION_MIN_MS,
                    timeouts::TOKENIZATION_MAX_MS,
                    t.timeout_ms
                ),
            });
        }
        if !(0.0..=1.0).contains(&t.confidence_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "tokenization.confidence_threshold".to_string(),
                message: format!("must be between 0.0 and 1.0, got {}", t.confidence_threshold),
            });
        }
        Ok(())
    }

    fn validate_search(&self) -> Result<(), ConfigError> {
        let s = &self.search;
        if s.max_concurrent_searches == 0 || s.max_concurrent_searches > 20 {
            return Err(ConfigError::InvalidValue {
                field: "search.max_concurrent_searches".to_string(),
                message: format!("must be between 1 and 20, got {}", s.max_concurrent_searches),
            });
        }
        if !(timeouts::SEARCH_MIN_MS..=timeouts::SEARCH_MAX_MS).contains(&s.timeout_ms) {
            return Err(ConfigError::InvalidValue {
                field: "search.timeout_ms".to_string(),
                message: format!(
                    "must be between {} and {}, got {}",
                    timeouts::SEARCH_MIN_MS,
                    timeouts::SEARCH_MAX_MS,
                    s.timeout_ms
                ),
            });
        }
        if s.max_query_variants == 0 || s.max_query_variants > 10 {
            return Err(ConfigError::InvalidValue {
                field: "search.max_query_variants".to_string(),
                message: format!("must be between 1 and 10, got {}", s.max_query_variants),
            });
        }
        Ok(())
    }

    fn validate_ranking(&self) -> Result<(), ConfigError> {
        let r = &self.ranking;
        const VALID_ALGORITHMS: &[&str] = &[
            "weighted_score",
            "optimized_score",
            "simple",
            "experimental",
        ];
        if !VALID_ALGORITHMS.contains(&r.algorithm.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "ranking.algorithm".to_string(),
                message: format!(
                    "unknown algorithm '{}', expected one of {:?}",
                    r.algorithm, VALID_ALGORITHMS
                ),
            });
        }
        if !(0.0..=1.0).contains(&r.min_score_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "ranking.min_score_threshold".to_string(),
                message: format!("must be between 0.0 and 1.0, got {}", r.min_score_threshold),
            });
        }
        if !(0.0..=1.0).contains(&r.ab_traffic_percentage) {
            return Err(ConfigError::InvalidValue {
                field: "ranking.ab_traffic_percentage".to_string(),
                message: format!("must be between 0.0 and 1.0, got {}", r.ab_traffic_percentage),
            });
        }
        Ok(())
    }
}

/// Load settings from `config/default.{yaml,toml,json}`, an optional
/// `config/{env}.*` overlay, and `SEARCH_PROXY_`-prefixed environment
/// variables (double underscore as the nesting separator, e.g.
/// `SEARCH_PROXY_SEARCH__TIMEOUT_MS=8000`).
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder().add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("SEARCH_PROXY")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.service_name, "thai-search-proxy");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn out_of_range_timeout_is_rejected() {
        let mut settings = Settings::default();
        settings.search.timeout_ms = 10;
        assert!(settings.validate().is_err());

        settings.search.timeout_ms = 5000;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let mut settings = Settings::default();
        settings.ranking.algorithm = "nonexistent".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn production_preset_tightens_concurrency() {
        let settings = Settings::production();
        assert_eq!(settings.search.max_concurrent_searches, 10);
        assert!(settings.validate().is_ok());
    }
}
