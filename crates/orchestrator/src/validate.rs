//! Request-shape validation: the only orchestrator failure mode
//! that is allowed to surface as an `Err` rather than a degraded response.

use once_cell::sync::Lazy;
use regex::Regex;
use thai_search_config::PerformanceConfig;
use thai_search_core::Error;

static INDEX_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("index name pattern is a valid regex"));

pub fn validate_index_name(index_name: &str) -> Result<(), Error> {
    if !INDEX_NAME_PATTERN.is_match(index_name) {
        return Err(Error::Validation { message: format!("invalid index name: {index_name}") });
    }
    Ok(())
}

pub fn validate_query(query: &str, performance: &PerformanceConfig) -> Result<(), Error> {
    if query.trim().is_empty() {
        return Err(Error::Validation { message: "query must not be blank".to_string() });
    }
    if query.chars().count() > performance.max_query_length {
        return Err(Error::Validation {
            message: format!("query exceeds max_query_length of {}", performance.max_query_length),
        });
    }
    Ok(())
}

pub fn validate_batch_size(queries: &[String], performance: &PerformanceConfig) -> Result<(), Error> {
    if queries.is_empty() {
        return Err(Error::Validation { message: "batch must contain at least one query".to_string() });
    }
    if queries.len() > performance.max_batch_size {
        return Err(Error::Validation {
            message: format!("batch exceeds max_batch_size of {}", performance.max_batch_size),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_is_rejected() {
        assert!(validate_query("   ", &PerformanceConfig::default()).is_err());
    }

    #[test]
    fn overlong_query_is_rejected() {
        let performance = PerformanceConfig { max_query_length: 5, ..PerformanceConfig::default() };
        assert!(validate_query("too long for the limit", &performance).is_err());
    }

    #[test]
    fn index_name_rejects_path_like_input() {
        assert!(validate_index_name("../etc").is_err());
        assert!(validate_index_name("valid_index-1").is_ok());
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(validate_batch_size(&[], &PerformanceConfig::default()).is_err());
    }

    #[test]
    fn oversized_batch_is_rejected() {
        let performance = PerformanceConfig { max_batch_size: 2, ..PerformanceConfig::default() };
        let queries = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert!(validate_batch_size(&queries, &performance).is_err());
    }
}
