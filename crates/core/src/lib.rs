//! Shared data model and error types for the Thai search proxy.
//!
//! Every stage of the pipeline (Query Processor -> Search Executor ->
//! Result Ranker -> Orchestrator) depends on this crate and nothing else in
//! the workspace, so that each stage crate can be tested in isolation.

pub mod confidence;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod query;
pub mod search;

pub use confidence::tokenization_confidence;
pub use envelope::{
    BatchSearchRequest, PaginationInfo, QueryInfo, SearchOptions, SearchRequest, SearchResponse,
    TokenizationInfo,
};
pub use error::{Error, Result};
pub use filter::{FilterOp, FilterValue, StructuredFilter};
pub use query::{PrimaryLanguage, ProcessedQuery, QueryVariant, TokenizationResult, VariantKind};
pub use search::{QueryContext, RankedResults, SearchHit, SearchResult};

/// Code points U+0E00-U+0E7F — the Unicode Thai block.
pub fn is_thai_char(c: char) -> bool {
    ('\u{0E00}'..='\u{0E7F}').contains(&c)
}

/// Whether a character counts toward a Latin-letter run for the English
/// ratio: ASCII letters only, matching the original
/// system's plain `str.isalpha()` check restricted to the Latin script.
pub fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::PaginationInfo;
    use crate::query::{QueryVariant, VariantKind};

    #[test]
    fn thai_char_range_matches_unicode_block() {
        assert!(is_thai_char('ก'));
        assert!(is_thai_char('ไ'));
        assert!(!is_thai_char('a'));
        assert!(!is_thai_char(' '));
    }

    #[test]
    fn latin_letter_is_ascii_only() {
        assert!(is_latin_letter('a'));
        assert!(is_latin_letter('Z'));
        assert!(!is_latin_letter('ก'));
        assert!(!is_latin_letter('5'));
    }

    #[test]
    fn variant_dedup_key_is_case_folded_and_trimmed() {
        let v = QueryVariant::new("  Hello World  ", VariantKind::Original, "none", 0.8);
        assert_eq!(v.dedup_key(), "hello world");
    }

    #[test]
    fn variant_weight_is_clamped() {
        let v = QueryVariant::new("x", VariantKind::Tokenized, "newmm", 5.0);
        assert_eq!(v.weight, 1.0);
        let v = QueryVariant::new("x", VariantKind::Tokenized, "newmm", -5.0);
        assert_eq!(v.weight, 0.1);
    }

    #[test]
    fn pagination_flags_reflect_position() {
        let p = PaginationInfo::new(0, 20, 50);
        assert!(p.has_next_page);
        assert!(!p.has_previous_page);

        let p = PaginationInfo::new(40, 20, 50);
        assert!(!p.has_next_page);
        assert!(p.has_previous_page);
    }

    #[test]
    fn error_code_is_stable() {
        let e = Error::Validation { message: "bad".into() };
        assert_eq!(e.code(), "validation_error");
        assert!(!e.is_recoverable());

        let e = Error::Tokenization { message: "x".into(), fallback_used: true };
        assert_eq!(e.code(), "tokenization_error");
        assert!(e.is_recoverable());
    }
}
