//! Backend parameter assembly and per-variant option translation.

use thai_search_core::{SearchOptions, VariantKind};

use crate::filter;

/// Wire-level backend parameters, named after the corresponding
/// Meilisearch-compatible request fields.
#[derive(Debug, Clone)]
pub struct BackendParams {
    pub limit: u32,
    pub offset: u32,
    pub filter: Option<String>,
    pub sort: Option<Vec<String>>,
    pub matching_strategy: String,
    pub show_ranking_score: bool,
    pub show_matches_position: bool,
    pub attributes_to_retrieve: Option<Vec<String>>,
    pub attributes_to_highlight: Option<Vec<String>>,
    pub crop_length: u32,
    pub crop_marker: String,
}

const MAX_CROP_LENGTH: u32 = 400;
const MAX_FALLBACK_LIMIT: u32 = 100;

/// Builds the request-wide base parameters shared by every variant.
pub fn base_params(options: &SearchOptions) -> BackendParams {
    BackendParams {
        limit: options.limit,
        offset: options.offset,
        filter: options.filters.as_ref().and_then(filter::serialize),
        sort: options.sort.clone(),
        matching_strategy: options.matching_strategy.clone(),
        show_ranking_score: true,
        show_matches_position: false,
        attributes_to_retrieve: options.attributes_to_retrieve.clone(),
        attributes_to_highlight: if options.highlight { options.attributes_to_highlight.clone() } else { None },
        crop_length: options.crop_length,
        crop_marker: options.crop_marker.clone(),
    }
}

/// Applies the variant-kind-specific overrides on top of the shared base
/// parameters. Takes `base` by value since every variant needs its own copy.
pub fn apply_variant_overrides(mut params: BackendParams, kind: VariantKind) -> BackendParams {
    match kind {
        VariantKind::Original => {
            params.matching_strategy = "all".to_string();
        }
        VariantKind::Tokenized | VariantKind::MixedLanguage => {
            params.matching_strategy = "last".to_string();
            if kind == VariantKind::MixedLanguage {
                params.attributes_to_highlight = Some(vec!["*".to_string()]);
            }
        }
        VariantKind::CompoundSplit => {
            params.matching_strategy = "last".to_string();
            params.crop_length = (params.crop_length * 2).min(MAX_CROP_LENGTH);
        }
        VariantKind::Fallback => {
            params.matching_strategy = "frequency".to_string();
            params.limit = (params.limit * 2).min(MAX_FALLBACK_LIMIT);
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_split_doubles_and_caps_crop_length() {
        let mut params = base_params(&SearchOptions::default());
        params.crop_length = 300;
        let params = apply_variant_overrides(params, VariantKind::CompoundSplit);
        assert_eq!(params.crop_length, MAX_CROP_LENGTH);
    }

    #[test]
    fn fallback_doubles_and_caps_limit() {
        let mut params = base_params(&SearchOptions::default());
        params.limit = 80;
        let params = apply_variant_overrides(params, VariantKind::Fallback);
        assert_eq!(params.limit, MAX_FALLBACK_LIMIT);
        assert_eq!(params.matching_strategy, "frequency");
    }

    #[test]
    fn original_always_matches_all() {
        let params = base_params(&SearchOptions::default());
        let params = apply_variant_overrides(params, VariantKind::Original);
        assert_eq!(params.matching_strategy, "all");
    }
}
