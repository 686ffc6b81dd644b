//! Query-variant generation and weighting.

use std::collections::HashSet;

use thai_search_core::{PrimaryLanguage, QueryVariant, TokenizationResult, VariantKind};

use crate::language::{LanguageAnalysis, STRONG_THAI_RATIO};

const MIN_SURVIVING_WEIGHT: f32 = 0.2;
const EMERGENCY_WEIGHT: f32 = 0.5;
/// Fixed weight for the character-level last-resort variant. This is a
/// flat constant, not run through `compute_weight`'s multiplier chain —
/// matching the word-split/mixed-language fallback a few lines down, which
/// also bypasses the confidence multiplier by passing `None`.
const CHARACTER_FALLBACK_WEIGHT: f32 = 0.4;

fn kind_for_result(engine_id: &str, mixed_content: bool) -> VariantKind {
    if engine_id == "fallback" {
        VariantKind::Fallback
    } else if engine_id.contains("compound") {
        VariantKind::CompoundSplit
    } else if mixed_content {
        VariantKind::MixedLanguage
    } else {
        VariantKind::Tokenized
    }
}

fn matching_strategy_for(kind: VariantKind) -> &'static str {
    match kind {
        VariantKind::Original => "all",
        VariantKind::Fallback => "frequency",
        _ => "last",
    }
}

/// The four multipliers applied on top of the kind base weight.
/// `origin_confidence` is `None` for variants with no originating
/// [`TokenizationResult`] (the Original variant).
fn compute_weight(
    kind: VariantKind,
    text_char_len: usize,
    language: &LanguageAnalysis,
    origin_confidence: Option<f32>,
) -> f32 {
    let mut weight = kind.base_weight();

    weight *= match language.primary_language {
        PrimaryLanguage::Thai => match kind {
            VariantKind::Tokenized | VariantKind::CompoundSplit => 1.2,
            VariantKind::Original => 0.9,
            _ => 1.0,
        },
        PrimaryLanguage::English => match kind {
            VariantKind::Tokenized | VariantKind::CompoundSplit => 0.9,
            VariantKind::Original => 1.2,
            _ => 1.0,
        },
        PrimaryLanguage::Mixed => {
            if kind == VariantKind::MixedLanguage {
                1.15
            } else {
                1.0
            }
        }
        PrimaryLanguage::Unknown => 1.0,
    };

    if text_char_len < 5 {
        weight *= match kind {
            VariantKind::Original => 1.1,
            VariantKind::Fallback => 0.8,
            _ => 1.0,
        };
    } else if text_char_len >= 50 && kind == VariantKind::Tokenized {
        weight *= 1.1;
    }

    if language.thai_ratio > STRONG_THAI_RATIO && kind == VariantKind::Tokenized {
        weight *= 1.1;
    }

    if let Some(confidence) = origin_confidence {
        weight *= if confidence >= 0.9 {
            1.1
        } else if confidence >= 0.7 {
            1.0
        } else if confidence >= 0.5 {
            0.9
        } else {
            0.8
        };
    }

    weight
}

struct Builder {
    variants: Vec<QueryVariant>,
    seen: HashSet<String>,
}

impl Builder {
    fn new() -> Self {
        Self { variants: Vec::new(), seen: HashSet::new() }
    }

    fn push(&mut self, variant: QueryVariant) {
        let key = variant.dedup_key();
        if self.seen.insert(key) {
            self.variants.push(variant);
        }
    }
}

/// Build the final, weighted, capped variant list from a set of
/// (possibly absent) tokenization attempts.
#[allow(clippy::too_many_arguments)]
pub fn generate(
    original_text: &str,
    tokenization_results: &[TokenizationResult],
    language: &LanguageAnalysis,
    preserve_original: bool,
    compound_splitting_enabled: bool,
    max_variants: usize,
    all_engines_failed: bool,
) -> Vec<QueryVariant> {
    let mut builder = Builder::new();
    let trimmed = original_text.trim();

    if preserve_original {
        let weight = compute_weight(VariantKind::Original, trimmed.chars().count(), language, None);
        let variant = QueryVariant::new(trimmed, VariantKind::Original, "none", weight)
            .with_option("matching_strategy", "all");
        builder.push(variant);
    }

    for result in tokenization_results.iter().filter(|r| r.success) {
        let kind = kind_for_result(&result.engine_id, language.mixed_content);
        let joined = result.tokens.join(" ");
        let base_weight = if kind == VariantKind::Fallback {
            CHARACTER_FALLBACK_WEIGHT
        } else {
            compute_weight(kind, joined.chars().count(), language, Some(result.confidence))
        };

        builder.push(
            QueryVariant::new(joined.clone(), kind, result.engine_id.clone(), base_weight)
                .with_option("matching_strategy", matching_strategy_for(kind)),
        );

        if result.tokens.len() >= 2 && compound_splitting_enabled {
            let compound_text: String = result.tokens.concat();
            let compound_weight = base_weight * 0.9;
            builder.push(
                QueryVariant::new(compound_text, VariantKind::CompoundSplit, result.engine_id.clone(), compound_weight)
                    .with_option("matching_strategy", "last")
                    .with_option("compound_extra", true),
            );
        }

        if result.tokens.len() >= 3 {
            let phrase_text = format!("\"{joined}\"");
            let phrase_weight = base_weight * 0.85;
            builder.push(
                QueryVariant::new(phrase_text, kind, result.engine_id.clone(), phrase_weight)
                    .with_option("matching_strategy", "all")
                    .with_option("phrase", true),
            );
        }
    }

    if all_engines_failed && language.mixed_content {
        let whitespace_joined: String = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
        if !whitespace_joined.is_empty() {
            let weight = compute_weight(VariantKind::Fallback, whitespace_joined.chars().count(), language, None);
            builder.push(
                QueryVariant::new(whitespace_joined, VariantKind::Fallback, "whitespace", weight)
                    .with_option("matching_strategy", "frequency"),
            );
        }
    }

    let mut variants = builder.variants;
    variants.retain(|v| v.weight >= MIN_SURVIVING_WEIGHT);
    variants.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
    variants.truncate(max_variants);

    if variants.is_empty() {
        variants.push(
            QueryVariant::new(trimmed, VariantKind::Original, "none", EMERGENCY_WEIGHT)
                .with_option("matching_strategy", "all"),
        );
    }

    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language;

    #[test]
    fn pure_english_yields_single_original_variant() {
        let language = language::analyze("search documents database");
        let variants = generate("search documents database", &[], &language, true, true, 5, false);
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].kind, VariantKind::Original);
        assert_eq!(variants[0].backend_options.get("matching_strategy").unwrap(), "all");
    }

    #[test]
    fn successful_tokenization_adds_tokenized_variant() {
        let language = language::analyze("ค้นหาเอกสารภาษาไทย");
        let result = TokenizationResult::success(
            "newmm",
            vec!["ค้นหา".to_string(), "เอกสาร".to_string(), "ภาษา".to_string(), "ไทย".to_string()],
            5,
            0.9,
        );
        let variants = generate("ค้นหาเอกสารภาษาไทย", std::slice::from_ref(&result), &language, true, true, 5, false);
        assert!(variants.iter().any(|v| v.kind == VariantKind::Tokenized));
        assert!(variants.len() >= 2);
    }

    #[test]
    fn empty_variant_list_gets_emergency_original() {
        let language = language::analyze("x");
        let variants = generate("x", &[], &language, false, false, 5, false);
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].weight, EMERGENCY_WEIGHT);
    }

    #[test]
    fn character_level_fallback_gets_fixed_weight_not_multiplier_chain() {
        let language = language::analyze("ค้นหาเอกสาร");
        let result = TokenizationResult::success(
            "fallback",
            vec!["ค้น".to_string(), "หา".to_string(), "เอกสาร".to_string()],
            0,
            0.3,
        );
        let variants = generate("ค้นหาเอกสาร", std::slice::from_ref(&result), &language, true, false, 5, true);
        let fallback = variants.iter().find(|v| v.kind == VariantKind::Fallback).unwrap();
        assert!((0.35..=0.45).contains(&fallback.weight), "weight was {}", fallback.weight);
    }

    #[test]
    fn variant_list_is_capped_at_max_variants() {
        let language = language::analyze("ค้นหาเอกสารภาษาไทยในระบบข้อมูล");
        let results: Vec<TokenizationResult> = (0..4)
            .map(|i| {
                TokenizationResult::success(
                    format!("engine{i}"),
                    vec!["ค้นหา".to_string(), "เอกสาร".to_string(), "ภาษา".to_string()],
                    5,
                    0.85,
                )
            })
            .collect();
        let variants = generate("ค้นหาเอกสารภาษาไทยในระบบข้อมูล", &results, &language, true, true, 3, false);
        assert!(variants.len() <= 3);
    }
}
