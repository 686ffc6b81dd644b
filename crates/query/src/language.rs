//! Language analysis.

use thai_search_core::{is_latin_letter, is_thai_char, PrimaryLanguage};

#[derive(Debug, Clone, Copy)]
pub struct LanguageAnalysis {
    pub thai_ratio: f32,
    pub english_ratio: f32,
    pub thai_detected: bool,
    pub english_detected: bool,
    pub mixed_content: bool,
    pub primary_language: PrimaryLanguage,
}

const DETECTION_THRESHOLD: f32 = 0.1;
/// Thai-ratio above which a query counts as "strongly" Thai for the
/// variant-weighting and ranking boosts.
pub const STRONG_THAI_RATIO: f32 = 0.5;

pub fn analyze(text: &str) -> LanguageAnalysis {
    let non_whitespace_len = text.chars().filter(|c| !c.is_whitespace()).count();

    if non_whitespace_len == 0 {
        return LanguageAnalysis {
            thai_ratio: 0.0,
            english_ratio: 0.0,
            thai_detected: false,
            english_detected: false,
            mixed_content: false,
            primary_language: PrimaryLanguage::Unknown,
        };
    }

    let thai_count = text.chars().filter(|c| is_thai_char(*c)).count();
    let latin_count = text.chars().filter(|c| is_latin_letter(*c)).count();

    let thai_ratio = thai_count as f32 / non_whitespace_len as f32;
    let english_ratio = latin_count as f32 / non_whitespace_len as f32;

    let thai_detected = thai_ratio > DETECTION_THRESHOLD;
    let english_detected = english_ratio > DETECTION_THRESHOLD;
    let mixed_content = thai_detected && english_detected;

    let primary_language = if thai_ratio == 0.0 && english_ratio == 0.0 {
        PrimaryLanguage::Unknown
    } else if (thai_ratio - english_ratio).abs() < f32::EPSILON {
        PrimaryLanguage::Mixed
    } else if thai_ratio > english_ratio {
        PrimaryLanguage::Thai
    } else {
        PrimaryLanguage::English
    };

    LanguageAnalysis {
        thai_ratio,
        english_ratio,
        thai_detected,
        english_detected,
        mixed_content,
        primary_language,
    }
}
