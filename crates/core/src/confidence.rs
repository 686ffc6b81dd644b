//! Tokenization confidence scoring.
//!
//! Shared between every [`crate::query::TokenizationResult`] producer so
//! confidences from different engines stay comparable as coarse quality
//! hints — they are not a true probability.

use crate::is_thai_char;

/// Factor A — density plausibility: ratio of token count to non-whitespace
/// character count, scored 1.0 inside [0.1, 0.5] and linearly degraded
/// outside it.
fn density_factor(token_count: usize, non_whitespace_len: usize) -> Option<f32> {
    if non_whitespace_len == 0 {
        return None;
    }
    let rho = token_count as f32 / non_whitespace_len as f32;
    Some(if (0.1..=0.5).contains(&rho) {
        1.0
    } else if rho < 0.1 {
        (rho / 0.1).clamp(0.0, 1.0)
    } else {
        (0.5 / rho).clamp(0.0, 1.0)
    })
}

/// Factor B — latency: faster engines score higher, floored at 0.1.
fn latency_factor(wall_time_ms: u64) -> f32 {
    (1.0 - wall_time_ms as f32 / 1000.0).max(0.1)
}

/// Factor C — mean length of Thai-only tokens, 1.0 inside [2, 6] chars and
/// degraded outside; `None` if no token is Thai-only.
fn shape_factor(tokens: &[String]) -> Option<f32> {
    let thai_lengths: Vec<usize> = tokens
        .iter()
        .filter(|t| !t.is_empty() && t.chars().all(is_thai_char))
        .map(|t| t.chars().count())
        .collect();
    if thai_lengths.is_empty() {
        return None;
    }
    let mean = thai_lengths.iter().sum::<usize>() as f32 / thai_lengths.len() as f32;
    Some(if (2.0..=6.0).contains(&mean) {
        1.0
    } else if mean < 2.0 {
        (mean / 2.0).clamp(0.0, 1.0)
    } else {
        (6.0 / mean).clamp(0.0, 1.0)
    })
}

/// Arithmetic mean of whichever factors are computable; 0.5 if none are.
pub fn tokenization_confidence(original_text: &str, tokens: &[String], wall_time_ms: u64) -> f32 {
    let non_whitespace_len = original_text.chars().filter(|c| !c.is_whitespace()).count();

    let factors: Vec<f32> = [
        density_factor(tokens.len(), non_whitespace_len),
        Some(latency_factor(wall_time_ms)),
        shape_factor(tokens),
    ]
    .into_iter()
    .flatten()
    .collect();

    if factors.is_empty() {
        0.5
    } else {
        factors.iter().sum::<f32>() / factors.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_shaped_thai_tokens_score_high() {
        let tokens = vec!["ค้นหา".to_string(), "เอกสาร".to_string(), "ไทย".to_string()];
        let confidence = tokenization_confidence("ค้นหาเอกสารไทย", &tokens, 10);
        assert!(confidence > 0.7, "expected high confidence, got {confidence}");
    }

    #[test]
    fn empty_input_is_scored_by_latency_alone() {
        // No density or shape factor is computable; only latency survives.
        let confidence = tokenization_confidence("", &[], 5);
        assert!((confidence - 0.995).abs() < 1e-3);
    }
}
