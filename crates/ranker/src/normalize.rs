//! Normalization & filtering: normalise first, then filter — fixing this
//! order removes an ambiguity that would otherwise let the threshold see
//! pre-normalization scores.

use thai_search_core::SearchHit;

/// Divides every score by the max score (if enabled and any hit scores
/// above zero), drops hits below `min_score_threshold`, then stable-sorts
/// descending by score. Returns the number of hits dropped by the
/// threshold.
pub fn normalize_and_filter(mut hits: Vec<SearchHit>, enable_normalization: bool, min_score_threshold: f32) -> (Vec<SearchHit>, usize) {
    if enable_normalization {
        if let Some(max_score) = hits.iter().map(|h| h.score).fold(None, |acc, s| match acc {
            None => Some(s),
            Some(m) if s > m => Some(s),
            Some(m) => Some(m),
        }) {
            if max_score > 0.0 {
                for hit in hits.iter_mut() {
                    hit.score /= max_score;
                    hit.ranking_info_insert("normalization_divisor", max_score as f64);
                }
            }
        }
    }

    let before = hits.len();
    hits.retain(|h| h.score >= min_score_threshold);
    let below_threshold = before - hits.len();

    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    (hits, below_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn hit(score: f32) -> SearchHit {
        SearchHit { document_id: "d".to_string(), score, document: Map::new(), highlight: None, ranking_info: Map::new() }
    }

    #[test]
    fn normalization_divides_by_max_and_records_divisor() {
        let (hits, dropped) = normalize_and_filter(vec![hit(0.4), hit(0.8)], true, 0.0);
        assert_eq!(dropped, 0);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
        assert!((hits[1].score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn below_threshold_hits_are_dropped_after_normalization() {
        let (hits, dropped) = normalize_and_filter(vec![hit(0.05), hit(0.9)], false, 0.1);
        assert_eq!(dropped, 1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn output_is_sorted_descending() {
        let (hits, _) = normalize_and_filter(vec![hit(0.3), hit(0.9), hit(0.1)], false, 0.0);
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
