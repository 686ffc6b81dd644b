//! Merging with content similarity: first collapse exact
//! `document_id` duplicates, then cluster the survivors by how similar their
//! title+content text is.

use std::collections::HashMap;

use similar::TextDiff;

use crate::candidate::Candidate;
use crate::tie_break;

/// How much of `content` feeds the similarity comparison: the first 500
/// characters of lower-cased content.
const CONTENT_SIMILARITY_CHARS: usize = 500;

fn similarity_text(candidate: &Candidate) -> String {
    let content: String = candidate.hit.content_lower().chars().take(CONTENT_SIMILARITY_CHARS).collect();
    format!("{}{}", candidate.hit.title_lower(), content)
}

/// Ratcliff/Obershelp-style similarity ratio in [0, 1], used as a
/// longest-common-subsequence-ratio metric for near-duplicate detection.
fn similarity_ratio(a: &str, b: &str) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    TextDiff::from_chars(a, b).ratio()
}

/// Result of the merge pass: the surviving representative candidates, and
/// how many were eliminated (id-based + similarity-based combined).
pub struct MergeOutcome {
    pub representatives: Vec<Candidate>,
    pub duplicates_removed: usize,
}

/// Collapses exact-`document_id` groups, then similarity-clusters the
/// survivors, always picking the tie-break winner as each group/cluster's
/// representative.
pub fn merge(candidates: Vec<Candidate>, similarity_threshold: f32) -> MergeOutcome {
    if candidates.is_empty() {
        return MergeOutcome { representatives: Vec::new(), duplicates_removed: 0 };
    }

    let mut by_id: HashMap<String, Vec<Candidate>> = HashMap::new();
    for candidate in candidates {
        by_id.entry(candidate.hit.document_id.clone()).or_default().push(candidate);
    }

    let mut id_duplicates = 0usize;
    let mut representatives: Vec<Candidate> = Vec::with_capacity(by_id.len());
    for (_, mut group) in by_id {
        id_duplicates += group.len() - 1;
        let winner = tie_break::best_index(&group);
        let mut representative = group.swap_remove(winner);
        if !group.is_empty() {
            representative.hit.ranking_info_insert("collapsed_id_duplicates", group.len() as u64);
        }
        representatives.push(representative);
    }

    // Similarity clustering: greedily assign each representative to the
    // first existing cluster it is close enough to, else start a new one.
    let mut clusters: Vec<Vec<Candidate>> = Vec::new();
    'outer: for candidate in representatives {
        let candidate_text = similarity_text(&candidate);
        for cluster in clusters.iter_mut() {
            let cluster_text = similarity_text(&cluster[0]);
            if similarity_ratio(&candidate_text, &cluster_text) >= similarity_threshold {
                cluster.push(candidate);
                continue 'outer;
            }
        }
        clusters.push(vec![candidate]);
    }

    let mut similarity_duplicates = 0usize;
    let mut final_representatives = Vec::with_capacity(clusters.len());
    for mut cluster in clusters {
        similarity_duplicates += cluster.len() - 1;
        let winner = tie_break::best_index(&cluster);
        let mut representative = cluster.swap_remove(winner);
        if !cluster.is_empty() {
            representative.hit.ranking_info_insert("collapsed_similar_duplicates", cluster.len() as u64);
        }
        final_representatives.push(representative);
    }

    MergeOutcome { representatives: final_representatives, duplicates_removed: id_duplicates + similarity_duplicates }
}
