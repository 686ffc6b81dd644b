//! The six-rule tie-break chain. First discriminator wins;
//! [`compare`] orders candidates so the preferred one sorts first.

use std::cmp::Ordering;

use crate::candidate::Candidate;

/// Engine priority: newmm < attacut < deepcut < basic < other (lower wins).
fn engine_priority(engine_id: &str) -> u8 {
    match engine_id {
        "newmm" => 0,
        "attacut" => 1,
        "deepcut" => 2,
        "basic" | "fallback" => 3,
        _ => 4,
    }
}

pub fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    b.hit
        .score
        .partial_cmp(&a.hit.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.kind.tie_break_priority().cmp(&b.kind.tie_break_priority()))
        .then_with(|| engine_priority(&a.engine_id).cmp(&engine_priority(&b.engine_id)))
        .then_with(|| a.position.cmp(&b.position))
        .then_with(|| b.variant_weight.partial_cmp(&a.variant_weight).unwrap_or(Ordering::Equal))
        .then_with(|| b.content_len().cmp(&a.content_len()))
}

/// Picks the index of the preferred candidate among `group` by the tie-break
/// chain. Panics if `group` is empty — callers only invoke this on non-empty
/// groups.
pub fn best_index(group: &[Candidate]) -> usize {
    group
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| compare(a, b))
        .map(|(idx, _)| idx)
        .expect("best_index called on an empty group")
}
