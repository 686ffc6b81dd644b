//! The ranker's working unit: a scored hit plus the provenance fields the
//! tie-break chain and merge pass need, which don't
//! belong on the public [`thai_search_core::SearchHit`] itself.

use thai_search_core::{SearchHit, VariantKind};

#[derive(Debug, Clone)]
pub struct Candidate {
    pub hit: SearchHit,
    pub kind: VariantKind,
    pub engine_id: String,
    pub position: usize,
    pub variant_weight: f32,
}

impl Candidate {
    pub fn content_len(&self) -> usize {
        self.hit.title_lower().len() + self.hit.content_lower().len()
    }
}
