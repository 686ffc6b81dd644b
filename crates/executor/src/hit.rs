//! Raw-record-to-[`SearchHit`] conversion.

use serde_json::{Map, Value};
use thai_search_core::{QueryVariant, SearchHit};

/// Converts one raw backend record into a [`SearchHit`]. Returns `None`
/// (and logs) when the record carries neither `id` nor `_id` — such
/// records are corrupt and are skipped without aborting the variant.
pub fn convert(mut record: Map<String, Value>, variant: &QueryVariant) -> Option<SearchHit> {
    let document_id = record
        .get("id")
        .or_else(|| record.get("_id"))
        .map(coerce_to_string)?;

    let score = record
        .get("_rankingScore")
        .and_then(Value::as_f64)
        .or_else(|| record.get("_score").and_then(Value::as_f64))
        .unwrap_or(0.0) as f32;

    let highlight = record
        .remove("_formatted")
        .and_then(|v| v.as_object().cloned());

    let document: Map<String, Value> = record.into_iter().filter(|(k, _)| !k.starts_with('_')).collect();

    let mut hit = SearchHit {
        document_id,
        score,
        document,
        highlight,
        ranking_info: Map::new(),
    };
    hit.ranking_info_insert("variant_weight", variant.weight as f64);
    hit.ranking_info_insert("variant_kind", format!("{:?}", variant.kind));
    hit.ranking_info_insert("engine_id", variant.engine_id.clone());
    Some(hit)
}

fn coerce_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
