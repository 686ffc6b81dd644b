//! Renders a [`StructuredFilter`] into the backend's filter-expression syntax.

use serde_json::Value;
use thai_search_core::{FilterOp, FilterValue, StructuredFilter};

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn render_eq(field: &str, value: &Value) -> String {
    format!("{field} = {}", render_scalar(value))
}

fn render_or_list(field: &str, values: &[Value]) -> String {
    let clauses: Vec<String> = values.iter().map(|v| render_eq(field, v)).collect();
    format!("({})", clauses.join(" OR "))
}

fn render_op(field: &str, op: &FilterOp) -> Vec<String> {
    let mut clauses = Vec::new();
    if let Some(v) = &op.eq {
        clauses.push(render_eq(field, v));
    }
    if let Some(v) = &op.ne {
        clauses.push(format!("{field} != {}", render_scalar(v)));
    }
    if let Some(v) = &op.gt {
        clauses.push(format!("{field} > {}", render_scalar(v)));
    }
    if let Some(v) = &op.gte {
        clauses.push(format!("{field} >= {}", render_scalar(v)));
    }
    if let Some(v) = &op.lt {
        clauses.push(format!("{field} < {}", render_scalar(v)));
    }
    if let Some(v) = &op.lte {
        clauses.push(format!("{field} <= {}", render_scalar(v)));
    }
    if let Some(values) = &op.in_ {
        clauses.push(render_or_list(field, values));
    }
    if let Some(exists) = op.exists {
        clauses.push(format!("{field} {}", if exists { "EXISTS" } else { "NOT EXISTS" }));
    }
    clauses
}

/// Serializes a [`StructuredFilter`] into an AND-joined boolean expression.
/// Returns `None` when the filter is empty.
pub fn serialize(filter: &StructuredFilter) -> Option<String> {
    if filter.is_empty() {
        return None;
    }

    let mut clauses: Vec<String> = filter
        .iter()
        .flat_map(|(field, value)| match value {
            FilterValue::Scalar(v) => vec![render_eq(field, v)],
            FilterValue::List(values) => vec![render_or_list(field, values)],
            FilterValue::Op(op) => render_op(field, op),
        })
        .collect();

    // Deterministic output for diagnosability and stable tests, even though
    // HashMap iteration order is otherwise unspecified.
    clauses.sort();
    Some(clauses.join(" AND "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn scalar_renders_as_equality() {
        let mut filter: StructuredFilter = HashMap::new();
        filter.insert("status".to_string(), FilterValue::Scalar(Value::String("active".to_string())));
        assert_eq!(serialize(&filter).unwrap(), "status = \"active\"");
    }

    #[test]
    fn list_expands_to_or() {
        let mut filter: StructuredFilter = HashMap::new();
        filter.insert(
            "category".to_string(),
            FilterValue::List(vec![Value::String("a".to_string()), Value::String("b".to_string())]),
        );
        assert_eq!(serialize(&filter).unwrap(), "(category = \"a\" OR category = \"b\")");
    }

    #[test]
    fn embedded_quote_is_escaped() {
        let mut filter: StructuredFilter = HashMap::new();
        filter.insert("title".to_string(), FilterValue::Scalar(Value::String("say \"hi\"".to_string())));
        let rendered = serialize(&filter).unwrap();
        assert!(rendered.contains("\\\""));
    }

    #[test]
    fn exists_operator_renders_keyword() {
        let mut filter: StructuredFilter = HashMap::new();
        filter.insert(
            "deleted_at".to_string(),
            FilterValue::Op(FilterOp { exists: Some(false), ..Default::default() }),
        );
        assert_eq!(serialize(&filter).unwrap(), "deleted_at NOT EXISTS");
    }

    #[test]
    fn empty_filter_serializes_to_none() {
        let filter: StructuredFilter = HashMap::new();
        assert!(serialize(&filter).is_none());
    }
}
