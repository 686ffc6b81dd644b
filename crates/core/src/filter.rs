//! Structured filter language: a mapping from field name to either a
//! scalar, a list (OR of equals), or an operator object.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One field's filter expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(Value),
    List(Vec<Value>),
    Op(FilterOp),
}

/// Operator object keyed by `$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte`,
/// `$in`, `$exists`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOp {
    #[serde(rename = "$eq", skip_serializing_if = "Option::is_none")]
    pub eq: Option<Value>,
    #[serde(rename = "$ne", skip_serializing_if = "Option::is_none")]
    pub ne: Option<Value>,
    #[serde(rename = "$gt", skip_serializing_if = "Option::is_none")]
    pub gt: Option<Value>,
    #[serde(rename = "$gte", skip_serializing_if = "Option::is_none")]
    pub gte: Option<Value>,
    #[serde(rename = "$lt", skip_serializing_if = "Option::is_none")]
    pub lt: Option<Value>,
    #[serde(rename = "$lte", skip_serializing_if = "Option::is_none")]
    pub lte: Option<Value>,
    #[serde(rename = "$in", skip_serializing_if = "Option::is_none")]
    pub in_: Option<Vec<Value>>,
    #[serde(rename = "$exists", skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
}

/// Top-level structured filter: field name -> expression.
pub type StructuredFilter = HashMap<String, FilterValue>;
