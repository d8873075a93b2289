//! Search and count request descriptors

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use thiserror::Error;

use crate::query::QueryNode;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("Request body encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortClause {
    pub field: String,
    pub order: SortOrder,
}

impl SortClause {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self { field: field.into(), order: SortOrder::Asc }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self { field: field.into(), order: SortOrder::Desc }
    }

    pub fn to_json(&self) -> JsonValue {
        json!({ self.field.as_str(): { "order": self.order } })
    }
}

/// Compiled search: index, optional filter, ordered sort keys and paging window
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub index: String,
    /// `None` leaves the engine default (match all)
    pub query: Option<QueryNode>,
    /// First clause is the primary sort key
    pub sort: Vec<SortClause>,
    pub from: Option<u64>,
    pub size: Option<u64>,
}

impl SearchRequest {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            query: None,
            sort: Vec::new(),
            from: None,
            size: None,
        }
    }

    /// Request body in the engine's JSON query DSL
    pub fn body(&self) -> JsonValue {
        let mut body = Map::new();
        if let Some(query) = &self.query {
            body.insert("query".to_string(), query.to_json());
        }
        if !self.sort.is_empty() {
            let sort = self.sort.iter().map(SortClause::to_json).collect();
            body.insert("sort".to_string(), JsonValue::Array(sort));
        }
        if let Some(from) = self.from {
            body.insert("from".to_string(), json!(from));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }
        JsonValue::Object(body)
    }

    /// Pretty-printed request body
    pub fn encode(&self) -> Result<String, EncodingError> {
        Ok(serde_json::to_string_pretty(&self.body())?)
    }
}

/// Compiled count: index and optional filter, no sort or paging
#[derive(Debug, Clone, PartialEq)]
pub struct CountRequest {
    pub index: String,
    pub query: Option<QueryNode>,
}

impl CountRequest {
    pub fn new(index: impl Into<String>) -> Self {
        Self { index: index.into(), query: None }
    }

    pub fn body(&self) -> JsonValue {
        match &self.query {
            Some(query) => json!({ "query": query.to_json() }),
            None => json!({}),
        }
    }

    pub fn encode(&self) -> Result<String, EncodingError> {
        Ok(serde_json::to_string_pretty(&self.body())?)
    }
}

/// Engine reply to a count request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

impl CountResponse {
    /// Total as a 32-bit signed count, saturating at `i32::MAX`
    pub fn clamped(&self) -> i32 {
        i32::try_from(self.count).unwrap_or(i32::MAX)
    }

    pub fn is_clamped(&self) -> bool {
        self.count > i32::MAX as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source", default)]
    pub source: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Engine reply to a search request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Hits,
}

impl SearchResponse {
    /// Stored documents of every hit, in ranking order
    pub fn into_documents(self) -> Vec<JsonValue> {
        self.hits.hits.into_iter().map(|hit| hit.source).collect()
    }
}
