//! Boolean query tree

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value as JsonValue};

/// Typed value carried by term and range clauses
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Long(i64),
    Double(f64),
    Date(DateTime<Utc>),
    Text(String),
}

impl Scalar {
    pub fn to_json(&self) -> JsonValue {
        match self {
            Scalar::Long(i) => json!(i),
            Scalar::Double(f) => json!(f),
            Scalar::Date(d) => JsonValue::String(d.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Scalar::Text(s) => JsonValue::String(s.clone()),
        }
    }
}

/// Exact single-value match
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    pub field: String,
    pub value: Scalar,
}

/// Field value is one of a set
#[derive(Debug, Clone, PartialEq)]
pub struct TermsQuery {
    pub field: String,
    pub values: Vec<String>,
}

/// One-sided range bound; a range clause never carries more than one
#[derive(Debug, Clone, PartialEq)]
pub enum RangeBound {
    Gt(Scalar),
    Gte(Scalar),
    Lt(Scalar),
    Lte(Scalar),
}

impl RangeBound {
    /// DSL key for this bound (`gt`, `gte`, `lt`, `lte`)
    pub fn key(&self) -> &'static str {
        match self {
            RangeBound::Gt(_) => "gt",
            RangeBound::Gte(_) => "gte",
            RangeBound::Lt(_) => "lt",
            RangeBound::Lte(_) => "lte",
        }
    }

    pub fn value(&self) -> &Scalar {
        match self {
            RangeBound::Gt(v) | RangeBound::Gte(v) | RangeBound::Lt(v) | RangeBound::Lte(v) => v,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub field: String,
    pub bound: RangeBound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fuzziness {
    /// Edit distance chosen by the engine from the term length
    Auto,
}

/// Approximate full-text match
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pub field: String,
    pub query: String,
    pub fuzziness: Fuzziness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    /// Every clause must match (conjunction)
    Must,
    /// At least one clause must match (disjunction)
    Should,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolQuery {
    pub occur: Occur,
    pub clauses: Vec<QueryNode>,
}

/// Node of the compiled boolean query tree
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    Term(TermQuery),
    Terms(TermsQuery),
    Range(RangeQuery),
    Match(MatchQuery),
    Bool(BoolQuery),
}

impl QueryNode {
    pub fn term(field: impl Into<String>, value: Scalar) -> Self {
        QueryNode::Term(TermQuery { field: field.into(), value })
    }

    pub fn terms(field: impl Into<String>, values: Vec<String>) -> Self {
        QueryNode::Terms(TermsQuery { field: field.into(), values })
    }

    pub fn range(field: impl Into<String>, bound: RangeBound) -> Self {
        QueryNode::Range(RangeQuery { field: field.into(), bound })
    }

    pub fn fuzzy_match(field: impl Into<String>, query: impl Into<String>) -> Self {
        QueryNode::Match(MatchQuery {
            field: field.into(),
            query: query.into(),
            fuzziness: Fuzziness::Auto,
        })
    }

    /// Conjunction of `clauses`, kept in the given order
    pub fn all(clauses: Vec<QueryNode>) -> Self {
        QueryNode::Bool(BoolQuery { occur: Occur::Must, clauses })
    }

    /// Disjunction of `clauses`, kept in the given order
    pub fn any(clauses: Vec<QueryNode>) -> Self {
        QueryNode::Bool(BoolQuery { occur: Occur::Should, clauses })
    }

    /// Field targeted by a leaf clause; `None` for boolean nodes
    pub fn field(&self) -> Option<&str> {
        match self {
            QueryNode::Term(q) => Some(&q.field),
            QueryNode::Terms(q) => Some(&q.field),
            QueryNode::Range(q) => Some(&q.field),
            QueryNode::Match(q) => Some(&q.field),
            QueryNode::Bool(_) => None,
        }
    }

    /// Encode as an engine query DSL object
    pub fn to_json(&self) -> JsonValue {
        match self {
            QueryNode::Term(q) => json!({ "term": { q.field.as_str(): { "value": q.value.to_json() } } }),
            QueryNode::Terms(q) => json!({ "terms": { q.field.as_str(): q.values } }),
            QueryNode::Range(q) => {
                let mut bound = Map::new();
                bound.insert(q.bound.key().to_string(), q.bound.value().to_json());
                json!({ "range": { q.field.as_str(): bound } })
            }
            QueryNode::Match(q) => {
                let fuzziness = match q.fuzziness {
                    Fuzziness::Auto => "AUTO",
                };
                json!({ "match": { q.field.as_str(): { "query": q.query, "fuzziness": fuzziness } } })
            }
            QueryNode::Bool(b) => {
                let clauses: Vec<JsonValue> = b.clauses.iter().map(QueryNode::to_json).collect();
                match b.occur {
                    Occur::Must => json!({ "bool": { "must": clauses } }),
                    // Nested inside a must, a should-only bool needs at least one matching clause
                    Occur::Should => json!({ "bool": { "should": clauses, "minimum_should_match": 1 } }),
                }
            }
        }
    }
}
