//! RESQ Intermediate Representation (IR)
//!
//! Canonical JSON representation of a resource query: filter tree, sort
//! order and pagination window, as handed over by the host query parser.
//! The [`elastic`] module translates it into search engine requests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod elastic;
mod types;
pub use types::*;

/// One query against a resource collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLayer {
    pub resource: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpr>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortExpr>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl QueryLayer {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            filter: None,
            sort: None,
            pagination: None,
        }
    }

    /// SHA-256 of the canonical JSON form, for caching compiled queries
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

/// Attribute reference as declared on the resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrRef {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: DeclaredType,
}

impl AttrRef {
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self { name: name.into(), declared_type }
    }
}

/// Chain of attribute references; more than one segment means relationship traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath {
    pub fields: Vec<AttrRef>,
}

impl FieldPath {
    /// Path to a direct attribute
    pub fn attribute(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self { fields: vec![AttrRef::new(name, declared_type)] }
    }

    pub fn chain(fields: Vec<AttrRef>) -> Self {
        Self { fields }
    }

    /// Dotted form, e.g. `author.name`
    pub fn dotted(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

/// Side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Operand {
    Field { path: FieldPath },
    Literal { value: String },
    Null,
    /// Number of related resources behind a to-many relationship
    Count { path: FieldPath },
}

impl Operand {
    pub fn field(path: FieldPath) -> Self {
        Operand::Field { path }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Operand::Literal { value: value.into() }
    }

    pub fn describe(&self) -> String {
        match self {
            Operand::Field { path } => format!("field '{}'", path.dotted()),
            Operand::Literal { value } => format!("literal '{}'", value),
            Operand::Null => "null".to_string(),
            Operand::Count { path } => format!("count({})", path.dotted()),
        }
    }
}

/// Filter expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FilterExpr {
    Comparison {
        op: ComparisonOp,
        left: Operand,
        right: Operand,
    },
    MatchText {
        field: FieldPath,
        text: String,
    },
    EqualsAnyOf {
        field: FieldPath,
        values: Vec<String>,
    },
    Logical {
        op: LogicalOp,
        terms: Vec<FilterExpr>,
    },
    Not {
        term: Box<FilterExpr>,
    },
    FieldPath {
        path: FieldPath,
    },
    CollectionNotEmpty {
        path: FieldPath,
    },
}

impl FilterExpr {
    /// `field <op> 'literal'`
    pub fn compare(op: ComparisonOp, field: FieldPath, literal: impl Into<String>) -> Self {
        FilterExpr::Comparison {
            op,
            left: Operand::field(field),
            right: Operand::literal(literal),
        }
    }

    pub fn and(terms: Vec<FilterExpr>) -> Self {
        FilterExpr::Logical { op: LogicalOp::And, terms }
    }

    pub fn or(terms: Vec<FilterExpr>) -> Self {
        FilterExpr::Logical { op: LogicalOp::Or, terms }
    }

    pub fn not(term: FilterExpr) -> Self {
        FilterExpr::Not { term: Box::new(term) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortElement {
    pub path: FieldPath,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
    /// Ordering by a relationship count rather than an attribute value
    #[serde(default)]
    pub aggregated: bool,
}

fn default_ascending() -> bool {
    true
}

impl SortElement {
    pub fn ascending(path: FieldPath) -> Self {
        Self { path, ascending: true, aggregated: false }
    }

    pub fn descending(path: FieldPath) -> Self {
        Self { path, ascending: false, aggregated: false }
    }
}

/// Ordered sort keys; the first element is the primary key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortExpr {
    pub elements: Vec<SortElement>,
}

impl SortExpr {
    pub fn new(elements: Vec<SortElement>) -> Self {
        Self { elements }
    }
}

/// Page window; `page_number` is 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default = "first_page")]
    pub page_number: u32,
}

fn first_page() -> u32 {
    1
}

impl Pagination {
    pub fn new(page_size: u32, page_number: u32) -> Self {
        Self { page_size: Some(page_size), page_number }
    }
}
