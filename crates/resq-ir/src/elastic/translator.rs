//! Query assembler: RESQ IR → search and count requests

use resq_dsl::{CountRequest, QueryNode, SearchRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classify::FieldClass;
use super::constraints::ConstraintCompiler;
use super::sorts::{is_identifier_only_ascending, SortCompiler};
use crate::{DeclaredType, FilterExpr, Pagination, QueryLayer, SortExpr};

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    #[error("Field chain '{0}' not supported, only direct attributes can be queried")]
    MultiSegmentPath(String),

    #[error("Non-literal operand: {0}")]
    NonLiteralOperand(String),

    #[error("Cannot parse '{value}' as {expected} for field '{field}'")]
    LiteralParse {
        field: String,
        value: String,
        expected: FieldClass,
    },

    #[error("Unsupported field type: {0:?}")]
    UnsupportedFieldType(DeclaredType),

    #[error("Aggregating sort not supported: {0}")]
    UnsupportedAggregateSort(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerOptions {
    /// Skip the explicit sort clause for a lone ascending identifier sort
    pub suppress_identifier_sort: bool,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self { suppress_identifier_sort: true }
    }
}

/// `(offset, limit)` for a page window, or `None` without a page size
pub fn page_window(pagination: &Pagination) -> Option<(u64, u64)> {
    let size = u64::from(pagination.page_size?);
    let offset = size * u64::from(pagination.page_number.saturating_sub(1));
    Some((offset, size))
}

/// Translator for RESQ IR → engine requests
pub struct QueryTranslator {
    options: AssemblerOptions,
    constraints: ConstraintCompiler,
    sorts: SortCompiler,
}

impl QueryTranslator {
    pub fn new() -> Self {
        Self::with_options(AssemblerOptions::default())
    }

    pub fn with_options(options: AssemblerOptions) -> Self {
        Self {
            options,
            constraints: ConstraintCompiler::new(),
            sorts: SortCompiler::new(),
        }
    }

    pub fn options(&self) -> AssemblerOptions {
        self.options
    }

    /// Translate a whole query layer to a search request against `index`
    pub fn translate(&self, index: &str, layer: &QueryLayer) -> Result<SearchRequest, TranslateError> {
        self.build_search(
            index,
            layer.filter.as_ref(),
            layer.sort.as_ref(),
            layer.pagination.as_ref(),
        )
    }

    /// Search form: filter, sort and page window
    pub fn build_search(
        &self,
        index: &str,
        filter: Option<&FilterExpr>,
        sort: Option<&SortExpr>,
        pagination: Option<&Pagination>,
    ) -> Result<SearchRequest, TranslateError> {
        let mut request = SearchRequest::new(index);
        request.query = self.compile_filter(filter)?;

        if let Some(sort) = sort {
            if self.options.suppress_identifier_sort && is_identifier_only_ascending(sort) {
                debug!(index, "identifier-only ascending sort left to engine order");
            } else {
                request.sort = self.sorts.compile(sort)?;
            }
        }

        if let Some((from, size)) = pagination.and_then(page_window) {
            request.from = Some(from);
            request.size = Some(size);
        }

        debug!(
            index,
            filtered = request.query.is_some(),
            sort_keys = request.sort.len(),
            from = ?request.from,
            size = ?request.size,
            "compiled search request"
        );

        Ok(request)
    }

    /// Count form: filter only
    pub fn build_count(&self, index: &str, filter: Option<&FilterExpr>) -> Result<CountRequest, TranslateError> {
        let mut request = CountRequest::new(index);
        request.query = self.compile_filter(filter)?;

        debug!(index, filtered = request.query.is_some(), "compiled count request");

        Ok(request)
    }

    fn compile_filter(&self, filter: Option<&FilterExpr>) -> Result<Option<QueryNode>, TranslateError> {
        filter.map(|f| self.constraints.compile(f)).transpose()
    }
}

impl Default for QueryTranslator {
    fn default() -> Self {
        Self::new()
    }
}
