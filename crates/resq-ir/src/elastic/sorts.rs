//! Sort compiler

use resq_dsl::SortClause;

use super::constraints::single_attribute;
use super::names::{is_identifier, normalize_field_name};
use super::translator::TranslateError;
use crate::SortExpr;

#[derive(Debug, Clone, Copy, Default)]
pub struct SortCompiler;

impl SortCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compile sort keys in order, primary key first
    pub fn compile(&self, sort: &SortExpr) -> Result<Vec<SortClause>, TranslateError> {
        sort.elements
            .iter()
            .map(|element| {
                let attr = single_attribute(&element.path)?;
                if element.aggregated {
                    return Err(TranslateError::UnsupportedAggregateSort(element.path.dotted()));
                }
                let field = normalize_field_name(&attr.name);
                Ok(if element.ascending {
                    SortClause::ascending(field)
                } else {
                    SortClause::descending(field)
                })
            })
            .collect()
    }
}

/// True for a sort on the identifier alone, ascending; the engine's
/// default order already satisfies it.
pub fn is_identifier_only_ascending(sort: &SortExpr) -> bool {
    match sort.elements.as_slice() {
        [element] => {
            element.ascending
                && !element.aggregated
                && matches!(element.path.fields.as_slice(), [attr] if is_identifier(attr))
        }
        _ => false,
    }
}
