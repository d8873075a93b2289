//! Constraint compiler: filter expression tree → boolean query tree

use resq_dsl::{QueryNode, RangeBound};
use tracing::trace;

use super::classify::{classify, FieldClass};
use super::literal::{parse_integer, parse_scalar};
use super::names::{is_identifier, normalize_field_name, target_field, DATABASE_ID_FIELD, DOCUMENT_ID_FIELD};
use super::translator::TranslateError;
use crate::{AttrRef, ComparisonOp, FieldPath, FilterExpr, LogicalOp, Operand};

/// The single attribute of a direct (non-chained) field path
pub(super) fn single_attribute(path: &FieldPath) -> Result<&AttrRef, TranslateError> {
    match path.fields.as_slice() {
        [attr] => Ok(attr),
        [] => Err(TranslateError::UnsupportedExpression("empty field path".to_string())),
        _ => Err(TranslateError::MultiSegmentPath(path.dotted())),
    }
}

/// Stateless; one instance may compile any number of trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintCompiler;

impl ConstraintCompiler {
    pub fn new() -> Self {
        Self
    }

    pub fn compile(&self, expr: &FilterExpr) -> Result<QueryNode, TranslateError> {
        match expr {
            FilterExpr::Comparison { op, left, right } => self.compile_comparison(*op, left, right),
            FilterExpr::MatchText { field, text } => self.compile_match_text(field, text),
            FilterExpr::EqualsAnyOf { field, values } => self.compile_equals_any_of(field, values),
            FilterExpr::Logical { op, terms } => self.compile_logical(*op, terms),
            FilterExpr::Not { .. } => Err(TranslateError::UnsupportedExpression(
                "unary operator \"not\" is not supported".to_string(),
            )),
            FilterExpr::FieldPath { path } => Err(TranslateError::UnsupportedExpression(format!(
                "bare field '{}' is not a filter",
                path.dotted()
            ))),
            FilterExpr::CollectionNotEmpty { path } => Err(TranslateError::UnsupportedExpression(format!(
                "relationship check on '{}' is not supported",
                path.dotted()
            ))),
        }
    }

    fn compile_comparison(
        &self,
        op: ComparisonOp,
        left: &Operand,
        right: &Operand,
    ) -> Result<QueryNode, TranslateError> {
        let path = match left {
            Operand::Field { path } => path,
            other => {
                return Err(TranslateError::NonLiteralOperand(format!(
                    "left operand must be a field, got {}",
                    other.describe()
                )))
            }
        };
        let attr = single_attribute(path)?;
        let literal = match right {
            Operand::Literal { value } => value,
            other => {
                return Err(TranslateError::NonLiteralOperand(format!(
                    "right operand must be a literal constant, got {}",
                    other.describe()
                )))
            }
        };

        let (field, class) = if is_identifier(attr) {
            if parse_integer(literal).is_some() {
                (DATABASE_ID_FIELD.to_string(), FieldClass::Integer)
            } else if op == ComparisonOp::Eq {
                (DOCUMENT_ID_FIELD.to_string(), FieldClass::Text)
            } else {
                return Err(TranslateError::UnsupportedExpression(format!(
                    "{:?} on document id '{}', only equality is supported",
                    op, literal
                )));
            }
        } else {
            (normalize_field_name(&attr.name), classify(attr.declared_type)?)
        };

        let value = parse_scalar(class, literal).ok_or_else(|| TranslateError::LiteralParse {
            field: field.clone(),
            value: literal.clone(),
            expected: class,
        })?;

        trace!(field = %field, ?class, ?op, "compiled comparison");

        let node = match op {
            ComparisonOp::Eq => QueryNode::term(field, value),
            ComparisonOp::Gt => QueryNode::range(field, RangeBound::Gt(value)),
            ComparisonOp::Ge => QueryNode::range(field, RangeBound::Gte(value)),
            ComparisonOp::Lt => QueryNode::range(field, RangeBound::Lt(value)),
            ComparisonOp::Le => QueryNode::range(field, RangeBound::Lte(value)),
        };
        Ok(node)
    }

    fn compile_match_text(&self, path: &FieldPath, text: &str) -> Result<QueryNode, TranslateError> {
        let attr = single_attribute(path)?;
        let field = target_field(attr, [text]);
        Ok(QueryNode::fuzzy_match(field, text))
    }

    fn compile_equals_any_of(&self, path: &FieldPath, values: &[String]) -> Result<QueryNode, TranslateError> {
        let attr = single_attribute(path)?;
        let field = target_field(attr, values.iter().map(String::as_str));
        Ok(QueryNode::terms(field, values.to_vec()))
    }

    fn compile_logical(&self, op: LogicalOp, terms: &[FilterExpr]) -> Result<QueryNode, TranslateError> {
        let mut clauses = terms
            .iter()
            .map(|term| self.compile(term))
            .collect::<Result<Vec<_>, _>>()?;

        match clauses.len() {
            0 => Err(TranslateError::UnsupportedExpression(format!(
                "empty {:?} group",
                op
            ))),
            1 => Ok(clauses.remove(0)),
            _ => Ok(match op {
                LogicalOp::And => QueryNode::all(clauses),
                LogicalOp::Or => QueryNode::any(clauses),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeclaredType;
    use resq_dsl::{Occur, Scalar};

    fn compile(expr: &FilterExpr) -> Result<QueryNode, TranslateError> {
        ConstraintCompiler::new().compile(expr)
    }

    fn age() -> FieldPath {
        FieldPath::attribute("Age", DeclaredType::Int32)
    }

    fn name() -> FieldPath {
        FieldPath::attribute("Name", DeclaredType::String)
    }

    fn id() -> FieldPath {
        FieldPath::attribute("Id", DeclaredType::String)
    }

    #[test]
    fn test_integer_equality_is_term() {
        let node = compile(&FilterExpr::compare(ComparisonOp::Eq, age(), "30")).unwrap();
        assert_eq!(node, QueryNode::term("age", Scalar::Long(30)));
    }

    #[test]
    fn test_integer_inequalities_set_one_bound() {
        let cases = [
            (ComparisonOp::Gt, RangeBound::Gt(Scalar::Long(18))),
            (ComparisonOp::Ge, RangeBound::Gte(Scalar::Long(18))),
            (ComparisonOp::Lt, RangeBound::Lt(Scalar::Long(18))),
            (ComparisonOp::Le, RangeBound::Lte(Scalar::Long(18))),
        ];
        for (op, bound) in cases {
            let node = compile(&FilterExpr::compare(op, age(), "18")).unwrap();
            assert_eq!(node, QueryNode::range("age", bound), "{op:?}");
        }
    }

    #[test]
    fn test_float_and_date_ranges() {
        let score = FieldPath::attribute("Score", DeclaredType::Decimal);
        let node = compile(&FilterExpr::compare(ComparisonOp::Ge, score, "4.5")).unwrap();
        assert_eq!(node, QueryNode::range("score", RangeBound::Gte(Scalar::Double(4.5))));

        let created = FieldPath::attribute("CreatedAt", DeclaredType::DateTime);
        let node = compile(&FilterExpr::compare(ComparisonOp::Lt, created, "2024-01-01")).unwrap();
        match node {
            QueryNode::Range(range) => {
                assert_eq!(range.field, "createdAt");
                assert!(matches!(range.bound, RangeBound::Lt(Scalar::Date(_))));
            }
            other => panic!("expected range, got {other:?}"),
        }
    }

    #[test]
    fn test_text_inequality_is_term_range() {
        let node = compile(&FilterExpr::compare(ComparisonOp::Gt, name(), "M")).unwrap();
        assert_eq!(
            node,
            QueryNode::range("name", RangeBound::Gt(Scalar::Text("M".to_string())))
        );
    }

    #[test]
    fn test_literal_parse_failure() {
        let err = compile(&FilterExpr::compare(ComparisonOp::Gt, age(), "old")).unwrap_err();
        match err {
            TranslateError::LiteralParse { field, value, expected } => {
                assert_eq!(field, "age");
                assert_eq!(value, "old");
                assert_eq!(expected, FieldClass::Integer);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_float_and_date_literal_parse_failures() {
        let score = FieldPath::attribute("Score", DeclaredType::Float64);
        match compile(&FilterExpr::compare(ComparisonOp::Gt, score, "high")).unwrap_err() {
            TranslateError::LiteralParse { field, expected, .. } => {
                assert_eq!(field, "score");
                assert_eq!(expected, FieldClass::Float);
            }
            other => panic!("unexpected error {other:?}"),
        }

        let created = FieldPath::attribute("CreatedAt", DeclaredType::DateTime);
        match compile(&FilterExpr::compare(ComparisonOp::Ge, created, "last tuesday")).unwrap_err() {
            TranslateError::LiteralParse { field, value, expected } => {
                assert_eq!(field, "createdAt");
                assert_eq!(value, "last tuesday");
                assert_eq!(expected, FieldClass::DateTime);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_minute_precision_date_literal() {
        let created = FieldPath::attribute("CreatedAt", DeclaredType::DateTime);
        let node = compile(&FilterExpr::compare(ComparisonOp::Gt, created, "2024-03-01T12:30")).unwrap();
        assert_eq!(
            node.to_json(),
            serde_json::json!({ "range": { "createdAt": { "gt": "2024-03-01T12:30:00Z" } } })
        );
    }

    #[test]
    fn test_unsupported_field_type() {
        let active = FieldPath::attribute("Active", DeclaredType::Bool);
        let err = compile(&FilterExpr::compare(ComparisonOp::Eq, active, "true")).unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedFieldType(DeclaredType::Bool)));
    }

    #[test]
    fn test_numeric_identifier_routes_to_database_id() {
        let node = compile(&FilterExpr::compare(ComparisonOp::Eq, id(), "42")).unwrap();
        assert_eq!(node, QueryNode::term("databaseId", Scalar::Long(42)));

        let node = compile(&FilterExpr::compare(ComparisonOp::Ge, id(), "42")).unwrap();
        assert_eq!(node, QueryNode::range("databaseId", RangeBound::Gte(Scalar::Long(42))));
    }

    #[test]
    fn test_text_identifier_routes_to_document_id() {
        let node = compile(&FilterExpr::compare(ComparisonOp::Eq, id(), "abc-123")).unwrap();
        assert_eq!(node, QueryNode::term("_id", Scalar::Text("abc-123".to_string())));
    }

    #[test]
    fn test_document_id_rejects_ranges() {
        let err = compile(&FilterExpr::compare(ComparisonOp::Lt, id(), "abc")).unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedExpression(_)));
    }

    #[test]
    fn test_identifier_overrides_declared_type() {
        // A non-numeric literal against an integer-declared id still targets _id
        let path = FieldPath::attribute("Id", DeclaredType::Int64);
        let node = compile(&FilterExpr::compare(ComparisonOp::Eq, path, "doc-9")).unwrap();
        assert_eq!(node.field(), Some("_id"));
    }

    #[test]
    fn test_match_text_is_fuzzy() {
        let node = compile(&FilterExpr::MatchText { field: name(), text: "alce".to_string() }).unwrap();
        assert_eq!(node, QueryNode::fuzzy_match("name", "alce"));

        let node = compile(&FilterExpr::MatchText { field: id(), text: "7".to_string() }).unwrap();
        assert_eq!(node.field(), Some("databaseId"));

        let node = compile(&FilterExpr::MatchText { field: id(), text: "abc-123".to_string() }).unwrap();
        assert_eq!(node, QueryNode::fuzzy_match("_id", "abc-123"));
    }

    #[test]
    fn test_equals_any_of_passes_raw_values() {
        let expr = FilterExpr::EqualsAnyOf {
            field: age(),
            values: vec!["1".to_string(), "two".to_string()],
        };
        let node = compile(&expr).unwrap();
        assert_eq!(node, QueryNode::terms("age", vec!["1".to_string(), "two".to_string()]));

        let expr = FilterExpr::EqualsAnyOf {
            field: id(),
            values: vec!["1".to_string(), "2".to_string()],
        };
        assert_eq!(compile(&expr).unwrap().field(), Some("databaseId"));

        let expr = FilterExpr::EqualsAnyOf {
            field: id(),
            values: vec!["1".to_string(), "b".to_string()],
        };
        assert_eq!(compile(&expr).unwrap().field(), Some("_id"));
    }

    #[test]
    fn test_and_keeps_children_in_order() {
        let expr = FilterExpr::and(vec![
            FilterExpr::compare(ComparisonOp::Gt, age(), "1"),
            FilterExpr::compare(ComparisonOp::Eq, name(), "b"),
            FilterExpr::MatchText { field: name(), text: "c".to_string() },
        ]);
        match compile(&expr).unwrap() {
            QueryNode::Bool(b) => {
                assert_eq!(b.occur, Occur::Must);
                assert_eq!(b.clauses.len(), 3);
                assert!(matches!(b.clauses[0], QueryNode::Range(_)));
                assert!(matches!(b.clauses[1], QueryNode::Term(_)));
                assert!(matches!(b.clauses[2], QueryNode::Match(_)));
            }
            other => panic!("expected bool, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_logical_structure_preserved() {
        let expr = FilterExpr::or(vec![
            FilterExpr::and(vec![
                FilterExpr::compare(ComparisonOp::Gt, age(), "1"),
                FilterExpr::compare(ComparisonOp::Lt, age(), "9"),
            ]),
            FilterExpr::compare(ComparisonOp::Eq, name(), "z"),
        ]);
        match compile(&expr).unwrap() {
            QueryNode::Bool(outer) => {
                assert_eq!(outer.occur, Occur::Should);
                assert_eq!(outer.clauses.len(), 2);
                assert!(matches!(&outer.clauses[0], QueryNode::Bool(inner) if inner.occur == Occur::Must && inner.clauses.len() == 2));
            }
            other => panic!("expected bool, got {other:?}"),
        }
    }

    #[test]
    fn test_single_term_group_unwrapped() {
        let inner = FilterExpr::compare(ComparisonOp::Eq, name(), "a");
        let node = compile(&FilterExpr::or(vec![inner.clone()])).unwrap();
        assert_eq!(node, compile(&inner).unwrap());
    }

    #[test]
    fn test_empty_group_rejected() {
        let err = compile(&FilterExpr::and(vec![])).unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedExpression(_)));
    }

    #[test]
    fn test_not_always_rejected() {
        let valid = FilterExpr::not(FilterExpr::compare(ComparisonOp::Eq, name(), "a"));
        let invalid = FilterExpr::not(FilterExpr::compare(ComparisonOp::Gt, age(), "x"));
        for expr in [valid, invalid] {
            assert!(matches!(compile(&expr), Err(TranslateError::UnsupportedExpression(_))));
        }
    }

    #[test]
    fn test_unsupported_leaf_shapes() {
        let bare = FilterExpr::FieldPath { path: name() };
        let has = FilterExpr::CollectionNotEmpty { path: FieldPath::attribute("Tags", DeclaredType::Collection) };
        assert!(matches!(compile(&bare), Err(TranslateError::UnsupportedExpression(_))));
        assert!(matches!(compile(&has), Err(TranslateError::UnsupportedExpression(_))));
    }

    #[test]
    fn test_multi_segment_paths_rejected() {
        let chain = FieldPath::chain(vec![
            AttrRef::new("Author", DeclaredType::Object),
            AttrRef::new("Name", DeclaredType::String),
        ]);
        let exprs = [
            FilterExpr::compare(ComparisonOp::Eq, chain.clone(), "x"),
            FilterExpr::MatchText { field: chain.clone(), text: "x".to_string() },
            FilterExpr::EqualsAnyOf { field: chain.clone(), values: vec!["x".to_string()] },
        ];
        for expr in exprs {
            match compile(&expr) {
                Err(TranslateError::MultiSegmentPath(path)) => assert_eq!(path, "Author.Name"),
                other => panic!("expected MultiSegmentPath, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_non_literal_operands_rejected() {
        let shapes = [
            (Operand::field(age()), Operand::Null),
            (Operand::field(age()), Operand::field(name())),
            (Operand::literal("3"), Operand::field(age())),
            (Operand::Count { path: FieldPath::attribute("Tags", DeclaredType::Collection) }, Operand::literal("3")),
        ];
        for (left, right) in shapes {
            let expr = FilterExpr::Comparison { op: ComparisonOp::Eq, left, right };
            assert!(matches!(compile(&expr), Err(TranslateError::NonLiteralOperand(_))));
        }
    }
}
