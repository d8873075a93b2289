//! Elasticsearch translation
//!
//! Compiles RESQ IR (filter, sort, pagination) into the request shapes of
//! `resq-dsl`. Three stages, each usable on its own:
//!
//! - [`ConstraintCompiler`]: filter tree → boolean query tree
//! - [`SortCompiler`]: sort keys → sort clauses
//! - [`QueryTranslator`]: assembles both plus the page window into a
//!   search or count request

mod classify;
mod constraints;
mod literal;
mod names;
mod sorts;
mod translator;

pub use classify::{classify, FieldClass};
pub use constraints::ConstraintCompiler;
pub use literal::{parse_datetime, parse_float, parse_integer, parse_scalar};
pub use names::{
    identifier_field, is_identifier, normalize_field_name, target_field, DATABASE_ID_FIELD, DOCUMENT_ID_FIELD,
    IDENTIFIER_ATTRIBUTE,
};
pub use sorts::{is_identifier_only_ascending, SortCompiler};
pub use translator::{page_window, AssemblerOptions, QueryTranslator, TranslateError};
