//! Attribute name to document field name mapping

use crate::{AttrRef, DeclaredType};

use super::literal::parse_integer;

/// Normalized name of the identifier attribute
pub const IDENTIFIER_ATTRIBUTE: &str = "id";

/// Numeric primary key carried over from the relational system of record
pub const DATABASE_ID_FIELD: &str = "databaseId";

/// Engine-native document identifier
pub const DOCUMENT_ID_FIELD: &str = "_id";

/// Map a declared attribute name to its document field name.
///
/// Only a leading ASCII capital is lowered: `Name` → `name`, `URL` → `uRL`.
pub fn normalize_field_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(name.len());
            out.push(first.to_ascii_lowercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

pub fn is_identifier(attr: &AttrRef) -> bool {
    attr.declared_type == DeclaredType::Identifier
        || normalize_field_name(&attr.name) == IDENTIFIER_ATTRIBUTE
}

/// Identity facet selected by identifier literals: `databaseId` when every
/// literal is an integer, `_id` otherwise.
pub fn identifier_field<'a>(literals: impl IntoIterator<Item = &'a str>) -> &'static str {
    let mut literals = literals.into_iter().peekable();
    if literals.peek().is_none() {
        return DOCUMENT_ID_FIELD;
    }
    if literals.all(|l| parse_integer(l).is_some()) {
        DATABASE_ID_FIELD
    } else {
        DOCUMENT_ID_FIELD
    }
}

/// Document field targeted by `attr` given the literals it is compared against
pub fn target_field<'a>(attr: &AttrRef, literals: impl IntoIterator<Item = &'a str>) -> String {
    if is_identifier(attr) {
        identifier_field(literals).to_string()
    } else {
        normalize_field_name(&attr.name)
    }
}
