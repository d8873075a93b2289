//! Declared type classification

use std::fmt;

use crate::DeclaredType;

use super::translator::TranslateError;

/// Query construction strategy for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    Integer,
    Float,
    DateTime,
    Text,
}

impl fmt::Display for FieldClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldClass::Integer => "integer",
            FieldClass::Float => "floating-point number",
            FieldClass::DateTime => "date-time",
            FieldClass::Text => "text",
        };
        f.write_str(name)
    }
}

/// Bin a declared type into its classification; closed over queryable primitives
pub fn classify(declared: DeclaredType) -> Result<FieldClass, TranslateError> {
    match declared {
        DeclaredType::Int8
        | DeclaredType::Int16
        | DeclaredType::Int32
        | DeclaredType::Int64
        | DeclaredType::UInt8
        | DeclaredType::UInt16
        | DeclaredType::UInt32
        | DeclaredType::UInt64 => Ok(FieldClass::Integer),
        DeclaredType::Float32 | DeclaredType::Float64 | DeclaredType::Decimal => Ok(FieldClass::Float),
        DeclaredType::DateTime => Ok(FieldClass::DateTime),
        DeclaredType::String | DeclaredType::Identifier => Ok(FieldClass::Text),
        DeclaredType::Bool | DeclaredType::Object | DeclaredType::Collection => {
            Err(TranslateError::UnsupportedFieldType(declared))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_widths_collapse() {
        for ty in [
            DeclaredType::Int8,
            DeclaredType::Int16,
            DeclaredType::Int32,
            DeclaredType::Int64,
            DeclaredType::UInt8,
            DeclaredType::UInt16,
            DeclaredType::UInt32,
            DeclaredType::UInt64,
        ] {
            assert_eq!(classify(ty).unwrap(), FieldClass::Integer, "{ty:?}");
        }
    }

    #[test]
    fn test_float_and_decimal_collapse() {
        for ty in [DeclaredType::Float32, DeclaredType::Float64, DeclaredType::Decimal] {
            assert_eq!(classify(ty).unwrap(), FieldClass::Float);
        }
        assert_eq!(classify(DeclaredType::DateTime).unwrap(), FieldClass::DateTime);
        assert_eq!(classify(DeclaredType::String).unwrap(), FieldClass::Text);
    }

    #[test]
    fn test_unqueryable_types_fail() {
        for ty in [DeclaredType::Bool, DeclaredType::Object, DeclaredType::Collection] {
            assert!(matches!(classify(ty), Err(TranslateError::UnsupportedFieldType(t)) if t == ty));
        }
    }
}
