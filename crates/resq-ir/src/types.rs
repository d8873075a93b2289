//! Declared attribute types reported by the host resource graph

use serde::{Deserialize, Serialize};

/// Semantic type of a resource attribute, as declared in host metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclaredType {
    // Primitives
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Decimal,

    // Text
    String,

    // Temporal
    DateTime,

    // Identity
    Identifier,

    // Complex
    Object,
    Collection,
}
