//! # Target Shapes
//!
//! A `TargetShape` describes the kind of destination a field is decoded into.
//! It is the third component of a registry lookup key, next to the type OID
//! and the wire format. Registries use it to refuse pairings that make no
//! sense (a `uuid` column into an integer cell) before any bytes are read.
//!
//! | Shape | Destination |
//! |-------|-------------|
//! | `Value` | Generic `Value` cell, accepts anything |
//! | `Bool` | `bool` |
//! | `Int` | `i16` / `i32` / `i64` |
//! | `Float` | `f32` / `f64` |
//! | `Text` | `String` |
//! | `Bytes` | `Vec<u8>` |
//! | `Uuid` | `[u8; 16]` |
//! | `Composite` | A `CompositeIndexScanner` addressed by field index |

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetShape {
    Value,
    Bool,
    Int,
    Float,
    Text,
    Bytes,
    Uuid,
    Composite,
}

impl TargetShape {
    pub fn name(&self) -> &'static str {
        match self {
            TargetShape::Value => "value",
            TargetShape::Bool => "bool",
            TargetShape::Int => "integer",
            TargetShape::Float => "float",
            TargetShape::Text => "text",
            TargetShape::Bytes => "bytes",
            TargetShape::Uuid => "uuid",
            TargetShape::Composite => "composite",
        }
    }
}

impl fmt::Display for TargetShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
