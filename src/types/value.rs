//! # Generic Decoded Values
//!
//! This module provides `Value`, the heap-owned result of decoding a field
//! when the caller did not name a destination type. It is what a record
//! decodes to through the generic path: `Value::Record` holding one `Value`
//! per field, in wire order.
//!
//! ## Value Variants
//!
//! | Variant | Rust Type | Source type |
//! |---------|-----------|-------------|
//! | Null | - | any NULL field |
//! | Bool | bool | bool |
//! | Int2 | i16 | int2 |
//! | Int4 | i32 | int4 |
//! | Int8 | i64 | int8 |
//! | Oid | u32 | oid |
//! | Float4 | f32 | float4 |
//! | Float8 | f64 | float8 |
//! | Text | String | text, varchar, name |
//! | Bytea | Vec<u8> | bytea |
//! | Uuid | [u8; 16] | uuid |
//! | Date | i32 | date (days since 2000-01-01) |
//! | Timestamp | i64 | timestamp (micros since 2000-01-01) |
//! | Timestamptz | i64 | timestamptz (micros since 2000-01-01 UTC) |
//! | Record | Vec<Value> | record and other composites |
//!
//! Values are owned rather than borrowed from the wire buffer: a generic
//! decode hands the whole tree back to the caller after the buffer may have
//! been recycled.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Oid(u32),
    Float4(f32),
    Float8(f64),
    Text(String),
    Bytea(Vec<u8>),
    Uuid([u8; 16]),
    Date(i32),
    Timestamp(i64),
    Timestamptz(i64),
    Record(Vec<Value>),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the variant, used in conversion error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int2(_) => "int2",
            Value::Int4(_) => "int4",
            Value::Int8(_) => "int8",
            Value::Oid(_) => "oid",
            Value::Float4(_) => "float4",
            Value::Float8(_) => "float8",
            Value::Text(_) => "text",
            Value::Bytea(_) => "bytea",
            Value::Uuid(_) => "uuid",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::Timestamptz(_) => "timestamptz",
            Value::Record(_) => "record",
        }
    }

    /// Widens any integer-like variant to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int2(v) => Some(*v as i64),
            Value::Int4(v) => Some(*v as i64),
            Value::Int8(v) => Some(*v),
            Value::Oid(v) => Some(*v as i64),
            Value::Date(v) => Some(*v as i64),
            Value::Timestamp(v) | Value::Timestamptz(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float4(v) => Some(*v as f64),
            Value::Float8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytea(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&[Value]> {
        match self {
            Value::Record(fields) => Some(fields.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => f.write_str(if *b { "t" } else { "f" }),
            Value::Int2(v) => write!(f, "{}", v),
            Value::Int4(v) => write!(f, "{}", v),
            Value::Int8(v) => write!(f, "{}", v),
            Value::Oid(v) => write!(f, "{}", v),
            Value::Float4(v) => write!(f, "{}", v),
            Value::Float8(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Bytea(b) => {
                f.write_str("\\x")?;
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            Value::Uuid(u) => {
                for (i, byte) in u.iter().enumerate() {
                    if matches!(i, 4 | 6 | 8 | 10) {
                        f.write_str("-")?;
                    }
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            Value::Date(d) => write!(f, "date:{}", d),
            Value::Timestamp(ts) => write!(f, "ts:{}", ts),
            Value::Timestamptz(ts) => write!(f, "tstz:{}", ts),
            Value::Record(fields) => {
                f.write_str("(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !field.is_null() {
                        write!(f, "{}", field)?;
                    }
                }
                f.write_str(")")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int2(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int4(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int8(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float4(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float8(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytea(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_i64_widens_integer_variants() {
        assert_eq!(Value::Int2(-3).as_i64(), Some(-3));
        assert_eq!(Value::Int4(70_000).as_i64(), Some(70_000));
        assert_eq!(Value::Oid(u32::MAX).as_i64(), Some(u32::MAX as i64));
        assert_eq!(Value::Text("1".into()).as_i64(), None);
    }

    #[test]
    fn record_display_leaves_null_fields_empty() {
        let v = Value::Record(vec![Value::Int4(1), Value::Null, Value::from("x")]);
        assert_eq!(v.to_string(), "(1,,x)");
    }

    #[test]
    fn uuid_display_is_hyphenated() {
        let v = Value::Uuid([
            0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0, 0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc,
            0xde, 0xf0,
        ]);
        assert_eq!(v.to_string(), "12345678-9abc-def0-1234-56789abcdef0");
    }

    #[test]
    fn option_none_converts_to_null() {
        let v: Value = Option::<i32>::None.into();
        assert!(v.is_null());
        let v: Value = Some(5i32).into();
        assert_eq!(v, Value::Int4(5));
    }
}
