//! # Built-in Type Catalog
//!
//! Binary-format codecs for the scalar types most records carry, plus the
//! `record` pseudo-type itself. The record core does not depend on anything
//! in here; it only sees the `TypeRegistry` trait.
//!
//! | OID | Type | Value | Shapes besides `Value` |
//! |-----|------|-------|------------------------|
//! | 16 | bool | Bool | Bool |
//! | 17 | bytea | Bytea | Bytes |
//! | 19 | name | Text | Text |
//! | 20 | int8 | Int8 | Int |
//! | 21 | int2 | Int2 | Int |
//! | 23 | int4 | Int4 | Int |
//! | 25 | text | Text | Text |
//! | 26 | oid | Oid | Int |
//! | 700 | float4 | Float4 | Float |
//! | 701 | float8 | Float8 | Float |
//! | 1043 | varchar | Text | Text |
//! | 1082 | date | Date | Int |
//! | 1114 | timestamp | Timestamp | Int |
//! | 1184 | timestamptz | Timestamptz | Int |
//! | 2249 | record | Record | Composite |
//! | 2950 | uuid | Uuid | Uuid |
//!
//! All integers and floats are big-endian on the wire. Fixed-width types
//! reject payloads of any other length.

use std::fmt;
use std::sync::Arc;

use eyre::Result;

use super::{Codec, EncodePlan, ScanPlan, TypeMap, TypeRegistry};
use crate::config::{FormatCode, BINARY_FORMAT_CODE};
use crate::records::codec::RecordCodec;
use crate::records::target::ScanTarget;
use crate::types::{oid, Oid, TargetShape, Value};

/// Payload errors from the built-in scalar codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarError {
    InvalidLength {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },
    InvalidUtf8 {
        type_name: &'static str,
    },
    Mismatch {
        type_name: &'static str,
        value: &'static str,
    },
}

impl fmt::Display for ScalarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarError::InvalidLength {
                type_name,
                expected,
                actual,
            } => write!(
                f,
                "invalid length for {}: expected {} bytes, got {}",
                type_name, expected, actual
            ),
            ScalarError::InvalidUtf8 { type_name } => {
                write!(f, "invalid UTF-8 in {} value", type_name)
            }
            ScalarError::Mismatch { type_name, value } => {
                write!(f, "cannot encode {} value as {}", value, type_name)
            }
        }
    }
}

impl std::error::Error for ScalarError {}

type DecodeFn = fn(&'static str, &[u8]) -> Result<Value, ScalarError>;
type EncodeFn = fn(&'static str, &Value, &mut Vec<u8>) -> Result<(), ScalarError>;

/// Codec for a fixed scalar type in binary format.
#[derive(Clone, Copy)]
pub struct ScalarCodec {
    type_name: &'static str,
    shape: TargetShape,
    decode: DecodeFn,
    encode: EncodeFn,
}

impl fmt::Debug for ScalarCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarCodec")
            .field("type_name", &self.type_name)
            .field("shape", &self.shape)
            .finish()
    }
}

impl ScalarCodec {
    pub const BOOL: Self = Self::new("bool", TargetShape::Bool, decode_bool, encode_bool);
    pub const BYTEA: Self = Self::new("bytea", TargetShape::Bytes, decode_bytea, encode_bytea);
    pub const INT2: Self = Self::new("int2", TargetShape::Int, decode_int2, encode_int2);
    pub const INT4: Self = Self::new("int4", TargetShape::Int, decode_int4, encode_int4);
    pub const INT8: Self = Self::new("int8", TargetShape::Int, decode_int8, encode_int8);
    pub const OID: Self = Self::new("oid", TargetShape::Int, decode_oid, encode_oid);
    pub const FLOAT4: Self = Self::new("float4", TargetShape::Float, decode_float4, encode_float4);
    pub const FLOAT8: Self = Self::new("float8", TargetShape::Float, decode_float8, encode_float8);
    pub const TEXT: Self = Self::new("text", TargetShape::Text, decode_text, encode_text);
    pub const DATE: Self = Self::new("date", TargetShape::Int, decode_date, encode_date);
    pub const TIMESTAMP: Self = Self::new(
        "timestamp",
        TargetShape::Int,
        decode_timestamp,
        encode_timestamp,
    );
    pub const TIMESTAMPTZ: Self = Self::new(
        "timestamptz",
        TargetShape::Int,
        decode_timestamptz,
        encode_timestamptz,
    );
    pub const UUID: Self = Self::new("uuid", TargetShape::Uuid, decode_uuid, encode_uuid);

    pub const fn new(
        type_name: &'static str,
        shape: TargetShape,
        decode: DecodeFn,
        encode: EncodeFn,
    ) -> Self {
        Self {
            type_name,
            shape,
            decode,
            encode,
        }
    }

    /// Like `TEXT` but reporting a different type name in errors.
    pub const fn text_named(type_name: &'static str) -> Self {
        Self::new(type_name, TargetShape::Text, decode_text, encode_text)
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn serves(&self, shape: TargetShape) -> bool {
        shape == TargetShape::Value || shape == self.shape
    }
}

impl Codec for ScalarCodec {
    fn format_supported(&self, format: FormatCode) -> bool {
        format == BINARY_FORMAT_CODE
    }

    fn preferred_format(&self) -> FormatCode {
        BINARY_FORMAT_CODE
    }

    fn plan_encode<'a>(
        &'a self,
        _registry: &'a dyn TypeRegistry,
        _oid: Oid,
        format: FormatCode,
        _value: &Value,
    ) -> Option<Box<dyn EncodePlan + 'a>> {
        if format != BINARY_FORMAT_CODE {
            return None;
        }
        Some(Box::new(ScalarEncodePlan { codec: self }))
    }

    fn plan_scan<'a>(
        &'a self,
        _registry: &'a dyn TypeRegistry,
        _oid: Oid,
        format: FormatCode,
        shape: TargetShape,
    ) -> Option<Box<dyn ScanPlan + 'a>> {
        if format != BINARY_FORMAT_CODE || !self.serves(shape) {
            return None;
        }
        Some(Box::new(ScalarScanPlan { codec: self }))
    }
}

struct ScalarScanPlan<'c> {
    codec: &'c ScalarCodec,
}

impl ScanPlan for ScalarScanPlan<'_> {
    fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<()> {
        match src {
            None => target.scan_null(),
            Some(src) => {
                let value = (self.codec.decode)(self.codec.type_name, src)?;
                target.scan_value(value)
            }
        }
    }
}

struct ScalarEncodePlan<'c> {
    codec: &'c ScalarCodec,
}

impl EncodePlan for ScalarEncodePlan<'_> {
    fn encode(&self, value: &Value, buf: &mut Vec<u8>) -> Result<bool> {
        if value.is_null() {
            return Ok(true);
        }
        (self.codec.encode)(self.codec.type_name, value, buf)?;
        Ok(false)
    }
}

/// Registers every built-in type into `map`.
pub fn register_builtins(map: &mut TypeMap) {
    let scalars: [(Oid, &str, ScalarCodec); 15] = [
        (oid::BOOL, "bool", ScalarCodec::BOOL),
        (oid::BYTEA, "bytea", ScalarCodec::BYTEA),
        (oid::NAME, "name", ScalarCodec::text_named("name")),
        (oid::INT8, "int8", ScalarCodec::INT8),
        (oid::INT2, "int2", ScalarCodec::INT2),
        (oid::INT4, "int4", ScalarCodec::INT4),
        (oid::TEXT, "text", ScalarCodec::TEXT),
        (oid::OID, "oid", ScalarCodec::OID),
        (oid::FLOAT4, "float4", ScalarCodec::FLOAT4),
        (oid::FLOAT8, "float8", ScalarCodec::FLOAT8),
        (oid::VARCHAR, "varchar", ScalarCodec::text_named("varchar")),
        (oid::DATE, "date", ScalarCodec::DATE),
        (oid::TIMESTAMP, "timestamp", ScalarCodec::TIMESTAMP),
        (oid::TIMESTAMPTZ, "timestamptz", ScalarCodec::TIMESTAMPTZ),
        (oid::UUID, "uuid", ScalarCodec::UUID),
    ];

    for (type_oid, name, codec) in scalars {
        map.register(type_oid, name, Arc::new(codec));
    }
    map.register(oid::RECORD, "record", Arc::new(RecordCodec));
}

fn fixed<const N: usize>(type_name: &'static str, src: &[u8]) -> Result<[u8; N], ScalarError> {
    src.try_into().map_err(|_| ScalarError::InvalidLength {
        type_name,
        expected: N,
        actual: src.len(),
    })
}

fn mismatch(type_name: &'static str, value: &Value) -> ScalarError {
    ScalarError::Mismatch {
        type_name,
        value: value.type_name(),
    }
}

fn decode_bool(type_name: &'static str, src: &[u8]) -> Result<Value, ScalarError> {
    let [b] = fixed::<1>(type_name, src)?;
    Ok(Value::Bool(b != 0))
}

fn encode_bool(type_name: &'static str, value: &Value, buf: &mut Vec<u8>) -> Result<(), ScalarError> {
    match value {
        Value::Bool(b) => buf.push(*b as u8),
        other => return Err(mismatch(type_name, other)),
    }
    Ok(())
}

fn decode_bytea(_type_name: &'static str, src: &[u8]) -> Result<Value, ScalarError> {
    Ok(Value::Bytea(src.to_vec()))
}

fn encode_bytea(type_name: &'static str, value: &Value, buf: &mut Vec<u8>) -> Result<(), ScalarError> {
    match value {
        Value::Bytea(b) => buf.extend_from_slice(b),
        other => return Err(mismatch(type_name, other)),
    }
    Ok(())
}

fn decode_text(type_name: &'static str, src: &[u8]) -> Result<Value, ScalarError> {
    let s = std::str::from_utf8(src).map_err(|_| ScalarError::InvalidUtf8 { type_name })?;
    Ok(Value::Text(s.to_string()))
}

fn encode_text(type_name: &'static str, value: &Value, buf: &mut Vec<u8>) -> Result<(), ScalarError> {
    match value {
        Value::Text(s) => buf.extend_from_slice(s.as_bytes()),
        other => return Err(mismatch(type_name, other)),
    }
    Ok(())
}

fn decode_uuid(type_name: &'static str, src: &[u8]) -> Result<Value, ScalarError> {
    Ok(Value::Uuid(fixed::<16>(type_name, src)?))
}

fn encode_uuid(type_name: &'static str, value: &Value, buf: &mut Vec<u8>) -> Result<(), ScalarError> {
    match value {
        Value::Uuid(u) => buf.extend_from_slice(u),
        other => return Err(mismatch(type_name, other)),
    }
    Ok(())
}

/// Generates a big-endian decoder/encoder pair for a numeric variant.
macro_rules! be_scalar {
    ($decode:ident, $encode:ident, $variant:ident, $ty:ty) => {
        fn $decode(type_name: &'static str, src: &[u8]) -> Result<Value, ScalarError> {
            let bytes = fixed::<{ std::mem::size_of::<$ty>() }>(type_name, src)?;
            Ok(Value::$variant(<$ty>::from_be_bytes(bytes)))
        }

        fn $encode(
            type_name: &'static str,
            value: &Value,
            buf: &mut Vec<u8>,
        ) -> Result<(), ScalarError> {
            match value {
                Value::$variant(v) => buf.extend_from_slice(&v.to_be_bytes()),
                other => return Err(mismatch(type_name, other)),
            }
            Ok(())
        }
    };
}

be_scalar!(decode_int2, encode_int2, Int2, i16);
be_scalar!(decode_int4, encode_int4, Int4, i32);
be_scalar!(decode_int8, encode_int8, Int8, i64);
be_scalar!(decode_oid, encode_oid, Oid, u32);
be_scalar!(decode_float4, encode_float4, Float4, f32);
be_scalar!(decode_float8, encode_float8, Float8, f64);
be_scalar!(decode_date, encode_date, Date, i32);
be_scalar!(decode_timestamp, encode_timestamp, Timestamp, i64);
be_scalar!(decode_timestamptz, encode_timestamptz, Timestamptz, i64);
