//! Fuzz testing for registry-driven record decoding.
//!
//! Builds records from arbitrary field lists, including nested records and
//! unknown OIDs, optionally corrupts the declared field count, and decodes
//! them through both the generic and the index-addressed paths. The two paths
//! must agree whenever both succeed.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use pgrecord::types::oid;
use pgrecord::{Codec, RecordCodec, TypeMap, ValueRow, BINARY_FORMAT_CODE};

#[derive(Debug, Arbitrary)]
struct DecodeInput {
    fields: Vec<FuzzField>,
    count_delta: i8,
}

#[derive(Debug, Arbitrary)]
enum FuzzField {
    Null(FuzzType),
    Value(FuzzType, Vec<u8>),
    Nested(Vec<FuzzField>),
}

#[derive(Debug, Arbitrary, Clone, Copy)]
enum FuzzType {
    Bool,
    Int2,
    Int4,
    Int8,
    Float8,
    Text,
    Bytea,
    Uuid,
    Record,
    Unknown(u32),
}

impl FuzzType {
    fn oid(self) -> u32 {
        match self {
            FuzzType::Bool => oid::BOOL,
            FuzzType::Int2 => oid::INT2,
            FuzzType::Int4 => oid::INT4,
            FuzzType::Int8 => oid::INT8,
            FuzzType::Float8 => oid::FLOAT8,
            FuzzType::Text => oid::TEXT,
            FuzzType::Bytea => oid::BYTEA,
            FuzzType::Uuid => oid::UUID,
            FuzzType::Record => oid::RECORD,
            FuzzType::Unknown(oid) => oid,
        }
    }
}

fn encode(fields: &[FuzzField], count: u32, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&count.to_be_bytes());
    for field in fields {
        match field {
            FuzzField::Null(ty) => {
                buf.extend_from_slice(&ty.oid().to_be_bytes());
                buf.extend_from_slice(&(-1i32).to_be_bytes());
            }
            FuzzField::Value(ty, payload) => {
                buf.extend_from_slice(&ty.oid().to_be_bytes());
                buf.extend_from_slice(&(payload.len() as i32).to_be_bytes());
                buf.extend_from_slice(payload);
            }
            FuzzField::Nested(inner) => {
                let mut nested = Vec::new();
                encode(inner, inner.len() as u32, &mut nested);
                buf.extend_from_slice(&oid::RECORD.to_be_bytes());
                buf.extend_from_slice(&(nested.len() as i32).to_be_bytes());
                buf.extend_from_slice(&nested);
            }
        }
    }
}

fuzz_target!(|input: DecodeInput| {
    let count = (input.fields.len() as i64 + input.count_delta as i64).max(0) as u32;
    let mut buf = Vec::new();
    encode(&input.fields, count, &mut buf);

    let types = TypeMap::new();
    let generic = RecordCodec.decode_value(&types, oid::RECORD, BINARY_FORMAT_CODE, Some(&buf[..]));

    let mut row = ValueRow::new();
    let indexed = RecordCodec.scan_into(&types, BINARY_FORMAT_CODE, Some(&buf[..]), &mut row);

    if let (Ok(value), Ok(())) = (&generic, &indexed) {
        assert_eq!(value.as_record(), row.fields());
    }
    assert_eq!(generic.is_ok(), indexed.is_ok());
});
