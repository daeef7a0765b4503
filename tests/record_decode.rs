//! # Record Decoding Integration Tests
//!
//! End-to-end decoding of binary record buffers through the public API:
//!
//! - Generic decoding into `Value::Record`
//! - Index-addressed decoding into caller-defined rows
//! - Malformed buffers, unknown types, and unsupported formats
//! - Custom codecs registered next to the built-in catalog
//! - Concurrent decodes sharing one type map
//!
//! Buffers are assembled by hand with `RecordBuilder` below, in the exact
//! layout the server sends.

use std::sync::{Arc, Barrier};
use std::thread;

use eyre::Result;
use pgrecord::registry::ScalarCodec;
use pgrecord::types::oid;
use pgrecord::{
    Codec, CompositeIndexScanner, EncodePlan, FormatCode, Oid, RecordCodec, RecordError, ScanPlan,
    ScanTarget, StructuralError, TargetShape, TypeMap, TypeRegistry, Value, ValueRow,
    BINARY_FORMAT_CODE, TEXT_FORMAT_CODE,
};

#[derive(Default)]
struct RecordBuilder {
    fields: Vec<(Oid, Option<Vec<u8>>)>,
}

impl RecordBuilder {
    fn new() -> Self {
        Self::default()
    }

    fn field(mut self, oid: Oid, payload: impl Into<Vec<u8>>) -> Self {
        self.fields.push((oid, Some(payload.into())));
        self
    }

    fn null(mut self, oid: Oid) -> Self {
        self.fields.push((oid, None));
        self
    }

    fn build(&self) -> Vec<u8> {
        self.build_with_count(self.fields.len() as u32)
    }

    fn build_with_count(&self, count: u32) -> Vec<u8> {
        let mut buf = count.to_be_bytes().to_vec();
        for (oid, payload) in &self.fields {
            buf.extend_from_slice(&oid.to_be_bytes());
            match payload {
                Some(bytes) => {
                    buf.extend_from_slice(&(bytes.len() as i32).to_be_bytes());
                    buf.extend_from_slice(bytes);
                }
                None => buf.extend_from_slice(&(-1i32).to_be_bytes()),
            }
        }
        buf
    }
}

fn decode(types: &TypeMap, src: &[u8]) -> Result<Value> {
    RecordCodec.decode_value(types, oid::RECORD, BINARY_FORMAT_CODE, Some(src))
}

fn record_error(err: &eyre::Report) -> &RecordError {
    err.downcast_ref::<RecordError>()
        .unwrap_or_else(|| panic!("expected RecordError, got: {err:?}"))
}

mod generic_tests {
    use super::*;

    #[test]
    fn int_and_null_text_fields() {
        let types = TypeMap::new();
        let src = RecordBuilder::new()
            .field(oid::INT4, 1i32.to_be_bytes())
            .null(oid::TEXT)
            .build();

        assert_eq!(src.len(), 4 + 12 + 8);
        assert_eq!(
            decode(&types, &src).unwrap(),
            Value::Record(vec![Value::Int4(1), Value::Null])
        );
    }

    #[test]
    fn empty_record_decodes_to_empty_fields() {
        let types = TypeMap::new();
        let src = RecordBuilder::new().build();

        assert_eq!(decode(&types, &src).unwrap(), Value::Record(Vec::new()));
    }

    #[test]
    fn empty_record_scans_into_empty_row() {
        let types = TypeMap::new();
        let src = RecordBuilder::new().build();
        let mut row = ValueRow::new();

        RecordCodec
            .scan_into(&types, BINARY_FORMAT_CODE, Some(&src[..]), &mut row)
            .unwrap();

        let generic = decode(&types, &src).unwrap();
        assert!(!row.is_null());
        assert_eq!(row.fields(), generic.as_record());
    }

    #[test]
    fn mixed_catalog_row_renders_like_server_text() {
        let types = TypeMap::new();
        let src = RecordBuilder::new()
            .field(oid::INT8, 12i64.to_be_bytes())
            .field(oid::TEXT, "widget")
            .null(oid::FLOAT8)
            .field(oid::BOOL, [1u8])
            .build();

        let value = decode(&types, &src).unwrap();

        assert_eq!(value.to_string(), "(12,widget,,t)");
    }

    #[test]
    fn deeply_nested_records_decode_in_order() {
        let types = TypeMap::new();
        let innermost = RecordBuilder::new().field(oid::INT2, 3i16.to_be_bytes()).build();
        let middle = RecordBuilder::new()
            .field(oid::RECORD, innermost)
            .null(oid::RECORD)
            .build();
        let outer = RecordBuilder::new()
            .field(oid::TEXT, "top")
            .field(oid::RECORD, middle)
            .build();

        let value = decode(&types, &outer).unwrap();

        assert_eq!(
            value,
            Value::Record(vec![
                Value::from("top"),
                Value::Record(vec![Value::Record(vec![Value::Int2(3)]), Value::Null]),
            ])
        );
    }

    #[test]
    fn record_fields_match_standalone_decoding() {
        let types = TypeMap::new();
        let fields: Vec<(u32, Vec<u8>)> = vec![
            (oid::BOOL, vec![1]),
            (oid::BYTEA, vec![0, 255]),
            (oid::NAME, b"pg_class".to_vec()),
            (oid::INT8, (-3i64).to_be_bytes().to_vec()),
            (oid::INT2, 17i16.to_be_bytes().to_vec()),
            (oid::INT4, i32::MAX.to_be_bytes().to_vec()),
            (oid::TEXT, b"abc".to_vec()),
            (oid::OID, 2249u32.to_be_bytes().to_vec()),
            (oid::FLOAT4, 1.25f32.to_be_bytes().to_vec()),
            (oid::FLOAT8, 1e300f64.to_be_bytes().to_vec()),
            (oid::VARCHAR, b"v".to_vec()),
            (oid::DATE, 9000i32.to_be_bytes().to_vec()),
            (oid::TIMESTAMP, 5i64.to_be_bytes().to_vec()),
            (oid::TIMESTAMPTZ, (-5i64).to_be_bytes().to_vec()),
            (oid::UUID, vec![0xab; 16]),
        ];
        let src = fields
            .iter()
            .fold(RecordBuilder::new(), |record, (oid, payload)| {
                record.field(*oid, payload.clone())
            })
            .build();

        let value = decode(&types, &src).unwrap();
        let decoded = value.as_record().unwrap();

        assert_eq!(decoded.len(), fields.len());
        for ((oid, payload), field) in fields.iter().zip(decoded) {
            let standalone = types
                .decode_value(*oid, BINARY_FORMAT_CODE, Some(&payload[..]))
                .unwrap();
            assert_eq!(field, &standalone, "OID {}", oid);
        }
    }

    #[test]
    fn unknown_field_type_names_the_oid() {
        let types = TypeMap::new();
        let src = RecordBuilder::new().field(99_999, [1u8, 2, 3]).build();

        let err = decode(&types, &src).unwrap_err();

        assert_eq!(
            record_error(&err),
            &RecordError::UnsupportedFieldType {
                oid: 99_999,
                destination: TargetShape::Value,
            }
        );
        assert!(err.to_string().contains("OID 99999"));
    }

    #[test]
    fn unknown_null_field_is_not_looked_up() {
        let types = TypeMap::new();
        let src = RecordBuilder::new().null(99_999).build();

        assert_eq!(
            decode(&types, &src).unwrap(),
            Value::Record(vec![Value::Null])
        );
    }
}

mod malformed_tests {
    use super::*;

    #[test]
    fn declared_count_larger_than_fields() {
        let types = TypeMap::new();
        let src = RecordBuilder::new()
            .field(oid::INT4, 1i32.to_be_bytes())
            .field(oid::INT4, 2i32.to_be_bytes())
            .build_with_count(3);

        let err = decode(&types, &src).unwrap_err();

        assert!(record_error(&err).is_structural());
    }

    #[test]
    fn every_truncation_of_a_valid_record_fails_structurally() {
        let types = TypeMap::new();
        let src = RecordBuilder::new()
            .field(oid::INT4, 5i32.to_be_bytes())
            .null(oid::TEXT)
            .field(oid::TEXT, "tail")
            .build();

        for len in 0..src.len() {
            let err = decode(&types, &src[..len]).unwrap_err();
            assert!(
                record_error(&err).is_structural(),
                "prefix of {} bytes: {}",
                len,
                err
            );
        }
        assert!(decode(&types, &src).is_ok());
    }

    #[test]
    fn negative_length_other_than_null_is_rejected() {
        let types = TypeMap::new();
        let mut src = 1u32.to_be_bytes().to_vec();
        src.extend_from_slice(&oid::INT4.to_be_bytes());
        src.extend_from_slice(&(-5i32).to_be_bytes());

        let err = decode(&types, &src).unwrap_err();

        assert_eq!(
            record_error(&err),
            &RecordError::Structural(StructuralError::InvalidLength {
                index: 0,
                length: -5
            })
        );
    }

    #[test]
    fn huge_declared_count_does_not_allocate_for_it() {
        let types = TypeMap::new();
        let src = RecordBuilder::new()
            .field(oid::BOOL, [0u8])
            .build_with_count(u32::MAX);

        let err = decode(&types, &src).unwrap_err();

        assert!(record_error(&err).is_structural());
    }

    #[test]
    fn text_format_is_rejected() {
        let types = TypeMap::new();

        let err = RecordCodec
            .decode_value(&types, oid::RECORD, TEXT_FORMAT_CODE, Some(&b"(1,)"[..]))
            .unwrap_err();

        assert_eq!(
            record_error(&err),
            &RecordError::UnsupportedFormat {
                format: TEXT_FORMAT_CODE
            }
        );
    }
}

mod indexed_tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Order {
        id: Option<i64>,
        customer: Option<String>,
        total: Option<f64>,
        paid: Option<bool>,
    }

    impl CompositeIndexScanner for Order {
        fn scan_null(&mut self) -> Result<()> {
            eyre::bail!("order row cannot be null")
        }

        fn scan_index(&mut self, index: usize) -> Option<&mut dyn ScanTarget> {
            match index {
                0 => Some(&mut self.id),
                1 => Some(&mut self.customer),
                2 => Some(&mut self.total),
                3 => Some(&mut self.paid),
                _ => None,
            }
        }
    }

    #[test]
    fn typed_row_widens_narrow_wire_types() {
        let types = TypeMap::new();
        let src = RecordBuilder::new()
            .field(oid::INT4, 1001i32.to_be_bytes())
            .field(oid::VARCHAR, "acme")
            .field(oid::FLOAT4, 19.5f32.to_be_bytes())
            .field(oid::BOOL, [1u8])
            .build();
        let mut order = Order::default();

        RecordCodec
            .scan_into(&types, BINARY_FORMAT_CODE, Some(&src[..]), &mut order)
            .unwrap();

        assert_eq!(order.id, Some(1001));
        assert_eq!(order.customer.as_deref(), Some("acme"));
        assert_eq!(order.total, Some(19.5));
        assert_eq!(order.paid, Some(true));
    }

    #[test]
    fn typed_row_tolerates_extra_trailing_fields() {
        let types = TypeMap::new();
        let src = RecordBuilder::new()
            .field(oid::INT8, 7i64.to_be_bytes())
            .null(oid::TEXT)
            .null(oid::FLOAT8)
            .field(oid::BOOL, [0u8])
            .field(oid::UUID, [9u8; 16])
            .build();
        let mut order = Order::default();

        RecordCodec
            .scan_into(&types, BINARY_FORMAT_CODE, Some(&src[..]), &mut order)
            .unwrap();

        assert_eq!(order.id, Some(7));
        assert_eq!(order.customer, None);
        assert_eq!(order.paid, Some(false));
    }

    #[test]
    fn typed_row_rejects_incompatible_field() {
        let types = TypeMap::new();
        let src = RecordBuilder::new().field(oid::UUID, [0u8; 16]).build();
        let mut order = Order::default();

        let err = RecordCodec
            .scan_into(&types, BINARY_FORMAT_CODE, Some(&src[..]), &mut order)
            .unwrap_err();

        assert_eq!(
            record_error(&err),
            &RecordError::UnsupportedFieldType {
                oid: oid::UUID,
                destination: TargetShape::Int,
            }
        );
    }

    #[test]
    fn null_record_goes_to_row_null_path() {
        let types = TypeMap::new();
        let mut order = Order::default();

        let err = RecordCodec
            .scan_into(&types, BINARY_FORMAT_CODE, None, &mut order)
            .unwrap_err();
        assert!(err.to_string().contains("cannot be null"));

        let mut row = ValueRow::new();
        RecordCodec
            .scan_into(&types, BINARY_FORMAT_CODE, None, &mut row)
            .unwrap();
        assert!(row.is_null());
    }

    #[test]
    fn value_row_matches_generic_decode() {
        let types = TypeMap::new();
        let src = RecordBuilder::new()
            .field(oid::DATE, 100i32.to_be_bytes())
            .null(oid::INT4)
            .field(oid::BYTEA, vec![0xcau8, 0xfe])
            .build();
        let mut row = ValueRow::new();

        RecordCodec
            .scan_into(&types, BINARY_FORMAT_CODE, Some(&src[..]), &mut row)
            .unwrap();

        let generic = decode(&types, &src).unwrap();
        assert_eq!(row.fields(), generic.as_record());
    }
}

mod custom_codec_tests {
    use super::*;

    /// Decodes a big-endian i32 as its decimal text, for any shape that can
    /// hold text.
    struct DecimalTextCodec;

    struct DecimalTextPlan;

    impl ScanPlan for DecimalTextPlan {
        fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<()> {
            let Some(src) = src else {
                return target.scan_null();
            };
            let bytes: [u8; 4] = src
                .try_into()
                .map_err(|_| eyre::eyre!("expected 4 bytes, got {}", src.len()))?;
            target.scan_value(Value::Text(i32::from_be_bytes(bytes).to_string()))
        }
    }

    impl Codec for DecimalTextCodec {
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
            _format: FormatCode,
            _value: &Value,
        ) -> Option<Box<dyn EncodePlan + 'a>> {
            None
        }

        fn plan_scan<'a>(
            &'a self,
            _registry: &'a dyn TypeRegistry,
            _oid: Oid,
            format: FormatCode,
            shape: TargetShape,
        ) -> Option<Box<dyn ScanPlan + 'a>> {
            match (format, shape) {
                (BINARY_FORMAT_CODE, TargetShape::Text | TargetShape::Value) => {
                    Some(Box::new(DecimalTextPlan))
                }
                _ => None,
            }
        }
    }

    #[test]
    fn replacing_a_builtin_changes_record_decoding() {
        let mut types = TypeMap::new();
        types.register(oid::INT4, "int4", Arc::new(DecimalTextCodec));
        let src = RecordBuilder::new()
            .field(oid::INT4, (-12i32).to_be_bytes())
            .build();

        assert_eq!(
            decode(&types, &src).unwrap(),
            Value::Record(vec![Value::from("-12")])
        );
    }

    #[test]
    fn custom_type_decodes_inside_record() {
        let mut types = TypeMap::new();
        types.register(60_001, "money_text", Arc::new(DecimalTextCodec));
        types.register(60_002, "short", Arc::new(ScalarCodec::INT2));
        let src = RecordBuilder::new()
            .field(60_001, 250i32.to_be_bytes())
            .field(60_002, 8i16.to_be_bytes())
            .build();

        assert_eq!(
            decode(&types, &src).unwrap(),
            Value::Record(vec![Value::from("250"), Value::Int2(8)])
        );
    }

    #[test]
    fn record_without_catalog_needs_only_record_codec() {
        let mut types = TypeMap::empty();
        types.register(oid::RECORD, "record", Arc::new(RecordCodec));
        let inner = RecordBuilder::new().null(oid::INT4).build();
        let src = RecordBuilder::new().field(oid::RECORD, inner).build();

        assert_eq!(
            decode(&types, &src).unwrap(),
            Value::Record(vec![Value::Record(vec![Value::Null])])
        );
    }
}

mod concurrency_tests {
    use super::*;

    #[test]
    fn shared_type_map_serves_parallel_decodes() {
        let types = Arc::new(TypeMap::new());
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let types = Arc::clone(&types);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..200i32 {
                        let src = RecordBuilder::new()
                            .field(oid::INT4, (t as i32 * 1000 + i).to_be_bytes())
                            .field(oid::TEXT, format!("t{}", t))
                            .build();
                        let value = decode(&types, &src).unwrap();
                        assert_eq!(
                            value,
                            Value::Record(vec![
                                Value::Int4(t as i32 * 1000 + i),
                                Value::Text(format!("t{}", t)),
                            ])
                        );
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
