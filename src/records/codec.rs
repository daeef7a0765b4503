//! # RecordCodec - Binary Record Entry Point
//!
//! `RecordCodec` handles the generic `record` type produced by `ROW(...)`
//! expressions, and any composite type registered with it, since composites
//! share the record wire layout.
//!
//! ## Formats
//!
//! Only the binary format can be decoded. The text output of a record, such
//! as `(1,abc,)`, carries no field types, so there is no way to tell which
//! decoder each field needs. This is a permanent limitation of the format.
//!
//! Encoding is never planned: the server does not accept generic records as
//! input parameters.
//!
//! ## Plans
//!
//! | Format | Shape | Plan |
//! |--------|-------|------|
//! | binary | `Composite` | index-addressed scan into a `CompositeIndexScanner` |
//! | binary | `Value` | generic decode into `Value::Record` |
//! | anything else | any | none |
//!
//! ## Usage
//!
//! ```ignore
//! let types = TypeMap::new();
//! let value = RecordCodec.decode_value(&types, oid::RECORD, BINARY_FORMAT_CODE, Some(&bytes))?;
//! assert_eq!(value, Value::Record(vec![Value::Int4(1), Value::Null]));
//! ```

use eyre::Result;

use crate::config::{FormatCode, BINARY_FORMAT_CODE};
use crate::records::error::RecordError;
use crate::records::plan::{self, CompositeIndexScanPlan, GenericRecordScanPlan};
use crate::records::target::{CompositeIndexScanner, CompositeTarget};
use crate::registry::{Codec, EncodePlan, ScanPlan, TypeRegistry};
use crate::types::{oid, Oid, TargetShape, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordCodec;

impl RecordCodec {
    /// Scans a record into an index-addressed sink. A NULL record is passed
    /// to the sink's null path without looking at `format`.
    ///
    /// On error the sink may hold fields decoded before the failure and
    /// should be discarded.
    pub fn scan_into(
        &self,
        registry: &dyn TypeRegistry,
        format: FormatCode,
        src: Option<&[u8]>,
        sink: &mut dyn CompositeIndexScanner,
    ) -> Result<()> {
        let Some(src) = src else {
            return sink.scan_null();
        };

        let plan = self
            .plan_scan(registry, oid::RECORD, format, TargetShape::Composite)
            .ok_or_else(|| unsupported_format(format))?;
        plan.scan(Some(src), &mut CompositeTarget(sink))
    }

    /// Decodes the fields of a binary record into generic values.
    pub fn decode_fields(&self, registry: &dyn TypeRegistry, src: &[u8]) -> Result<Vec<Value>> {
        plan::decode_fields(registry, src)
    }
}

fn unsupported_format(format: FormatCode) -> RecordError {
    tracing::debug!(format, "record requested in unsupported format");
    RecordError::UnsupportedFormat { format }
}

impl Codec for RecordCodec {
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
        registry: &'a dyn TypeRegistry,
        _oid: Oid,
        format: FormatCode,
        shape: TargetShape,
    ) -> Option<Box<dyn ScanPlan + 'a>> {
        if format != BINARY_FORMAT_CODE {
            return None;
        }

        match shape {
            TargetShape::Composite => Some(Box::new(CompositeIndexScanPlan::new(registry))),
            TargetShape::Value => Some(Box::new(GenericRecordScanPlan::new(registry))),
            _ => None,
        }
    }

    fn decode_value(
        &self,
        registry: &dyn TypeRegistry,
        _oid: Oid,
        format: FormatCode,
        src: Option<&[u8]>,
    ) -> Result<Value> {
        let Some(src) = src else {
            return Ok(Value::Null);
        };

        if format != BINARY_FORMAT_CODE {
            return Err(unsupported_format(format).into());
        }

        Ok(Value::Record(plan::decode_fields(registry, src)?))
    }
}
