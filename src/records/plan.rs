//! # Record Scan Plans
//!
//! The two strategies a binary record can be decoded with:
//!
//! - `CompositeIndexScanPlan` writes each field into the cell a
//!   `CompositeIndexScanner` hands out for its index. Fields without a cell
//!   are skipped, so sparse destinations work.
//! - `GenericRecordScanPlan` decodes every field into a `Value` and produces
//!   `Value::Record` in wire order.
//!
//! Both resolve each field's plan from the registry by `(field OID, binary,
//! destination shape)`. Errors from a field plan are returned untouched. Once
//! the loop ends, a structural error found by the scanner wins over any
//! successfully decoded prefix.
//!
//! ## Nesting
//!
//! Field lookups go through a `NestedRegistry`, a view of the caller's
//! registry that reports one more level of depth. A record field resolves to
//! another record plan through that view, so depth grows with every level and
//! is capped at `MAX_NESTING_DEPTH`.

use eyre::{bail, Result};

use crate::config::{BINARY_FORMAT_CODE, MAX_NESTING_DEPTH};
use crate::records::error::RecordError;
use crate::records::scanner::CompositeBinaryScanner;
use crate::records::target::ScanTarget;
use crate::registry::{Codec, ScanPlan, TypeRegistry};
use crate::types::{Oid, TargetShape, Value};

struct NestedRegistry<'r> {
    parent: &'r dyn TypeRegistry,
    depth: usize,
}

impl<'r> NestedRegistry<'r> {
    fn enter(parent: &'r dyn TypeRegistry) -> Result<Self, RecordError> {
        let depth = parent.nesting_depth() + 1;
        if depth > MAX_NESTING_DEPTH {
            tracing::debug!(depth, max = MAX_NESTING_DEPTH, "record nesting limit hit");
            return Err(RecordError::NestingTooDeep {
                depth,
                max: MAX_NESTING_DEPTH,
            });
        }
        Ok(Self { parent, depth })
    }
}

impl TypeRegistry for NestedRegistry<'_> {
    fn codec_for_oid(&self, oid: Oid) -> Option<&dyn Codec> {
        self.parent.codec_for_oid(oid)
    }

    fn nesting_depth(&self) -> usize {
        self.depth
    }
}

fn unsupported(oid: Oid, destination: TargetShape) -> RecordError {
    tracing::debug!(oid, %destination, "no scan plan for record field");
    RecordError::UnsupportedFieldType { oid, destination }
}

pub(crate) struct CompositeIndexScanPlan<'r> {
    registry: &'r dyn TypeRegistry,
}

impl<'r> CompositeIndexScanPlan<'r> {
    pub(crate) fn new(registry: &'r dyn TypeRegistry) -> Self {
        Self { registry }
    }
}

impl ScanPlan for CompositeIndexScanPlan<'_> {
    fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<()> {
        let shape = target.shape();
        let Some(sink) = target.as_composite() else {
            bail!("{} target does not expose indexed field access", shape);
        };

        let Some(src) = src else {
            return sink.scan_null();
        };

        let nested = NestedRegistry::enter(self.registry)?;
        let registry: &dyn TypeRegistry = &nested;
        let mut scanner = CompositeBinaryScanner::new(src);
        sink.begin(scanner.field_count())?;

        for (index, field) in scanner.by_ref().enumerate() {
            let Some(dest) = sink.scan_index(index) else {
                tracing::trace!(index, oid = field.oid, "record field has no destination");
                continue;
            };

            let Some(bytes) = field.payload else {
                dest.scan_null()?;
                continue;
            };

            let destination = dest.shape();
            tracing::trace!(index, oid = field.oid, len = bytes.len(), %destination, "scanning record field");
            let plan = registry
                .plan_scan(field.oid, BINARY_FORMAT_CODE, destination)
                .ok_or_else(|| unsupported(field.oid, destination))?;
            plan.scan(Some(bytes), dest)?;
        }

        scanner.finish().map_err(RecordError::from)?;
        Ok(())
    }
}

pub(crate) struct GenericRecordScanPlan<'r> {
    registry: &'r dyn TypeRegistry,
}

impl<'r> GenericRecordScanPlan<'r> {
    pub(crate) fn new(registry: &'r dyn TypeRegistry) -> Self {
        Self { registry }
    }
}

impl ScanPlan for GenericRecordScanPlan<'_> {
    fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<()> {
        let Some(src) = src else {
            return target.scan_null();
        };
        let fields = decode_fields(self.registry, src)?;
        target.scan_value(Value::Record(fields))
    }
}

/// Decodes every field of a binary record into generic values, in wire order.
/// NULL fields become `Value::Null` without consulting the registry.
pub(crate) fn decode_fields(registry: &dyn TypeRegistry, src: &[u8]) -> Result<Vec<Value>> {
    let nested = NestedRegistry::enter(registry)?;
    let registry: &dyn TypeRegistry = &nested;
    let mut scanner = CompositeBinaryScanner::new(src);
    let mut values = Vec::with_capacity(scanner.capacity_hint());

    for field in scanner.by_ref() {
        let Some(bytes) = field.payload else {
            values.push(Value::Null);
            continue;
        };

        tracing::trace!(
            index = values.len(),
            oid = field.oid,
            len = bytes.len(),
            "decoding record field"
        );
        let plan = registry
            .plan_scan(field.oid, BINARY_FORMAT_CODE, TargetShape::Value)
            .ok_or_else(|| unsupported(field.oid, TargetShape::Value))?;

        let mut cell = Value::Null;
        plan.scan(Some(bytes), &mut cell)?;
        values.push(cell);
    }

    scanner.finish().map_err(RecordError::from)?;
    Ok(values)
}
