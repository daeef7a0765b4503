//! # Type Registry
//!
//! The registry maps a type OID to the codec that knows its wire formats. A
//! codec does not decode directly: given the lookup key
//! `(oid, format, target shape)` it produces a *plan* that does, or declines.
//! Declining is not an error; the caller decides what a missing plan means.
//!
//! ```text
//! TypeRegistry::plan_scan(oid, format, shape)
//!       │
//!       ├─> codec_for_oid(oid) ── None ──> no plan
//!       │
//!       └─> Codec::plan_scan(registry, oid, format, shape)
//!                 │
//!                 └─> Box<dyn ScanPlan> ── scan(bytes, target)
//! ```
//!
//! Codecs receive the registry they were found in, so a codec for a container
//! type (records) resolves its element types through the same lookup. That is
//! all it takes for records nested in records to decode.
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `Codec` | Per-type planning: formats, scan plans, encode plans |
//! | `ScanPlan` | Decodes one value into a `ScanTarget` |
//! | `EncodePlan` | Encodes one `Value` into wire bytes |
//! | `TypeRegistry` | OID -> codec lookup, injected per call |
//! | `TypeMap` | Hash-map registry, pre-populated with built-in types |
//!
//! ## Thread Safety
//!
//! Codecs are `Send + Sync` and `TypeMap` is immutable during lookups, so a
//! single map can serve concurrent decodes without locking.

pub mod builtin;


use std::fmt;
use std::sync::Arc;

use eyre::Result;
use hashbrown::HashMap;

use crate::config::FormatCode;
use crate::records::error::RecordError;
use crate::records::target::ScanTarget;
use crate::types::{Oid, TargetShape, Value};

pub use builtin::{register_builtins, ScalarCodec, ScalarError};

/// A resolved decode strategy for one type, format, and target shape.
pub trait ScanPlan {
    /// Decodes `src` into `target`. `None` is SQL NULL.
    fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<()>;
}

/// A resolved encode strategy for one type and format.
pub trait EncodePlan {
    /// Appends the wire form of `value` to `buf`. Returns true if the value
    /// is NULL, in which case nothing is written.
    fn encode(&self, value: &Value, buf: &mut Vec<u8>) -> Result<bool>;
}

pub trait Codec: Send + Sync {
    fn format_supported(&self, format: FormatCode) -> bool;

    fn preferred_format(&self) -> FormatCode;

    fn plan_encode<'a>(
        &'a self,
        registry: &'a dyn TypeRegistry,
        oid: Oid,
        format: FormatCode,
        value: &Value,
    ) -> Option<Box<dyn EncodePlan + 'a>>;

    fn plan_scan<'a>(
        &'a self,
        registry: &'a dyn TypeRegistry,
        oid: Oid,
        format: FormatCode,
        shape: TargetShape,
    ) -> Option<Box<dyn ScanPlan + 'a>>;

    /// Decodes `src` into a generic `Value`.
    fn decode_value(
        &self,
        registry: &dyn TypeRegistry,
        oid: Oid,
        format: FormatCode,
        src: Option<&[u8]>,
    ) -> Result<Value> {
        let Some(src) = src else {
            return Ok(Value::Null);
        };

        if !self.format_supported(format) {
            return Err(RecordError::UnsupportedFormat { format }.into());
        }

        let plan = self
            .plan_scan(registry, oid, format, TargetShape::Value)
            .ok_or(RecordError::UnsupportedFieldType {
                oid,
                destination: TargetShape::Value,
            })?;

        let mut value = Value::Null;
        plan.scan(Some(src), &mut value)?;
        Ok(value)
    }
}

/// OID to codec lookup.
pub trait TypeRegistry {
    fn codec_for_oid(&self, oid: Oid) -> Option<&dyn Codec>;

    /// How many records deep the current lookup is. Plain registries are at
    /// the top level; record plans hand nested lookups a deeper view.
    fn nesting_depth(&self) -> usize {
        0
    }
}

impl dyn TypeRegistry + '_ {
    pub fn plan_scan(
        &self,
        oid: Oid,
        format: FormatCode,
        shape: TargetShape,
    ) -> Option<Box<dyn ScanPlan + '_>> {
        self.codec_for_oid(oid)?.plan_scan(self, oid, format, shape)
    }

    pub fn plan_encode(
        &self,
        oid: Oid,
        format: FormatCode,
        value: &Value,
    ) -> Option<Box<dyn EncodePlan + '_>> {
        self.codec_for_oid(oid)?
            .plan_encode(self, oid, format, value)
    }
}

/// A registered type.
#[derive(Clone)]
pub struct PgType {
    pub name: String,
    pub oid: Oid,
    pub codec: Arc<dyn Codec>,
}

impl fmt::Debug for PgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgType")
            .field("name", &self.name)
            .field("oid", &self.oid)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    by_oid: HashMap<Oid, PgType>,
    by_name: HashMap<String, Oid>,
}

impl TypeMap {
    /// Creates a map holding the built-in scalar types and `record`.
    pub fn new() -> Self {
        let mut map = Self::empty();
        register_builtins(&mut map);
        map
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers `codec` for `oid`, replacing any previous registration of
    /// either the OID or the name.
    pub fn register(&mut self, oid: Oid, name: impl Into<String>, codec: Arc<dyn Codec>) {
        let name = name.into();
        if let Some(previous) = self.by_oid.remove(&oid) {
            self.by_name.remove(&previous.name);
        }
        if let Some(previous_oid) = self.by_name.insert(name.clone(), oid) {
            if previous_oid != oid {
                self.by_oid.remove(&previous_oid);
            }
        }
        tracing::trace!(oid, name = %name, "registered type");
        self.by_oid.insert(oid, PgType { name, oid, codec });
    }

    pub fn type_for_oid(&self, oid: Oid) -> Option<&PgType> {
        self.by_oid.get(&oid)
    }

    pub fn type_for_name(&self, name: &str) -> Option<&PgType> {
        self.by_name.get(name).and_then(|oid| self.by_oid.get(oid))
    }

    pub fn len(&self) -> usize {
        self.by_oid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_oid.is_empty()
    }

    pub fn as_registry(&self) -> &dyn TypeRegistry {
        self
    }

    /// Decodes a standalone value of type `oid`.
    pub fn decode_value(&self, oid: Oid, format: FormatCode, src: Option<&[u8]>) -> Result<Value> {
        let codec = self
            .codec_for_oid(oid)
            .ok_or(RecordError::UnsupportedFieldType {
                oid,
                destination: TargetShape::Value,
            })?;
        codec.decode_value(self, oid, format, src)
    }

    /// Encodes `value` as type `oid`. Returns true if the value was NULL and
    /// nothing was written.
    pub fn encode_value(
        &self,
        oid: Oid,
        format: FormatCode,
        value: &Value,
        buf: &mut Vec<u8>,
    ) -> Result<bool> {
        let plan = self
            .as_registry()
            .plan_encode(oid, format, value)
            .ok_or_else(|| eyre::eyre!("unable to encode {} as OID {}", value.type_name(), oid))?;
        plan.encode(value, buf)
    }
}

impl TypeRegistry for TypeMap {
    fn codec_for_oid(&self, oid: Oid) -> Option<&dyn Codec> {
        self.by_oid.get(&oid).map(|t| t.codec.as_ref())
    }
}
