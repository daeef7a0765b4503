//! # pgrecord - Binary Record Decoding with Runtime Type Resolution
//!
//! pgrecord decodes PostgreSQL record (composite) values sent in the binary
//! wire format. A record is self-describing per field: every field carries
//! the OID of its type. The decoder looks each OID up in a type registry the
//! caller supplies and runs the plan it returns, recursing naturally into
//! records nested inside records.
//!
//! - **Zero-copy scanning**: field payloads are views into the input buffer
//! - **Explicit capabilities**: the registry is a parameter, never global
//! - **Typed failures**: structural, unsupported-type, and unsupported-format
//!   errors can be told apart with `downcast_ref::<RecordError>()`
//!
//! ## Quick Start
//!
//! ```ignore
//! use pgrecord::{Codec, RecordCodec, TypeMap, Value, BINARY_FORMAT_CODE};
//! use pgrecord::types::oid;
//!
//! let types = TypeMap::new();
//!
//! // SELECT ROW(1, NULL::text) in binary format
//! let bytes = [
//!     0, 0, 0, 2,
//!     0, 0, 0, 23, 0, 0, 0, 4, 0, 0, 0, 1,
//!     0, 0, 0, 25, 0xff, 0xff, 0xff, 0xff,
//! ];
//!
//! let value = RecordCodec.decode_value(&types, oid::RECORD, BINARY_FORMAT_CODE, Some(&bytes))?;
//! assert_eq!(value, Value::Record(vec![Value::Int4(1), Value::Null]));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │       RecordCodec (entry point)      │
//! ├─────────────────────────────────────┤
//! │   Record scan plans (indexed/generic)│
//! ├──────────────────┬──────────────────┤
//! │ Field scanner    │  Type registry   │
//! │ (wire cursor)    │  (OID -> codec)  │
//! ├──────────────────┴──────────────────┤
//! │    Scan targets and generic values   │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`]: Format codes, wire sizes, nesting limit
//! - [`types`]: `Value`, `TargetShape`, well-known OIDs
//! - [`records`]: Scanner, scan targets, record plans, `RecordCodec`
//! - [`registry`]: `Codec`, `TypeRegistry`, `TypeMap`, built-in scalar codecs
//!
//! ## Logging
//!
//! The crate emits `tracing` events at `trace` level per field and at `debug`
//! level when a decode is rejected. It never installs a subscriber.

pub mod config;
pub mod records;
pub mod registry;
pub mod types;

pub use config::{FormatCode, BINARY_FORMAT_CODE, TEXT_FORMAT_CODE};
pub use records::{
    CompositeBinaryScanner, CompositeIndexScanner, CompositeTarget, FieldDescriptor, FromValue,
    RecordCodec, RecordError, ScanTarget, StructuralError, ValueRow,
};
pub use registry::{Codec, EncodePlan, PgType, ScanPlan, TypeMap, TypeRegistry};
pub use types::{Oid, TargetShape, Value};
