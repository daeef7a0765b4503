//! # Binary Record Decoding
//!
//! This module decodes record (composite) values sent in the binary wire
//! format. Field types are not known in advance: every field carries its own
//! type OID, and the decoder asks a `TypeRegistry` how to decode each one.
//!
//! ## Record Binary Layout
//!
//! ```text
//! +------------------+------------------+------------------+------------------+
//! | Field Count      | Field OID        | Field Length     | Field Payload    |
//! | (u32 BE)         | (u32 BE)         | (i32 BE, -1=NULL)| [u8; length]     |
//! +------------------+------------------+------------------+------------------+
//!                    |<------------- repeated field_count times ------------->|
//! ```
//!
//! ## Decode Flow
//!
//! ```text
//! RecordCodec::plan_scan(shape)
//!       │
//!       ├─ Composite ─> CompositeIndexScanPlan ─┐
//!       │                                      ├─> CompositeBinaryScanner
//!       └─ Value ─────> GenericRecordScanPlan ─┘        │
//!                                                       ▼
//!                                   registry.plan_scan(field oid, binary, cell shape)
//!                                                       │
//!                                                       ▼
//!                                           field plan scans payload into cell
//! ```
//!
//! ## Design Goals
//!
//! 1. **Zero-copy scanning**: field payloads are slices of the input buffer
//! 2. **No reflection**: the registry and the destination shape are explicit
//! 3. **All or nothing**: a malformed buffer fails the whole decode, even if
//!    the fields before the damage decoded fine
//! 4. **Sparse destinations**: a sink may decline fields it has no cell for
//!
//! ## Module Structure
//!
//! - `scanner`: `CompositeBinaryScanner` and `FieldDescriptor`
//! - `target`: `ScanTarget`, `CompositeIndexScanner`, and provided cells
//! - `plan`: index-addressed and generic record scan plans
//! - `codec`: `RecordCodec`, the entry point
//! - `error`: `StructuralError` and `RecordError`

pub mod codec;
pub mod error;
mod plan;
pub mod scanner;
pub mod target;


pub use codec::RecordCodec;
pub use error::{RecordError, StructuralError};
pub use scanner::{CompositeBinaryScanner, FieldDescriptor};
pub use target::{CompositeIndexScanner, CompositeTarget, FromValue, ScanTarget, ValueRow};
