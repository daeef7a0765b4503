//! # Runtime Type Vocabulary
//!
//! This module provides the types shared between the record scanner, the type
//! registry, and callers.
//!
//! ## Module Structure
//!
//! - `oid`: Well-known PostgreSQL type OIDs
//! - `shape`: `TargetShape`, the destination kind used as part of a registry key
//! - `value`: `Value`, the loosely typed result of generic decoding
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `Oid` | Runtime type identifier carried on the wire |
//! | `TargetShape` | What kind of cell a decoded field is written into |
//! | `Value` | Heap-owned decoded value, including nested records |
//!
//! ## Usage
//!
//! ```ignore
//! use pgrecord::types::{oid, TargetShape, Value};
//!
//! let v = Value::Int4(42);
//! assert_eq!(v.type_name(), "int4");
//! assert_eq!(TargetShape::Int.name(), "integer");
//! assert_eq!(oid::INT4, 23);
//! ```

pub mod oid;
mod shape;
mod value;

pub use oid::Oid;
pub use shape::TargetShape;
pub use value::Value;
