//! # pgrecord Configuration Constants
//!
//! All numeric configuration for the decoder lives here. The binary record
//! layout is fixed by the producing server, so most of these values are not
//! tunable; they are named so the scanner and its tests agree on them.
//!
//! ## Dependency Graph
//!
//! ```text
//! FIELD_COUNT_SIZE (4 bytes)
//!       │
//!       └─> Every buffer begins with a big-endian u32 field count
//!
//! FIELD_OID_SIZE (4) + FIELD_LENGTH_SIZE (4)
//!       │
//!       └─> FIELD_HEADER_SIZE (8, derived)
//!             Minimum bytes consumed per field, used to bound the
//!             capacity allocated for a declared field count
//!
//! NULL_FIELD_LENGTH (-1)
//!       │
//!       └─> The only negative length accepted; any other is a
//!           structural error
//!
//! MAX_NESTING_DEPTH (16)
//!       │
//!       └─> Records nested inside records through the type registry
//! ```
//!
//! ## Critical Invariants
//!
//! 1. `FIELD_HEADER_SIZE == FIELD_OID_SIZE + FIELD_LENGTH_SIZE`
//! 2. `NULL_FIELD_LENGTH < 0`
//! 3. `TEXT_FORMAT_CODE != BINARY_FORMAT_CODE`

// ============================================================================
// FORMAT CODES
// Wire format codes as carried by the frontend/backend protocol
// ============================================================================

/// Wire format code type. Codes other than the two below are possible on the
/// wire and must be rejected rather than assumed.
pub type FormatCode = i16;

/// Textual representation. Record values in this format carry no per-field
/// type information and cannot be decoded.
pub const TEXT_FORMAT_CODE: FormatCode = 0;

/// Self-describing binary representation.
pub const BINARY_FORMAT_CODE: FormatCode = 1;

const _: () = assert!(
    TEXT_FORMAT_CODE != BINARY_FORMAT_CODE,
    "format codes must be distinct"
);

// ============================================================================
// RECORD LAYOUT
// Sizes of the fixed parts of a binary record value
// ============================================================================

/// Size of the big-endian field count at the start of every record.
pub const FIELD_COUNT_SIZE: usize = 4;

/// Size of the big-endian type OID preceding each field.
pub const FIELD_OID_SIZE: usize = 4;

/// Size of the big-endian signed payload length preceding each field.
pub const FIELD_LENGTH_SIZE: usize = 4;

/// Per-field header: OID followed by length.
pub const FIELD_HEADER_SIZE: usize = FIELD_OID_SIZE + FIELD_LENGTH_SIZE;

/// Length value marking a SQL NULL field. No payload bytes follow it.
pub const NULL_FIELD_LENGTH: i32 = -1;

const _: () = assert!(
    FIELD_HEADER_SIZE == FIELD_OID_SIZE + FIELD_LENGTH_SIZE,
    "FIELD_HEADER_SIZE derivation mismatch"
);

const _: () = assert!(NULL_FIELD_LENGTH < 0, "null sentinel must be negative");

// ============================================================================
// LIMITS
// ============================================================================

/// Maximum depth of records nested inside records. Matches the nesting limit
/// used for composite views in storage.
pub const MAX_NESTING_DEPTH: usize = 16;
