//! Well-known type OIDs.
//!
//! These are the fixed identifiers assigned by the server's bootstrap catalog.
//! User-defined types get OIDs at runtime and are registered by callers.

/// Runtime type identifier.
pub type Oid = u32;

pub const BOOL: Oid = 16;
pub const BYTEA: Oid = 17;
pub const NAME: Oid = 19;
pub const INT8: Oid = 20;
pub const INT2: Oid = 21;
pub const INT4: Oid = 23;
pub const TEXT: Oid = 25;
pub const OID: Oid = 26;
pub const FLOAT4: Oid = 700;
pub const FLOAT8: Oid = 701;
pub const VARCHAR: Oid = 1043;
pub const DATE: Oid = 1082;
pub const TIMESTAMP: Oid = 1114;
pub const TIMESTAMPTZ: Oid = 1184;
/// Pseudo-type of anonymous row values such as `ROW(1, 'a')`.
pub const RECORD: Oid = 2249;
pub const UUID: Oid = 2950;
