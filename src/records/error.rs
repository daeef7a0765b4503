//! # Record Decoding Errors
//!
//! Most failures in this crate are reported as `eyre::Report`. The conditions
//! below are the ones callers are expected to branch on, so they are concrete
//! error types. They travel inside the report and are recovered with
//! `report.downcast_ref::<RecordError>()`.
//!
//! | Error | Meaning | Retry? |
//! |-------|---------|--------|
//! | `StructuralError` | Buffer is truncated or declares an invalid length | Never |
//! | `UnsupportedFieldType` | Registry has no plan for a field OID + shape | With another shape |
//! | `UnsupportedFormat` | Record was not sent in the binary format | Never |
//! | `NestingTooDeep` | Records nested beyond `MAX_NESTING_DEPTH` | Never |

use std::fmt;

use crate::config::FormatCode;
use crate::types::{Oid, TargetShape};

/// The record buffer is not well formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralError {
    /// Fewer than four bytes, so the field count is missing.
    TruncatedHeader { len: usize },
    /// The buffer ends where the header of field `index` should start.
    TruncatedField {
        index: u32,
        needed: usize,
        available: usize,
    },
    /// Field `index` declares a negative length other than the null marker.
    InvalidLength { index: u32, length: i32 },
    /// Field `index` declares more payload bytes than remain in the buffer.
    FieldOverrun {
        index: u32,
        length: i32,
        available: usize,
    },
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralError::TruncatedHeader { len } => write!(
                f,
                "record too short for field count: {} bytes, need 4",
                len
            ),
            StructuralError::TruncatedField {
                index,
                needed,
                available,
            } => write!(
                f,
                "record truncated at field {}: need {} header bytes, {} available",
                index, needed, available
            ),
            StructuralError::InvalidLength { index, length } => {
                write!(f, "record field {} has invalid length {}", index, length)
            }
            StructuralError::FieldOverrun {
                index,
                length,
                available,
            } => write!(
                f,
                "record field {} length {} overruns buffer ({} bytes available)",
                index, length, available
            ),
        }
    }
}

impl std::error::Error for StructuralError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    Structural(StructuralError),
    UnsupportedFieldType { oid: Oid, destination: TargetShape },
    UnsupportedFormat { format: FormatCode },
    NestingTooDeep { depth: usize, max: usize },
}

impl RecordError {
    pub fn is_structural(&self) -> bool {
        matches!(self, RecordError::Structural(_))
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Structural(e) => write!(f, "malformed binary record: {}", e),
            RecordError::UnsupportedFieldType { oid, destination } => write!(
                f,
                "unable to scan OID {} in binary format into {}",
                oid, destination
            ),
            RecordError::UnsupportedFormat { format } => {
                write!(f, "record cannot be decoded from format code {}", format)
            }
            RecordError::NestingTooDeep { depth, max } => write!(
                f,
                "record nesting depth {} exceeds maximum {}",
                depth, max
            ),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordError::Structural(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StructuralError> for RecordError {
    fn from(e: StructuralError) -> Self {
        RecordError::Structural(e)
    }
}
