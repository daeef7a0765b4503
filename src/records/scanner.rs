//! # CompositeBinaryScanner - Forward-Only Field Cursor
//!
//! This module provides `CompositeBinaryScanner`, a single-pass cursor over a
//! binary record buffer. Each step yields the field's type OID and a view of
//! its payload. Nothing is copied: payloads are slices of the caller's buffer.
//!
//! ## Binary Format
//!
//! ```text
//! +-------------+-----------+-------------+-----------------+-----------+-----
//! | Field Count | Field OID | Length      | Payload         | Field OID | ...
//! | (u32 BE)    | (u32 BE)  | (i32 BE)    | [u8; length]    | (u32 BE)  |
//! +-------------+-----------+-------------+-----------------+-----------+-----
//! ```
//!
//! A length of `-1` marks a NULL field and is followed by no payload. Any other
//! negative length is a structural error. There is no padding between fields.
//!
//! ## Protocol
//!
//! `advance()` must be called before each field access. It returns false once
//! `field_count()` fields have been produced or the first structural error is
//! hit; the error stays available through `error()` and `finish()`. The
//! scanner also implements `Iterator` over `FieldDescriptor`s with the same
//! stopping rule.
//!
//! Bytes after the last declared field are not inspected.

use std::iter::FusedIterator;

use zerocopy::big_endian::{I32, U32};
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

use crate::config::{FIELD_COUNT_SIZE, FIELD_HEADER_SIZE, NULL_FIELD_LENGTH};
use crate::records::error::StructuralError;
use crate::types::Oid;

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout, Unaligned)]
struct FieldHeader {
    oid: U32,
    length: I32,
}

const _: () = assert!(std::mem::size_of::<FieldHeader>() == FIELD_HEADER_SIZE);
const _: () = assert!(std::mem::size_of::<U32>() == FIELD_COUNT_SIZE);

/// One field as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor<'a> {
    pub oid: Oid,
    pub length: i32,
    /// `None` for NULL, otherwise exactly `length` bytes.
    pub payload: Option<&'a [u8]>,
}

impl FieldDescriptor<'_> {
    pub fn is_null(&self) -> bool {
        self.payload.is_none()
    }
}

#[derive(Debug)]
pub struct CompositeBinaryScanner<'a> {
    src: &'a [u8],
    pos: usize,
    field_count: u32,
    fields_read: u32,
    current: Option<FieldDescriptor<'a>>,
    err: Option<StructuralError>,
}

impl<'a> CompositeBinaryScanner<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        match U32::read_from_prefix(src) {
            Ok((count, _)) => Self {
                src,
                pos: FIELD_COUNT_SIZE,
                field_count: count.get(),
                fields_read: 0,
                current: None,
                err: None,
            },
            Err(_) => {
                tracing::debug!(len = src.len(), "record buffer shorter than field count");
                Self {
                    src,
                    pos: src.len(),
                    field_count: 0,
                    fields_read: 0,
                    current: None,
                    err: Some(StructuralError::TruncatedHeader { len: src.len() }),
                }
            }
        }
    }

    /// Parses the next field. Returns false when all declared fields have been
    /// read or the buffer turned out to be malformed.
    pub fn advance(&mut self) -> bool {
        self.current = None;
        if self.err.is_some() || self.fields_read >= self.field_count {
            return false;
        }

        let index = self.fields_read;
        let src: &'a [u8] = self.src;
        let rest = &src[self.pos..];

        let Ok((header, body)) = FieldHeader::read_from_prefix(rest) else {
            return self.fail(StructuralError::TruncatedField {
                index,
                needed: FIELD_HEADER_SIZE,
                available: rest.len(),
            });
        };

        let oid = header.oid.get();
        let length = header.length.get();

        let payload = if length == NULL_FIELD_LENGTH {
            None
        } else if length < 0 {
            return self.fail(StructuralError::InvalidLength { index, length });
        } else {
            let len = length as usize;
            if len > body.len() {
                return self.fail(StructuralError::FieldOverrun {
                    index,
                    length,
                    available: body.len(),
                });
            }
            Some(&body[..len])
        };

        self.pos += FIELD_HEADER_SIZE + payload.map_or(0, <[u8]>::len);
        self.fields_read += 1;
        self.current = Some(FieldDescriptor {
            oid,
            length,
            payload,
        });
        true
    }

    fn fail(&mut self, err: StructuralError) -> bool {
        tracing::debug!(error = %err, "malformed binary record");
        self.err = Some(err);
        false
    }

    /// OID of the current field, or 0 before the first successful `advance()`.
    pub fn oid(&self) -> Oid {
        self.current.map_or(0, |field| field.oid)
    }

    /// Payload of the current field. `None` for NULL.
    pub fn bytes(&self) -> Option<&'a [u8]> {
        self.current.and_then(|field| field.payload)
    }

    pub fn current(&self) -> Option<FieldDescriptor<'a>> {
        self.current
    }

    pub fn field_count(&self) -> u32 {
        self.field_count
    }

    pub fn fields_read(&self) -> u32 {
        self.fields_read
    }

    pub fn error(&self) -> Option<&StructuralError> {
        self.err.as_ref()
    }

    /// Upper bound on how many more fields the buffer can physically hold,
    /// clamped by the declared count. Used to size result vectors without
    /// trusting the header.
    pub fn capacity_hint(&self) -> usize {
        let declared = (self.field_count - self.fields_read) as usize;
        let physical = (self.src.len() - self.pos) / FIELD_HEADER_SIZE;
        declared.min(physical)
    }

    /// Consumes the scanner and reports the first structural error, if any.
    pub fn finish(self) -> Result<(), StructuralError> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<'a> Iterator for CompositeBinaryScanner<'a> {
    type Item = FieldDescriptor<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.advance() {
            self.current
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.err.is_some() {
            return (0, Some(0));
        }
        (0, Some((self.field_count - self.fields_read) as usize))
    }
}

impl FusedIterator for CompositeBinaryScanner<'_> {}
