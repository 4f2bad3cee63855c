//! A compact tagged binary format.
//!
//! A user type value is encoded as
//!
//! ```text
//! [type id] [version id] ( [index] [tag] [payload] )* [-1]
//! ```
//!
//! Integers (type ids, version ids, indices, lengths, `i32`/`i64` payloads)
//! are zig-zag LEB128 packed. `f64` payloads are 8 little-endian bytes.
//! Strings and binaries carry a packed length followed by their bytes.
//! A nested user type payload is itself a complete user type encoding.

mod reader;
mod writer;

pub use reader::BufferReader;
pub use writer::BufferWriter;

use alloc::vec::Vec;

use crate::error::PofError;

// -----------------------------------------------------------------------------
// Tag

/// The type tag preceding every property payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    Null = 0,
    Bool = 1,
    Int32 = 2,
    Int64 = 3,
    Float64 = 4,
    String = 5,
    Binary = 6,
    UserType = 7,
}

impl Tag {
    /// Decodes a tag byte.
    pub const fn from_u8(byte: u8) -> Option<Tag> {
        match byte {
            0 => Some(Tag::Null),
            1 => Some(Tag::Bool),
            2 => Some(Tag::Int32),
            3 => Some(Tag::Int64),
            4 => Some(Tag::Float64),
            5 => Some(Tag::String),
            6 => Some(Tag::Binary),
            7 => Some(Tag::UserType),
            _ => None,
        }
    }

    /// A short name, used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Tag::Null => "null",
            Tag::Bool => "bool",
            Tag::Int32 => "i32",
            Tag::Int64 => "i64",
            Tag::Float64 => "f64",
            Tag::String => "string",
            Tag::Binary => "binary",
            Tag::UserType => "user type",
        }
    }
}

/// Marks the end of a user type's properties.
const TERMINATOR: i32 = -1;

// -----------------------------------------------------------------------------
// Packed integers

pub(crate) fn write_packed_i64(out: &mut Vec<u8>, value: i64) {
    let mut bits = ((value << 1) ^ (value >> 63)) as u64;
    loop {
        let byte = (bits & 0x7F) as u8;
        bits >>= 7;
        if bits == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

#[inline]
pub(crate) fn write_packed_i32(out: &mut Vec<u8>, value: i32) {
    write_packed_i64(out, i64::from(value));
}

pub(crate) fn read_packed_i64(buf: &[u8], pos: &mut usize) -> Result<i64, PofError> {
    let start = *pos;
    let mut bits: u64 = 0;
    let mut shift = 0_u32;
    loop {
        let byte = *buf.get(*pos).ok_or(PofError::UnexpectedEof(*pos))?;
        *pos += 1;
        if shift >= 64 {
            return Err(PofError::Overflow(start));
        }
        bits |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }
    Ok(((bits >> 1) as i64) ^ -((bits & 1) as i64))
}

pub(crate) fn read_packed_i32(buf: &[u8], pos: &mut usize) -> Result<i32, PofError> {
    let start = *pos;
    let value = read_packed_i64(buf, pos)?;
    i32::try_from(value).map_err(|_| PofError::Overflow(start))
}

/// Returns `buf[*pos..*pos + len]` and advances `pos` past it.
pub(crate) fn take<'a>(buf: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8], PofError> {
    let end = pos
        .checked_add(len)
        .filter(|end| *end <= buf.len())
        .ok_or(PofError::UnexpectedEof(buf.len()))?;
    let bytes = &buf[*pos..end];
    *pos = end;
    Ok(bytes)
}

pub(crate) fn read_length(buf: &[u8], pos: &mut usize) -> Result<usize, PofError> {
    let start = *pos;
    let len = read_packed_i32(buf, pos)?;
    usize::try_from(len).map_err(|_| PofError::Overflow(start))
}

// -----------------------------------------------------------------------------
// Skipping

/// Advances `pos` over one payload of the given tag.
pub(crate) fn skip_payload(buf: &[u8], pos: &mut usize, tag: Tag) -> Result<(), PofError> {
    match tag {
        Tag::Null => {}
        Tag::Bool => {
            take(buf, pos, 1)?;
        }
        Tag::Int32 | Tag::Int64 => {
            read_packed_i64(buf, pos)?;
        }
        Tag::Float64 => {
            take(buf, pos, 8)?;
        }
        Tag::String | Tag::Binary => {
            let len = read_length(buf, pos)?;
            take(buf, pos, len)?;
        }
        Tag::UserType => {
            read_packed_i32(buf, pos)?;
            read_packed_i32(buf, pos)?;
            skip_properties(buf, pos)?;
        }
    }
    Ok(())
}

/// Advances `pos` over `[index][tag][payload]` entries up to and including
/// the terminator.
pub(crate) fn skip_properties(buf: &[u8], pos: &mut usize) -> Result<(), PofError> {
    loop {
        let index = read_packed_i32(buf, pos)?;
        if index == TERMINATOR {
            return Ok(());
        }
        let tag = read_tag(buf, pos)?;
        skip_payload(buf, pos, tag)?;
    }
}

pub(crate) fn read_tag(buf: &[u8], pos: &mut usize) -> Result<Tag, PofError> {
    let offset = *pos;
    let byte = *buf.get(offset).ok_or(PofError::UnexpectedEof(offset))?;
    *pos += 1;
    Tag::from_u8(byte).ok_or(PofError::InvalidTag { tag: byte, offset })
}

// -----------------------------------------------------------------------------
// Tests
