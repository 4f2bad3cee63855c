use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use super::{Tag, TERMINATOR};
use super::{read_length, read_packed_i32, read_packed_i64, read_tag, skip_payload, take};
use crate::context::PofContext;
use crate::error::PofError;
use crate::stream::PofReader;

// -----------------------------------------------------------------------------
// BufferReader

/// A [`PofReader`] over the tagged binary format.
///
/// Nested user types are read by a child reader sharing the same input;
/// the parent resumes after the child's terminator.
pub struct BufferReader<'a> {
    context: &'a PofContext,
    buf: &'a [u8],
    pos: usize,
    type_id: i32,
    version_id: i32,
    last_index: i32,
    exhausted: bool,
}

impl<'a> BufferReader<'a> {
    /// Opens the user type value encoded at the start of `buf`.
    pub fn new(context: &'a PofContext, buf: &'a [u8]) -> Result<Self, PofError> {
        Self::at(context, buf, 0)
    }

    fn at(context: &'a PofContext, buf: &'a [u8], mut pos: usize) -> Result<Self, PofError> {
        let type_id = read_packed_i32(buf, &mut pos)?;
        let version_id = read_packed_i32(buf, &mut pos)?;
        Ok(Self {
            context,
            buf,
            pos,
            type_id,
            version_id,
            last_index: -1,
            exhausted: false,
        })
    }

    /// Skips every unread property and the terminator, returning the offset
    /// just past this value.
    pub fn finish(mut self) -> Result<usize, PofError> {
        if !self.exhausted {
            self.consume_remaining()?;
        }
        Ok(self.pos)
    }

    /// Consumes properties up to and including the terminator, returning
    /// the byte range of the properties.
    fn consume_remaining(&mut self) -> Result<(usize, usize), PofError> {
        let start = self.pos;
        loop {
            let (index, header) = self.peek_index()?;
            if index == TERMINATOR {
                let end = self.pos;
                self.pos += header;
                self.exhausted = true;
                self.last_index = i32::MAX;
                return Ok((start, end));
            }
            self.skip_property()?;
        }
    }

    /// Reads the next property index without consuming it, returning it
    /// with its encoded length.
    fn peek_index(&self) -> Result<(i32, usize), PofError> {
        let mut pos = self.pos;
        let index = read_packed_i32(self.buf, &mut pos)?;
        Ok((index, pos - self.pos))
    }

    fn skip_property(&mut self) -> Result<(), PofError> {
        read_packed_i32(self.buf, &mut self.pos)?;
        let tag = read_tag(self.buf, &mut self.pos)?;
        skip_payload(self.buf, &mut self.pos, tag)
    }

    /// Skips properties below `index` and peeks at the tag of `index` if
    /// present.
    fn locate(&mut self, index: i32) -> Result<Option<Tag>, PofError> {
        if index <= self.last_index {
            return Err(PofError::PropertyOrder {
                previous: self.last_index,
                requested: index,
            });
        }
        loop {
            let (next, header) = self.peek_index()?;
            if next == TERMINATOR || next > index {
                return Ok(None);
            }
            if next < index {
                self.skip_property()?;
                continue;
            }
            let mut pos = self.pos + header;
            return read_tag(self.buf, &mut pos).map(Some);
        }
    }

    /// Like [`locate`](Self::locate), but also consumes the property header.
    fn enter(&mut self, index: i32) -> Result<Option<Tag>, PofError> {
        let tag = self.locate(index)?;
        self.last_index = index;
        if tag.is_some() {
            read_packed_i32(self.buf, &mut self.pos)?;
            self.pos += 1;
        }
        Ok(tag)
    }

    fn read_user_type(&mut self) -> Result<Box<dyn Any>, PofError> {
        let context = self.context;
        let mut nested = BufferReader::at(context, self.buf, self.pos)?;
        let user_type = context.user_type(nested.type_id)?;
        let value = user_type.serializer().deserialize(&mut nested)?;
        self.pos = nested.finish()?;
        Ok(value)
    }

    fn read_str(&mut self) -> Result<String, PofError> {
        let len = read_length(self.buf, &mut self.pos)?;
        let offset = self.pos;
        let bytes = take(self.buf, &mut self.pos, len)?;
        core::str::from_utf8(bytes)
            .map(String::from)
            .map_err(|_| PofError::InvalidUtf8(offset))
    }

    fn read_bytes(&mut self) -> Result<Vec<u8>, PofError> {
        let len = read_length(self.buf, &mut self.pos)?;
        take(self.buf, &mut self.pos, len).map(<[u8]>::to_vec)
    }

    /// Skips the payload of a property with an unexpected tag.
    fn reject<T>(&mut self, index: i32, expected: &'static str, tag: Tag) -> Result<T, PofError> {
        skip_payload(self.buf, &mut self.pos, tag)?;
        Err(mismatch(index, expected, tag))
    }

    fn read_f64_payload(&mut self) -> Result<f64, PofError> {
        let bytes = take(self.buf, &mut self.pos, 8)?;
        let mut raw = [0_u8; 8];
        raw.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(raw))
    }
}

#[inline(never)]
#[cold]
fn mismatch(index: i32, expected: &'static str, actual: Tag) -> PofError {
    PofError::TypeMismatch {
        index,
        expected,
        actual: actual.name(),
    }
}

impl PofReader for BufferReader<'_> {
    #[inline]
    fn context(&self) -> &PofContext {
        self.context
    }

    #[inline]
    fn user_type_id(&self) -> i32 {
        self.type_id
    }

    #[inline]
    fn version_id(&self) -> i32 {
        self.version_id
    }

    fn read_null(&mut self, index: i32) -> Result<bool, PofError> {
        match self.locate(index)? {
            None | Some(Tag::Null) => {
                self.enter(index)?;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    fn read_bool(&mut self, index: i32) -> Result<bool, PofError> {
        match self.enter(index)? {
            None | Some(Tag::Null) => Ok(false),
            Some(Tag::Bool) => Ok(take(self.buf, &mut self.pos, 1)?[0] != 0),
            Some(tag) => self.reject(index, "bool", tag),
        }
    }

    fn read_i32(&mut self, index: i32) -> Result<i32, PofError> {
        match self.enter(index)? {
            None | Some(Tag::Null) => Ok(0),
            Some(Tag::Int32) => read_packed_i32(self.buf, &mut self.pos),
            Some(tag) => self.reject(index, "i32", tag),
        }
    }

    fn read_i64(&mut self, index: i32) -> Result<i64, PofError> {
        match self.enter(index)? {
            None | Some(Tag::Null) => Ok(0),
            Some(Tag::Int32 | Tag::Int64) => read_packed_i64(self.buf, &mut self.pos),
            Some(tag) => self.reject(index, "i64", tag),
        }
    }

    fn read_f64(&mut self, index: i32) -> Result<f64, PofError> {
        match self.enter(index)? {
            None | Some(Tag::Null) => Ok(0.0),
            Some(Tag::Float64) => self.read_f64_payload(),
            Some(tag) => self.reject(index, "f64", tag),
        }
    }

    fn read_string(&mut self, index: i32) -> Result<String, PofError> {
        match self.enter(index)? {
            None | Some(Tag::Null) => Ok(String::new()),
            Some(Tag::String) => self.read_str(),
            Some(tag) => self.reject(index, "string", tag),
        }
    }

    fn read_binary(&mut self, index: i32) -> Result<Vec<u8>, PofError> {
        match self.enter(index)? {
            None | Some(Tag::Null) => Ok(Vec::new()),
            Some(Tag::Binary) => self.read_bytes(),
            Some(tag) => self.reject(index, "binary", tag),
        }
    }

    fn read_object(&mut self, index: i32) -> Result<Option<Box<dyn Any>>, PofError> {
        let value: Box<dyn Any> = match self.enter(index)? {
            None | Some(Tag::Null) => return Ok(None),
            Some(Tag::Bool) => Box::new(take(self.buf, &mut self.pos, 1)?[0] != 0),
            Some(Tag::Int32) => Box::new(read_packed_i32(self.buf, &mut self.pos)?),
            Some(Tag::Int64) => Box::new(read_packed_i64(self.buf, &mut self.pos)?),
            Some(Tag::Float64) => Box::new(self.read_f64_payload()?),
            Some(Tag::String) => Box::new(self.read_str()?),
            Some(Tag::Binary) => Box::new(self.read_bytes()?),
            Some(Tag::UserType) => self.read_user_type()?,
        };
        Ok(Some(value))
    }

    fn read_remainder(&mut self) -> Result<Option<Vec<u8>>, PofError> {
        if self.exhausted {
            return Ok(None);
        }
        let (start, end) = self.consume_remaining()?;
        if start == end {
            return Ok(None);
        }
        Ok(Some(self.buf[start..end].to_vec()))
    }
}
