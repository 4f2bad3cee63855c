use alloc::vec::Vec;
use core::any::Any;

use super::{Tag, TERMINATOR, write_packed_i32, write_packed_i64};
use crate::context::PofContext;
use crate::error::PofError;
use crate::stream::PofWriter;

// -----------------------------------------------------------------------------
// BufferWriter

/// A [`PofWriter`] producing the tagged binary format into a byte buffer.
///
/// Each nested user type is written by its own `BufferWriter` and appended
/// to the parent's body once complete.
pub struct BufferWriter<'a> {
    context: &'a PofContext,
    type_id: i32,
    version_id: i32,
    body: Vec<u8>,
    last_index: i32,
    sealed: bool,
}

impl<'a> BufferWriter<'a> {
    /// Creates a writer for a value of user type `type_id`.
    pub fn new(context: &'a PofContext, type_id: i32) -> Self {
        Self {
            context,
            type_id,
            version_id: 0,
            body: Vec::new(),
            last_index: -1,
            sealed: false,
        }
    }

    /// Completes the value, returning its full encoding.
    pub fn into_bytes(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.body.len() + 8);
        self.finish_into(&mut out);
        out
    }

    fn finish_into(self, out: &mut Vec<u8>) {
        write_packed_i32(out, self.type_id);
        write_packed_i32(out, self.version_id);
        out.extend_from_slice(&self.body);
        write_packed_i32(out, TERMINATOR);
    }

    /// Validates the index and writes the property header.
    fn begin(&mut self, index: i32, tag: Tag) -> Result<(), PofError> {
        if self.sealed {
            return Err(PofError::RemainderWritten);
        }
        if index <= self.last_index {
            return Err(PofError::PropertyOrder {
                previous: self.last_index,
                requested: index,
            });
        }
        self.last_index = index;
        write_packed_i32(&mut self.body, index);
        self.body.push(tag as u8);
        Ok(())
    }

    fn write_length(&mut self, len: usize) -> Result<(), PofError> {
        let len = i32::try_from(len).map_err(|_| PofError::Overflow(self.body.len()))?;
        write_packed_i32(&mut self.body, len);
        Ok(())
    }
}

impl PofWriter for BufferWriter<'_> {
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

    #[inline]
    fn set_version_id(&mut self, version_id: i32) {
        self.version_id = version_id;
    }

    fn write_null(&mut self, index: i32) -> Result<(), PofError> {
        self.begin(index, Tag::Null)
    }

    fn write_bool(&mut self, index: i32, value: bool) -> Result<(), PofError> {
        self.begin(index, Tag::Bool)?;
        self.body.push(u8::from(value));
        Ok(())
    }

    fn write_i32(&mut self, index: i32, value: i32) -> Result<(), PofError> {
        self.begin(index, Tag::Int32)?;
        write_packed_i32(&mut self.body, value);
        Ok(())
    }

    fn write_i64(&mut self, index: i32, value: i64) -> Result<(), PofError> {
        self.begin(index, Tag::Int64)?;
        write_packed_i64(&mut self.body, value);
        Ok(())
    }

    fn write_f64(&mut self, index: i32, value: f64) -> Result<(), PofError> {
        self.begin(index, Tag::Float64)?;
        self.body.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn write_string(&mut self, index: i32, value: &str) -> Result<(), PofError> {
        self.begin(index, Tag::String)?;
        self.write_length(value.len())?;
        self.body.extend_from_slice(value.as_bytes());
        Ok(())
    }

    fn write_binary(&mut self, index: i32, value: &[u8]) -> Result<(), PofError> {
        self.begin(index, Tag::Binary)?;
        self.write_length(value.len())?;
        self.body.extend_from_slice(value);
        Ok(())
    }

    fn write_object(&mut self, index: i32, value: &dyn Any) -> Result<(), PofError> {
        let context = self.context;
        let user_type = context.user_type_of(value.type_id())?;
        self.begin(index, Tag::UserType)?;

        let mut nested = BufferWriter::new(context, user_type.type_id());
        user_type.serializer().serialize(&mut nested, value)?;
        nested.finish_into(&mut self.body);
        Ok(())
    }

    fn write_remainder(&mut self, remainder: Option<&[u8]>) -> Result<(), PofError> {
        if self.sealed {
            return Err(PofError::RemainderWritten);
        }
        self.sealed = true;
        if let Some(bytes) = remainder {
            self.body.extend_from_slice(bytes);
        }
        Ok(())
    }
}
