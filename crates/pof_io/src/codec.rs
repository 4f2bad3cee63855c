use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, type_name};
use core::fmt;
use core::marker::PhantomData;

use crate::error::PofError;
use crate::stream::{PofReader, PofWriter};
use crate::value::PofValue;

// -----------------------------------------------------------------------------
// Codec

/// Encodes and decodes one property value on a stream.
pub trait Codec: Send + Sync + fmt::Debug {
    /// Writes `value` as property `index`.
    fn encode(&self, writer: &mut dyn PofWriter, index: i32, value: &dyn Any) -> Result<(), PofError>;

    /// Reads property `index`.
    ///
    /// `None` means the stream holds no value and the property should be
    /// left as constructed.
    fn decode(&self, reader: &mut dyn PofReader, index: i32) -> Result<Option<Box<dyn Any>>, PofError>;
}

/// A shared codec handle.
pub type CodecRef = Arc<dyn Codec>;

// -----------------------------------------------------------------------------
// DefaultCodec

/// Writes any supported value by inspecting its runtime type, and reads
/// back whatever the stream holds.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCodec;

impl Codec for DefaultCodec {
    fn encode(&self, writer: &mut dyn PofWriter, index: i32, value: &dyn Any) -> Result<(), PofError> {
        if let Some(v) = value.downcast_ref::<bool>() {
            writer.write_bool(index, *v)
        } else if let Some(v) = value.downcast_ref::<i32>() {
            writer.write_i32(index, *v)
        } else if let Some(v) = value.downcast_ref::<i64>() {
            writer.write_i64(index, *v)
        } else if let Some(v) = value.downcast_ref::<f64>() {
            writer.write_f64(index, *v)
        } else if let Some(v) = value.downcast_ref::<String>() {
            writer.write_string(index, v)
        } else if let Some(v) = value.downcast_ref::<&'static str>() {
            writer.write_string(index, v)
        } else if let Some(v) = value.downcast_ref::<Vec<u8>>() {
            writer.write_binary(index, v)
        } else if value.is::<()>() {
            writer.write_null(index)
        } else {
            writer.write_object(index, value)
        }
    }

    fn decode(&self, reader: &mut dyn PofReader, index: i32) -> Result<Option<Box<dyn Any>>, PofError> {
        reader.read_object(index)
    }
}

// -----------------------------------------------------------------------------
// TypedCodec

/// A codec for values of a known [`PofValue`] type `T`.
pub struct TypedCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedCodec<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for TypedCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TypedCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedCodec<{}>", type_name::<T>())
    }
}

impl<T: PofValue> Codec for TypedCodec<T> {
    fn encode(&self, writer: &mut dyn PofWriter, index: i32, value: &dyn Any) -> Result<(), PofError> {
        let Some(value) = value.downcast_ref::<T>() else {
            return Err(PofError::ValueType {
                index,
                expected: type_name::<T>(),
            });
        };
        value.write_value(writer, index)
    }

    fn decode(&self, reader: &mut dyn PofReader, index: i32) -> Result<Option<Box<dyn Any>>, PofError> {
        let value = T::read_value(reader, index)?;
        Ok(Some(Box::new(value)))
    }
}

// -----------------------------------------------------------------------------
// Codecs

/// Codec factory.
///
/// # Examples
///
/// ```
/// use pof_io::Codecs;
///
/// let codec = Codecs::of::<Option<String>>();
/// assert!(format!("{codec:?}").contains("Option"));
/// ```
pub struct Codecs;

impl Codecs {
    /// The codec used when no specific one is configured.
    pub fn default_codec() -> CodecRef {
        Arc::new(DefaultCodec)
    }

    /// A codec bound to `T`'s natural encoding.
    pub fn of<T: PofValue>() -> CodecRef {
        Arc::new(TypedCodec::<T>::new())
    }
}
