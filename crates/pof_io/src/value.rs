use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, type_name};

use crate::error::PofError;
use crate::stream::{PofReader, PofWriter};

// -----------------------------------------------------------------------------
// PofValue

/// A Rust type with a natural property encoding.
///
/// Implemented for `bool`, `i32`, `i64`, `f64`, `String`, `Vec<u8>` and
/// `Option<T>`. User types registered in a [`PofContext`] implement it
/// with [`impl_user_type!`](crate::impl_user_type).
///
/// Reading an absent property yields the type's zero value; `Option<T>`
/// yields `None`.
///
/// [`PofContext`]: crate::PofContext
pub trait PofValue: Any + Sized {
    fn write_value(&self, writer: &mut dyn PofWriter, index: i32) -> Result<(), PofError>;

    fn read_value(reader: &mut dyn PofReader, index: i32) -> Result<Self, PofError>;
}

macro_rules! impl_pof_value {
    ($ty:ty, $write:ident, $read:ident) => {
        impl PofValue for $ty {
            #[inline]
            fn write_value(&self, writer: &mut dyn PofWriter, index: i32) -> Result<(), PofError> {
                writer.$write(index, *self)
            }

            #[inline]
            fn read_value(reader: &mut dyn PofReader, index: i32) -> Result<Self, PofError> {
                reader.$read(index)
            }
        }
    };
}

impl_pof_value!(bool, write_bool, read_bool);
impl_pof_value!(i32, write_i32, read_i32);
impl_pof_value!(i64, write_i64, read_i64);
impl_pof_value!(f64, write_f64, read_f64);

impl PofValue for String {
    #[inline]
    fn write_value(&self, writer: &mut dyn PofWriter, index: i32) -> Result<(), PofError> {
        writer.write_string(index, self)
    }

    #[inline]
    fn read_value(reader: &mut dyn PofReader, index: i32) -> Result<Self, PofError> {
        reader.read_string(index)
    }
}

impl PofValue for Vec<u8> {
    #[inline]
    fn write_value(&self, writer: &mut dyn PofWriter, index: i32) -> Result<(), PofError> {
        writer.write_binary(index, self)
    }

    #[inline]
    fn read_value(reader: &mut dyn PofReader, index: i32) -> Result<Self, PofError> {
        reader.read_binary(index)
    }
}

impl<T: PofValue> PofValue for Option<T> {
    fn write_value(&self, writer: &mut dyn PofWriter, index: i32) -> Result<(), PofError> {
        match self {
            Some(value) => value.write_value(writer, index),
            None => writer.write_null(index),
        }
    }

    fn read_value(reader: &mut dyn PofReader, index: i32) -> Result<Self, PofError> {
        if reader.read_null(index)? {
            return Ok(None);
        }
        T::read_value(reader, index).map(Some)
    }
}

// -----------------------------------------------------------------------------
// User types

/// Reads a nested user type value of type `T`.
///
/// An absent or null property is a [`PofError::MissingValue`]; wrap the
/// property in `Option` to accept it.
pub fn read_user_type<T: Any>(reader: &mut dyn PofReader, index: i32) -> Result<T, PofError> {
    let Some(value) = reader.read_object(index)? else {
        return Err(PofError::MissingValue {
            index,
            expected: type_name::<T>(),
        });
    };
    match value.downcast::<T>() {
        Ok(value) => Ok(*value),
        Err(_) => Err(PofError::TypeMismatch {
            index,
            expected: type_name::<T>(),
            actual: "another type",
        }),
    }
}

/// Implements [`PofValue`] for types serialized as nested user types.
///
/// # Examples
///
/// ```
/// #[derive(Default)]
/// struct Address {
///     city: String,
/// }
///
/// pof_io::impl_user_type!(Address);
/// ```
#[macro_export]
macro_rules! impl_user_type {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::PofValue for $ty {
            #[inline]
            fn write_value(
                &self,
                writer: &mut dyn $crate::PofWriter,
                index: i32,
            ) -> ::core::result::Result<(), $crate::PofError> {
                writer.write_object(index, self)
            }

            #[inline]
            fn read_value(
                reader: &mut dyn $crate::PofReader,
                index: i32,
            ) -> ::core::result::Result<Self, $crate::PofError> {
                $crate::read_user_type::<$ty>(reader, index)
            }
        }
    )+};
}
