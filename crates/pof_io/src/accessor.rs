//! Accessor constructors that record how their value is encoded.
//!
//! A [`Method`] built here carries a [`ReflectPofValue`] capability holding
//! the codec matching its value type. Metadata builders use it as the
//! property codec when nothing more specific is configured.

use pof_reflect::{FromType, Method};

use crate::codec::{CodecRef, Codecs};
use crate::value::PofValue;

// -----------------------------------------------------------------------------
// ReflectPofValue

/// Method capability: the natural codec of the accessor's value type.
#[derive(Debug, Clone, Copy)]
pub struct ReflectPofValue {
    codec: fn() -> CodecRef,
}

impl ReflectPofValue {
    /// Creates a fresh codec handle.
    #[inline]
    pub fn codec(&self) -> CodecRef {
        (self.codec)()
    }
}

impl<T: PofValue> FromType<T> for ReflectPofValue {
    fn from_type() -> Self {
        Self {
            codec: Codecs::of::<T>,
        }
    }
}

// -----------------------------------------------------------------------------
// Constructors

/// A getter of `C` returning a `V`, tagged with `V`'s codec.
pub fn getter<C, V>(name: &'static str, get: impl Fn(&C) -> V + Send + Sync + 'static) -> Method
where
    C: 'static,
    V: PofValue,
{
    Method::getter(name, get).with_trait(<ReflectPofValue as FromType<V>>::from_type())
}

/// A setter of `C` accepting a `V`, tagged with `V`'s codec.
pub fn setter<C, V>(name: &'static str, set: impl Fn(&mut C, V) + Send + Sync + 'static) -> Method
where
    C: 'static,
    V: PofValue,
{
    Method::setter(name, set).with_trait(<ReflectPofValue as FromType<V>>::from_type())
}

// -----------------------------------------------------------------------------
// Tests
