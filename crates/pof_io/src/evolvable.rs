use alloc::vec::Vec;
use core::any::Any;

use pof_reflect::FromType;

// -----------------------------------------------------------------------------
// Evolvable

/// A type that tracks the version of the data it was read from and keeps
/// the properties it did not understand.
///
/// The data version written for a value is the larger of its
/// [`impl_version`](Self::impl_version) and its
/// [`data_version`](Self::data_version), so data read from a newer writer
/// is passed on without losing its version.
pub trait Evolvable {
    /// The version this type's code implements.
    fn impl_version(&self) -> i32;

    /// The version of the data this value was last read from.
    fn data_version(&self) -> i32;

    fn set_data_version(&mut self, version: i32);

    /// Raw properties from a newer version, if any.
    fn future_data(&self) -> Option<&[u8]>;

    fn set_future_data(&mut self, data: Option<Vec<u8>>);
}

// -----------------------------------------------------------------------------
// EvolvableState

/// Storage for the mutable half of [`Evolvable`].
///
/// # Examples
///
/// ```
/// use pof_io::{Evolvable, EvolvableState};
///
/// #[derive(Default)]
/// struct Person {
///     name: String,
///     evolvable: EvolvableState,
/// }
///
/// pof_io::impl_evolvable!(Person, evolvable, 1);
///
/// let person = Person::default();
/// assert_eq!(person.impl_version(), 1);
/// assert_eq!(person.data_version(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvolvableState {
    data_version: i32,
    future_data: Option<Vec<u8>>,
}

impl EvolvableState {
    pub const fn new() -> Self {
        Self {
            data_version: 0,
            future_data: None,
        }
    }

    #[inline]
    pub fn data_version(&self) -> i32 {
        self.data_version
    }

    #[inline]
    pub fn set_data_version(&mut self, version: i32) {
        self.data_version = version;
    }

    #[inline]
    pub fn future_data(&self) -> Option<&[u8]> {
        self.future_data.as_deref()
    }

    #[inline]
    pub fn set_future_data(&mut self, data: Option<Vec<u8>>) {
        self.future_data = data.filter(|d| !d.is_empty());
    }
}

/// Implements [`Evolvable`] by delegating to an [`EvolvableState`] field.
#[macro_export]
macro_rules! impl_evolvable {
    ($ty:ty, $field:ident, $version:expr) => {
        impl $crate::Evolvable for $ty {
            #[inline]
            fn impl_version(&self) -> i32 {
                $version
            }

            #[inline]
            fn data_version(&self) -> i32 {
                self.$field.data_version()
            }

            #[inline]
            fn set_data_version(&mut self, version: i32) {
                self.$field.set_data_version(version);
            }

            #[inline]
            fn future_data(&self) -> ::core::option::Option<&[u8]> {
                self.$field.future_data()
            }

            #[inline]
            fn set_future_data(&mut self, data: ::core::option::Option<$crate::__macro_exports::Vec<u8>>) {
                self.$field.set_future_data(data);
            }
        }
    };
}

// -----------------------------------------------------------------------------
// ReflectEvolvable

/// Class capability: view a type-erased value as [`Evolvable`].
#[derive(Debug, Clone, Copy)]
pub struct ReflectEvolvable {
    get: fn(&dyn Any) -> Option<&dyn Evolvable>,
    get_mut: fn(&mut dyn Any) -> Option<&mut dyn Evolvable>,
}

impl ReflectEvolvable {
    /// The capability for `T`.
    pub fn of<T: Evolvable + Any>() -> Self {
        <Self as FromType<T>>::from_type()
    }

    /// Returns `value` as [`Evolvable`] if it has the capability's type.
    #[inline]
    pub fn get<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Evolvable> {
        (self.get)(value)
    }

    #[inline]
    pub fn get_mut<'a>(&self, value: &'a mut dyn Any) -> Option<&'a mut dyn Evolvable> {
        (self.get_mut)(value)
    }
}

impl<T: Evolvable + Any> FromType<T> for ReflectEvolvable {
    fn from_type() -> Self {
        Self {
            get: as_evolvable::<T>,
            get_mut: as_evolvable_mut::<T>,
        }
    }
}

fn as_evolvable<T: Evolvable + Any>(value: &dyn Any) -> Option<&dyn Evolvable> {
    value.downcast_ref::<T>().map(|v| v as &dyn Evolvable)
}

fn as_evolvable_mut<T: Evolvable + Any>(value: &mut dyn Any) -> Option<&mut dyn Evolvable> {
    value.downcast_mut::<T>().map(|v| v as &mut dyn Evolvable)
}

// -----------------------------------------------------------------------------
// Tests
