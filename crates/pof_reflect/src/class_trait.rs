use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use pof_utils::TypeIdMap;

// -----------------------------------------------------------------------------
// ClassTrait

/// A capability attached to a [`Class`] or a [`Method`].
///
/// Capabilities let a consumer discover, on a type-erased value, that the
/// underlying type supports some extra protocol (for example version
/// evolution) without the reflection surface knowing that protocol.
///
/// Implemented for every `Send + Sync + 'static` type.
///
/// [`Class`]: crate::Class
/// [`Method`]: crate::Method
pub trait ClassTrait: Any + Send + Sync {}

impl<T: Any + Send + Sync> ClassTrait for T {}

// -----------------------------------------------------------------------------
// FromType

/// Trait used to generate a [`ClassTrait`] value for a concrete type.
///
/// # Example
///
/// ```
/// use pof_reflect::{FromType, TraitTable};
///
/// struct ReflectName(&'static str);
///
/// impl<T> FromType<T> for ReflectName {
///     fn from_type() -> Self {
///         ReflectName(core::any::type_name::<T>())
///     }
/// }
///
/// let mut table = TraitTable::new();
/// table.insert(<ReflectName as FromType<u8>>::from_type());
/// assert_eq!(table.get::<ReflectName>().unwrap().0, "u8");
/// ```
pub trait FromType<T> {
    fn from_type() -> Self;
}

// -----------------------------------------------------------------------------
// TraitTable

/// Storage for [`ClassTrait`] values, one per concrete type.
#[derive(Default)]
pub struct TraitTable {
    table: TypeIdMap<Box<dyn ClassTrait>>,
}

impl TraitTable {
    /// Creates an empty table.
    #[inline]
    pub const fn new() -> Self {
        Self {
            table: TypeIdMap::new(),
        }
    }

    /// Insert or overwrite a capability.
    #[inline]
    pub fn insert<T: ClassTrait>(&mut self, data: T) {
        self.table.insert(TypeId::of::<T>(), Box::new(data));
    }

    /// Get a capability reference, or return `None` if it doesn't exist.
    #[inline]
    pub fn get<T: ClassTrait>(&self) -> Option<&T> {
        let data: &dyn Any = &**self.table.get(&TypeId::of::<T>())?;
        data.downcast_ref::<T>()
    }

    /// Return true if the capability exists.
    #[inline]
    pub fn contains<T: ClassTrait>(&self) -> bool {
        self.table.contains_type::<T>()
    }

    /// Return the number of capabilities.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }
}

impl fmt::Debug for TraitTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.table.iter().map(|(id, _)| id)).finish()
    }
}

/// Implement capability accessors on a type holding a `TraitTable` field.
macro_rules! impl_trait_table_fn {
    ($field:ident) => {
        /// Get a capability reference, or return `None` if it doesn't exist.
        #[inline]
        pub fn get_trait<T: $crate::ClassTrait>(&self) -> Option<&T> {
            self.$field.get::<T>()
        }
    };
}

pub(crate) use impl_trait_table_fn;
