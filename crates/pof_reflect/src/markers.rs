use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt::Debug;

use pof_utils::TypeIdMap;

// -----------------------------------------------------------------------------
// Marker

/// A value that can be attached to a class or method as a marker.
///
/// Implemented for every `Debug + Send + Sync + 'static` type.
pub trait Marker: Any + Debug + Send + Sync {}

impl<T: Any + Debug + Send + Sync> Marker for T {}

// -----------------------------------------------------------------------------
// Markers

/// A collection of markers attached to a class or a method.
///
/// Markers are stored by their [`TypeId`].
/// Because of this, there can only be one marker per type.
///
/// # Example
///
/// ```
/// use pof_reflect::Markers;
///
/// #[derive(Debug)]
/// struct Index(i32);
///
/// let markers = Markers::new().with_marker(Index(3));
///
/// assert!(markers.contains::<Index>());
/// assert_eq!(markers.get::<Index>().unwrap().0, 3);
/// assert!(!markers.contains::<bool>());
/// ```
#[derive(Default)]
pub struct Markers {
    markers: TypeIdMap<Box<dyn Marker>>,
}

impl Markers {
    /// Creates an empty [`Markers`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            markers: TypeIdMap::new(),
        }
    }

    /// Adds a marker.
    ///
    /// Markers are keyed by their concrete type; later insertions for the
    /// same type overwrite earlier values.
    #[inline]
    pub fn with_marker<T: Marker>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Adds a marker in place, returning the replaced marker of the same type.
    pub fn insert<T: Marker>(&mut self, value: T) -> Option<Box<dyn Marker>> {
        self.markers.insert(TypeId::of::<T>(), Box::new(value))
    }

    /// Returns `true` if a marker of type `T` is present.
    #[inline]
    pub fn contains<T: Marker>(&self) -> bool {
        self.markers.contains_type::<T>()
    }

    /// Returns the marker of type `T`, if present.
    #[inline]
    pub fn get<T: Marker>(&self) -> Option<&T> {
        let marker: &dyn Any = &**self.markers.get(&TypeId::of::<T>())?;
        marker.downcast_ref::<T>()
    }

    /// Returns the number of stored markers.
    #[inline]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns `true` if no markers are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl Debug for Markers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.markers.values()).finish()
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

/// Implement `markers` accessors on a type holding a `Markers` field.
macro_rules! impl_markers_fn {
    ($field:ident) => {
        /// Returns the attached [`Markers`](crate::Markers).
        #[inline]
        pub fn markers(&self) -> &$crate::Markers {
            &self.$field
        }

        /// Returns the marker of type `T`, if present.
        #[inline]
        pub fn get_marker<T: $crate::Marker>(&self) -> Option<&T> {
            self.$field.get::<T>()
        }

        /// Returns `true` if it carries a marker of type `T`.
        #[inline]
        pub fn has_marker<T: $crate::Marker>(&self) -> bool {
            self.$field.contains::<T>()
        }
    };
}

pub(crate) use impl_markers_fn;
