//! Provide a class registry for lookups by `TypeId` or by name.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, classes declared through
//! [`submit_class!`](crate::submit_class) are collected at link time by the
//! [`inventory`] crate and added by [`ClassRegistry::auto_register`].
//! Platforms without `inventory` support simply register nothing.
//!
//! [`inventory`]: https://docs.rs/inventory

use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use pof_utils::TypeIdMap;
use pof_utils::hash::{HashMap, new_map};

use crate::class::Class;

// -----------------------------------------------------------------------------
// ClassRegistry

/// A registry of declared [`Class`]es.
///
/// The registry is plain data: build one, then hand it (or an `Arc` of it)
/// to whatever needs it. There is no process-wide instance.
///
/// # Example
///
/// ```
/// use core::any::TypeId;
/// use pof_reflect::{Class, registry::ClassRegistry};
///
/// struct Point;
///
/// let mut registry = ClassRegistry::new();
/// assert!(registry.register(Class::builder::<Point>("Point").build()));
///
/// assert!(registry.contains(TypeId::of::<Point>()));
/// assert_eq!(registry.get_with_name("Point").unwrap().name(), "Point");
/// ```
pub struct ClassRegistry {
    classes: TypeIdMap<Arc<Class>>,
    name_to_id: HashMap<&'static str, TypeId>,
}

impl Default for ClassRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Create an empty [`ClassRegistry`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            classes: TypeIdMap::new(),
            name_to_id: new_map(),
        }
    }

    /// Try add or do nothing.
    ///
    /// - If the class's [`TypeId`] already exists, does nothing and returns `false`.
    /// - Otherwise inserts the class and returns `true`.
    pub fn register(&mut self, class: Arc<Class>) -> bool {
        let type_id = class.ty_id();
        let name = class.name();
        let added = self.classes.try_insert(type_id, || class);
        if added {
            self.name_to_id.insert(name, type_id);
        }
        added
    }

    /// Insert or **overwrite** a class.
    pub fn insert(&mut self, class: Arc<Class>) {
        if let Some(old) = self.classes.insert(class.ty_id(), class.clone()) {
            self.name_to_id.remove(old.name());
        }
        self.name_to_id.insert(class.name(), class.ty_id());
    }

    /// Whether the type with given [`TypeId`] has been registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.classes.contains(&type_id)
    }

    /// Returns the class of the type with the given [`TypeId`].
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&Arc<Class>> {
        self.classes.get(&type_id)
    }

    /// Returns the class of `T`.
    #[inline]
    pub fn get_type<T: 'static>(&self) -> Option<&Arc<Class>> {
        self.classes.get_type::<T>()
    }

    /// Returns the class with the given declared name.
    pub fn get_with_name(&self, name: &str) -> Option<&Arc<Class>> {
        match self.name_to_id.get(name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns the number of registered classes.
    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if nothing is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterates registered classes in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Arc<Class>> {
        self.classes.values()
    }

    /// Registers every class declared through [`submit_class!`](crate::submit_class).
    ///
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// Returns `true` if automatic registration is available, that is, if the
    /// `auto_register` feature is enabled; otherwise does nothing and
    /// returns `false`.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            let mut added = 0_usize;
            for registration in inventory::iter::<ClassRegistration> {
                if self.register((registration.build)()) {
                    added += 1;
                }
            }
            log::debug!("auto registered {added} classes ({} total)", self.len());
            true
        }

        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.name_to_id.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// auto_register

/// A link-time class declaration collected by [`ClassRegistry::auto_register`].
#[cfg(feature = "auto_register")]
pub struct ClassRegistration {
    build: fn() -> Arc<Class>,
}

#[cfg(feature = "auto_register")]
impl ClassRegistration {
    #[doc(hidden)]
    pub const fn new(build: fn() -> Arc<Class>) -> Self {
        Self { build }
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(ClassRegistration);

/// Declares a class for [`ClassRegistry::auto_register`].
///
/// Takes the path of a `fn() -> Arc<Class>`. Without the `auto_register`
/// feature this expands to nothing.
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_class {
    ($build:path) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::ClassRegistration::new($build)
        }
    };
}

/// Declares a class for [`ClassRegistry::auto_register`].
///
/// Takes the path of a `fn() -> Arc<Class>`. Without the `auto_register`
/// feature this expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! submit_class {
    ($build:path) => {};
}
