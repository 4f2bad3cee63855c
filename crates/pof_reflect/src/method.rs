use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::{Arc, Weak};
use core::any::{Any, TypeId, type_name};
use core::fmt;

use crate::accessor::{AccessorKind, accessor_prefix, property_name};
use crate::class::Class;
use crate::class_trait::{ClassTrait, TraitTable, impl_trait_table_fn};
use crate::error::ReflectError;
use crate::markers::{Marker, Markers, impl_markers_fn};

type GetFn = dyn Fn(&dyn Any) -> Result<Box<dyn Any>, ReflectError> + Send + Sync;
type SetFn = dyn Fn(&mut dyn Any, Box<dyn Any>) -> Result<(), ReflectError> + Send + Sync;

enum Invoker {
    Get(Box<GetFn>),
    Set(Box<SetFn>),
}

// -----------------------------------------------------------------------------
// Method

/// A declared accessor method of a [`Class`].
///
/// The accessor is bound once, when the method is declared, to a typed
/// closure; invoking it only costs a downcast of the container (and of the
/// value, for setters).
///
/// # Examples
///
/// ```
/// use pof_reflect::{AccessorKind, Method};
///
/// struct Person { age: i32 }
///
/// let getter = Method::getter("getAge", |p: &Person| p.age);
/// let setter = Method::setter("setAge", |p: &mut Person, age: i32| p.age = age);
///
/// let mut person = Person { age: 30 };
/// setter.invoke_set(&mut person, Box::new(31_i32)).unwrap();
///
/// let age = getter.invoke_get(&person).unwrap();
/// assert_eq!(*age.downcast::<i32>().unwrap(), 31);
/// assert_eq!(getter.kind(), AccessorKind::Getter);
/// assert!(setter.invoke_set(&mut person, Box::new("old")).is_err());
/// ```
pub struct Method {
    name: &'static str,
    kind: AccessorKind,
    class_id: TypeId,
    class_name: &'static str,
    value_id: TypeId,
    value_name: &'static str,
    invoker: Invoker,
    markers: Markers,
    traits: TraitTable,
    declaring: Weak<Class>,
}

impl Method {
    impl_markers_fn!(markers);
    impl_trait_table_fn!(traits);

    /// Declares a getter of `C` returning a `V`.
    pub fn getter<C, V>(name: &'static str, get: impl Fn(&C) -> V + Send + Sync + 'static) -> Self
    where
        C: Any,
        V: Any,
    {
        let class_name = type_name::<C>();
        let invoker = Invoker::Get(Box::new(move |container: &dyn Any| {
            let Some(container) = container.downcast_ref::<C>() else {
                return Err(ReflectError::ContainerMismatch {
                    class: class_name,
                    actual: container.type_id(),
                });
            };
            Ok(Box::new(get(container)) as Box<dyn Any>)
        }));

        Self::new::<C, V>(name, AccessorKind::Getter, invoker)
    }

    /// Declares a setter of `C` accepting a `V`.
    pub fn setter<C, V>(
        name: &'static str,
        set: impl Fn(&mut C, V) + Send + Sync + 'static,
    ) -> Self
    where
        C: Any,
        V: Any,
    {
        let class_name = type_name::<C>();
        let invoker = Invoker::Set(Box::new(move |container: &mut dyn Any, value: Box<dyn Any>| {
            let actual = (*container).type_id();
            let Some(container) = container.downcast_mut::<C>() else {
                return Err(ReflectError::ContainerMismatch {
                    class: class_name,
                    actual,
                });
            };
            let value = value.downcast::<V>().map_err(|_| ReflectError::ValueMismatch {
                method: name,
                expected: type_name::<V>(),
            })?;
            set(container, *value);
            Ok(())
        }));

        Self::new::<C, V>(name, AccessorKind::Setter, invoker)
    }

    fn new<C: Any, V: Any>(name: &'static str, kind: AccessorKind, invoker: Invoker) -> Self {
        Self {
            name,
            kind,
            class_id: TypeId::of::<C>(),
            class_name: type_name::<C>(),
            value_id: TypeId::of::<V>(),
            value_name: type_name::<V>(),
            invoker,
            markers: Markers::new(),
            traits: TraitTable::new(),
            declaring: Weak::new(),
        }
    }

    /// Attaches a marker to this method.
    #[inline]
    pub fn with_marker<T: Marker>(mut self, marker: T) -> Self {
        self.markers.insert(marker);
        self
    }

    /// Attaches a capability to this method.
    #[inline]
    pub fn with_trait<T: ClassTrait>(mut self, data: T) -> Self {
        self.traits.insert(data);
        self
    }

    /// Returns the method name, e.g. `getFirstName`.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns whether this method reads or writes.
    #[inline]
    pub const fn kind(&self) -> AccessorKind {
        self.kind
    }

    /// Returns `true` if the name follows the get/is/set accessor convention.
    #[inline]
    pub fn is_accessor(&self) -> bool {
        accessor_prefix(self.name).is_some()
    }

    /// Returns the canonical property name for an accessor.
    #[inline]
    pub fn property_name(&self) -> Option<String> {
        property_name(self.name)
    }

    /// Returns the `TypeId` of the container type.
    #[inline]
    pub const fn class_type_id(&self) -> TypeId {
        self.class_id
    }

    /// Returns the type name of the container type.
    #[inline]
    pub const fn class_type_name(&self) -> &'static str {
        self.class_name
    }

    /// Returns the `TypeId` of the property value.
    #[inline]
    pub const fn value_type_id(&self) -> TypeId {
        self.value_id
    }

    /// Returns the type name of the property value.
    #[inline]
    pub const fn value_type_name(&self) -> &'static str {
        self.value_name
    }

    /// Returns the class declaring this method.
    ///
    /// `None` for a method that was never added to a built [`Class`].
    #[inline]
    pub fn declaring_class(&self) -> Option<Arc<Class>> {
        self.declaring.upgrade()
    }

    pub(crate) fn set_declaring(&mut self, class: Weak<Class>) {
        self.declaring = class;
    }

    /// Reads the property from `container`.
    pub fn invoke_get(&self, container: &dyn Any) -> Result<Box<dyn Any>, ReflectError> {
        match &self.invoker {
            Invoker::Get(get) => get(container),
            Invoker::Set(_) => Err(self.wrong_kind()),
        }
    }

    /// Writes `value` into the property of `container`.
    pub fn invoke_set(&self, container: &mut dyn Any, value: Box<dyn Any>) -> Result<(), ReflectError> {
        match &self.invoker {
            Invoker::Set(set) => set(container, value),
            Invoker::Get(_) => Err(self.wrong_kind()),
        }
    }

    #[cold]
    fn wrong_kind(&self) -> ReflectError {
        ReflectError::WrongAccessorKind {
            class: self.class_name,
            method: self.name,
        }
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("value", &self.value_name)
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}
