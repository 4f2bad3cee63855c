use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId, type_name};
use core::fmt;
use core::marker::PhantomData;

use crate::class_trait::{ClassTrait, TraitTable, impl_trait_table_fn};
use crate::error::ReflectError;
use crate::markers::{Marker, Markers, impl_markers_fn};
use crate::method::Method;

type ConstructorFn = dyn Fn() -> Box<dyn Any> + Send + Sync;

// -----------------------------------------------------------------------------
// Superclass

/// Projects an instance of a class onto the part its superclass describes.
trait Upcast: Send + Sync {
    fn upcast<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any>;
    fn upcast_mut<'a>(&self, value: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct Projection<C, P> {
    get: fn(&C) -> &P,
    get_mut: fn(&mut C) -> &mut P,
}

impl<C: Any, P: Any> Upcast for Projection<C, P> {
    fn upcast<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any> {
        let value = value.downcast_ref::<C>()?;
        Some((self.get)(value) as &dyn Any)
    }

    fn upcast_mut<'a>(&self, value: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let value = value.downcast_mut::<C>()?;
        Some((self.get_mut)(value) as &mut dyn Any)
    }
}

struct Superclass {
    class: Arc<Class>,
    projection: Box<dyn Upcast>,
}

// -----------------------------------------------------------------------------
// Class

/// Runtime description of a type: its constructor, markers, declared
/// accessor methods and capabilities.
///
/// Created through [`Class::builder`]; always shared as `Arc<Class>`, so a
/// [`Method`] can resolve its declaring class.
pub struct Class {
    name: &'static str,
    type_id: TypeId,
    type_name: &'static str,
    constructor: Option<Box<ConstructorFn>>,
    markers: Markers,
    methods: Vec<Arc<Method>>,
    traits: TraitTable,
    superclass: Option<Superclass>,
}

impl Class {
    impl_markers_fn!(markers);
    impl_trait_table_fn!(traits);

    /// Starts declaring the class of `C`.
    #[inline]
    pub fn builder<C: Any>(name: &'static str) -> ClassBuilder<C> {
        ClassBuilder::new(name)
    }

    /// Returns the declared class name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the `TypeId` of the described type.
    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the Rust type name of the described type.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the class this one extends.
    #[inline]
    pub fn superclass(&self) -> Option<&Arc<Class>> {
        self.superclass.as_ref().map(|s| &s.class)
    }

    /// Iterates the superclass chain, nearest first.
    pub fn superclasses(&self) -> impl Iterator<Item = &Arc<Class>> {
        core::iter::successors(self.superclass(), |class| class.superclass())
    }

    /// Views `value` as the type `target` of this class or of one of its
    /// superclasses.
    pub fn upcast<'a>(&self, value: &'a dyn Any, target: TypeId) -> Option<&'a dyn Any> {
        if value.type_id() == target {
            return Some(value);
        }
        let parent = self.superclass.as_ref()?;
        parent.class.upcast(parent.projection.upcast(value)?, target)
    }

    /// Mutable counterpart of [`Class::upcast`].
    pub fn upcast_mut<'a>(&self, value: &'a mut dyn Any, target: TypeId) -> Option<&'a mut dyn Any> {
        if (*value).type_id() == target {
            return Some(value);
        }
        let parent = self.superclass.as_ref()?;
        parent.class.upcast_mut(parent.projection.upcast_mut(value)?, target)
    }

    /// Iterates the declared methods in declaration order.
    #[inline]
    pub fn declared_methods(&self) -> impl ExactSizeIterator<Item = &Arc<Method>> {
        self.methods.iter()
    }

    /// Finds a declared method by name.
    pub fn declared_method(&self, name: &str) -> Option<&Arc<Method>> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// Returns `true` if `value` is an instance of this class.
    #[inline]
    pub fn is_instance(&self, value: &dyn Any) -> bool {
        value.type_id() == self.type_id
    }

    /// Returns `true` if a constructor was declared.
    #[inline]
    pub fn is_instantiable(&self) -> bool {
        self.constructor.is_some()
    }

    /// Creates a new instance through the declared constructor.
    pub fn new_instance(&self) -> Result<Box<dyn Any>, ReflectError> {
        match &self.constructor {
            Some(constructor) => Ok(constructor()),
            None => Err(ReflectError::NotInstantiable { class: self.name }),
        }
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("superclass", &self.superclass().map(|c| c.name))
            .field("markers", &self.markers)
            .field("methods", &self.methods)
            .field("traits", &self.traits)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// -----------------------------------------------------------------------------
// ClassBuilder

/// Fluent declaration of a [`Class`].
///
/// # Examples
///
/// ```
/// use pof_reflect::{Class, Method};
///
/// #[derive(Default)]
/// struct Counter { hits: i64 }
///
/// let class = Class::builder::<Counter>("Counter")
///     .default_constructor()
///     .method(Method::getter("getHits", |c: &Counter| c.hits))
///     .build();
///
/// let method = class.declared_method("getHits").unwrap();
/// assert_eq!(method.declaring_class().unwrap().name(), "Counter");
/// assert!(class.is_instance(&*class.new_instance().unwrap()));
/// ```
pub struct ClassBuilder<C> {
    name: &'static str,
    constructor: Option<Box<ConstructorFn>>,
    markers: Markers,
    methods: Vec<Method>,
    traits: TraitTable,
    superclass: Option<Superclass>,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Any> ClassBuilder<C> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            constructor: None,
            markers: Markers::new(),
            methods: Vec::new(),
            traits: TraitTable::new(),
            superclass: None,
            _marker: PhantomData,
        }
    }

    /// Declares `parent` as the superclass, embedded in `C` at the place
    /// `get` and `get_mut` project to.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::any::TypeId;
    /// use pof_reflect::Class;
    ///
    /// struct Shape { sides: u8 }
    /// struct Square { shape: Shape, side: f64 }
    ///
    /// let shape = Class::builder::<Shape>("Shape").build();
    /// let square = Class::builder::<Square>("Square")
    ///     .extends(shape, |s: &Square| &s.shape, |s: &mut Square| &mut s.shape)
    ///     .build();
    ///
    /// let value = Square { shape: Shape { sides: 4 }, side: 2.0 };
    /// let part = square.upcast(&value, TypeId::of::<Shape>()).unwrap();
    /// assert_eq!(part.downcast_ref::<Shape>().unwrap().sides, 4);
    /// assert_eq!(square.superclass().unwrap().name(), "Shape");
    /// ```
    pub fn extends<P: Any>(
        mut self,
        parent: Arc<Class>,
        get: fn(&C) -> &P,
        get_mut: fn(&mut C) -> &mut P,
    ) -> Self {
        debug_assert_eq!(
            parent.ty_id(),
            TypeId::of::<P>(),
            "`{}` is not the class of `{}`",
            parent.name(),
            type_name::<P>(),
        );
        self.superclass = Some(Superclass {
            class: parent,
            projection: Box::new(Projection { get, get_mut }),
        });
        self
    }

    /// Declares the constructor used by [`Class::new_instance`].
    pub fn constructor(mut self, f: impl Fn() -> C + Send + Sync + 'static) -> Self {
        self.constructor = Some(Box::new(move || Box::new(f()) as Box<dyn Any>));
        self
    }

    /// Declares [`Default::default`] as the constructor.
    pub fn default_constructor(self) -> Self
    where
        C: Default,
    {
        self.constructor(C::default)
    }

    /// Attaches a class-level marker.
    pub fn marker<T: Marker>(mut self, marker: T) -> Self {
        self.markers.insert(marker);
        self
    }

    /// Declares a method.
    ///
    /// The method must access `C`.
    pub fn method(mut self, method: Method) -> Self {
        debug_assert_eq!(
            method.class_type_id(),
            TypeId::of::<C>(),
            "method `{}` does not access `{}`",
            method.name(),
            type_name::<C>(),
        );
        self.methods.push(method);
        self
    }

    /// Attaches a class-level capability.
    pub fn with_trait<T: ClassTrait>(mut self, data: T) -> Self {
        self.traits.insert(data);
        self
    }

    /// Finishes the declaration.
    pub fn build(self) -> Arc<Class> {
        let Self {
            name,
            constructor,
            markers,
            methods,
            traits,
            superclass,
            _marker,
        } = self;

        Arc::new_cyclic(|weak| Class {
            name,
            type_id: TypeId::of::<C>(),
            type_name: type_name::<C>(),
            constructor,
            markers,
            methods: methods
                .into_iter()
                .map(|mut method| {
                    method.set_declaring(weak.clone());
                    Arc::new(method)
                })
                .collect(),
            traits,
            superclass,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Class;
    use crate::{Method, ReflectError};
    use alloc::boxed::Box;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::any::TypeId;

    #[derive(Debug)]
    struct Visible;

    struct NoDefault(u8);

    #[test]
    fn methods_resolve_their_class() {
        let class = Class::builder::<NoDefault>("NoDefault")
            .marker(Visible)
            .method(Method::getter("getValue", |v: &NoDefault| v.0))
            .method(Method::setter("setValue", |v: &mut NoDefault, x: u8| v.0 = x))
            .build();

        let names = class.declared_methods().map(|m| m.name()).collect::<Vec<_>>();
        assert_eq!(names, ["getValue", "setValue"]);

        let owner = class.declared_method("setValue").unwrap().declaring_class().unwrap();
        assert!(Arc::ptr_eq(&owner, &class));
        assert!(class.has_marker::<Visible>());
    }

    #[test]
    fn missing_constructor_is_an_error() {
        let class = Class::builder::<NoDefault>("NoDefault").build();
        assert!(!class.is_instantiable());
        assert_eq!(
            class.new_instance().unwrap_err(),
            ReflectError::NotInstantiable { class: "NoDefault" }
        );
    }

    #[test]
    fn constructor_produces_instances() {
        let class = Class::builder::<NoDefault>("NoDefault")
            .constructor(|| NoDefault(9))
            .build();
        let value: Box<dyn core::any::Any> = class.new_instance().unwrap();
        assert!(class.is_instance(&*value));
        assert_eq!(value.downcast_ref::<NoDefault>().unwrap().0, 9);
        assert!(!class.is_instance(&1_u8));
    }

    struct Base(u8);
    struct Middle {
        base: Base,
    }
    struct Leaf {
        middle: Middle,
    }

    #[test]
    fn upcast_walks_the_superclass_chain() {
        let base = Class::builder::<Base>("Base").build();
        let middle = Class::builder::<Middle>("Middle")
            .extends(base, |m: &Middle| &m.base, |m: &mut Middle| &mut m.base)
            .build();
        let leaf = Class::builder::<Leaf>("Leaf")
            .extends(middle, |l: &Leaf| &l.middle, |l: &mut Leaf| &mut l.middle)
            .build();

        let names = leaf.superclasses().map(|c| c.name()).collect::<Vec<_>>();
        assert_eq!(names, ["Middle", "Base"]);

        let mut value = Leaf {
            middle: Middle { base: Base(1) },
        };
        let part = leaf.upcast_mut(&mut value, TypeId::of::<Base>()).unwrap();
        part.downcast_mut::<Base>().unwrap().0 = 7;
        assert_eq!(value.middle.base.0, 7);

        assert!(leaf.upcast(&value, TypeId::of::<Leaf>()).is_some());
        assert!(leaf.upcast(&value, TypeId::of::<u8>()).is_none());
        assert!(leaf.upcast(&Base(0), TypeId::of::<Middle>()).is_none());
    }
}
