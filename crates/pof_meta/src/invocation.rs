use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use pof_reflect::{AccessorKind, Class, Method, ReflectError, complement_names};

// -----------------------------------------------------------------------------
// InvocationStrategy

/// Reads and writes one property of a container.
///
/// Strategies hold no mutable state and may be shared between threads.
pub trait InvocationStrategy: Send + Sync + fmt::Debug {
    /// Returns the property value of `container`.
    fn get(&self, container: &dyn Any) -> Result<Box<dyn Any>, ReflectError>;

    /// Stores `value` as the property value of `container`.
    fn set(&self, container: &mut dyn Any, value: Box<dyn Any>) -> Result<(), ReflectError>;
}

/// A shared strategy handle.
pub type InvocationStrategyRef = Arc<dyn InvocationStrategy>;

// -----------------------------------------------------------------------------
// MethodInvocationStrategy

/// An [`InvocationStrategy`] dispatching through a getter and setter pair.
///
/// # Examples
///
/// ```
/// use pof_meta::{InvocationStrategy, MethodInvocationStrategy};
/// use pof_reflect::{Class, Method};
///
/// #[derive(Default)]
/// struct Counter {
///     hits: i32,
/// }
///
/// let class = Class::builder::<Counter>("Counter")
///     .default_constructor()
///     .method(Method::getter("getHits", |c: &Counter| c.hits))
///     .method(Method::setter("setHits", |c: &mut Counter, v: i32| c.hits = v))
///     .build();
///
/// let getter = class.declared_method("getHits").unwrap();
/// let strategy = MethodInvocationStrategy::from_method(getter).unwrap();
///
/// let mut counter = Counter::default();
/// strategy.set(&mut counter, Box::new(3_i32)).unwrap();
/// let hits = strategy.get(&counter).unwrap();
/// assert_eq!(hits.downcast_ref::<i32>(), Some(&3));
/// ```
#[derive(Debug, Clone)]
pub struct MethodInvocationStrategy {
    getter: Arc<Method>,
    setter: Arc<Method>,
    subclass: Option<Arc<Class>>,
}

impl MethodInvocationStrategy {
    /// Pairs `method` with its complement from the same declaring class.
    ///
    /// `getX` and `isX` pair with `setX`; `setX` pairs with `getX`, then
    /// `isX`.
    pub fn from_method(method: &Arc<Method>) -> Result<Self, ReflectError> {
        if !method.is_accessor() {
            return Err(ReflectError::NotAnAccessor {
                class: method.class_type_name(),
                method: method.name(),
            });
        }

        let complement = method.declaring_class().and_then(|class| {
            complement_names(method.name())
                .iter()
                .filter_map(|name| class.declared_method(name))
                .find(|m| m.kind() == method.kind().complement())
                .cloned()
        });
        let Some(complement) = complement else {
            return Err(ReflectError::MissingAccessor {
                class: method.class_type_name(),
                method: method.name(),
            });
        };

        match method.kind() {
            AccessorKind::Getter => Self::from_pair(method.clone(), complement),
            AccessorKind::Setter => Self::from_pair(complement, method.clone()),
        }
    }

    /// Uses an explicit getter and setter.
    pub fn from_pair(getter: Arc<Method>, setter: Arc<Method>) -> Result<Self, ReflectError> {
        for (method, kind) in [(&getter, AccessorKind::Getter), (&setter, AccessorKind::Setter)] {
            if method.kind() != kind {
                return Err(ReflectError::WrongAccessorKind {
                    class: method.class_type_name(),
                    method: method.name(),
                });
            }
        }
        Ok(Self {
            getter,
            setter,
            subclass: None,
        })
    }

    /// Invokes the accessors on instances of `class`, a subclass of their
    /// declaring class, through its superclass projections.
    pub fn through(mut self, class: Arc<Class>) -> Self {
        self.subclass = Some(class);
        self
    }

    #[inline]
    pub fn getter(&self) -> &Arc<Method> {
        &self.getter
    }

    #[inline]
    pub fn setter(&self) -> &Arc<Method> {
        &self.setter
    }
}

impl InvocationStrategy for MethodInvocationStrategy {
    fn get(&self, container: &dyn Any) -> Result<Box<dyn Any>, ReflectError> {
        let target = self.getter.class_type_id();
        match &self.subclass {
            Some(class) if container.type_id() != target => {
                let part = class.upcast(container, target).ok_or(ReflectError::ContainerMismatch {
                    class: self.getter.class_type_name(),
                    actual: container.type_id(),
                })?;
                self.getter.invoke_get(part)
            }
            _ => self.getter.invoke_get(container),
        }
    }

    fn set(&self, container: &mut dyn Any, value: Box<dyn Any>) -> Result<(), ReflectError> {
        let target = self.setter.class_type_id();
        let actual = (*container).type_id();
        match &self.subclass {
            Some(class) if actual != target => {
                let part = class.upcast_mut(container, target).ok_or(ReflectError::ContainerMismatch {
                    class: self.setter.class_type_name(),
                    actual,
                })?;
                self.setter.invoke_set(part, value)
            }
            _ => self.setter.invoke_set(container, value),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
