use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;

use pof_reflect::Class;
use pof_utils::TypeIdMap;
use pof_utils::hash::HashMap;

use crate::error::PofError;
use crate::stream::{PofReader, PofWriter};

// -----------------------------------------------------------------------------
// PofSerializer

/// Writes and reads values of one user type.
pub trait PofSerializer: Send + Sync {
    /// Writes every property of `value` to `writer`.
    fn serialize(&self, writer: &mut dyn PofWriter, value: &dyn Any) -> Result<(), PofError>;

    /// Builds a new value from the properties in `reader`.
    fn deserialize(&self, reader: &mut dyn PofReader) -> Result<Box<dyn Any>, PofError>;
}

// -----------------------------------------------------------------------------
// UserType

/// A registered user type: its numeric id, its class and its serializer.
#[derive(Clone)]
pub struct UserType {
    type_id: i32,
    class: Arc<Class>,
    serializer: Arc<dyn PofSerializer>,
}

impl UserType {
    #[inline]
    pub fn type_id(&self) -> i32 {
        self.type_id
    }

    #[inline]
    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    #[inline]
    pub fn serializer(&self) -> &dyn PofSerializer {
        &*self.serializer
    }
}

impl fmt::Debug for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserType")
            .field("type_id", &self.type_id)
            .field("class", &self.class.name())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// PofContext

/// Maps numeric user type ids to classes and serializers.
///
/// # Examples
///
/// ```
/// use pof_io::PofContext;
///
/// let context = PofContext::new();
/// assert!(context.user_type(1001).is_err());
/// assert!(!context.is_user_type::<String>());
/// ```
#[derive(Default)]
pub struct PofContext {
    by_id: HashMap<i32, UserType>,
    by_class: TypeIdMap<i32>,
}

impl PofContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `class` under `type_id`, replacing any previous
    /// registration of either.
    pub fn register_user_type(
        &mut self,
        type_id: i32,
        class: Arc<Class>,
        serializer: Arc<dyn PofSerializer>,
    ) -> &mut Self {
        if let Some(old) = self.by_id.remove(&type_id) {
            self.by_class.remove(&old.class.ty_id());
        }
        if let Some(old_id) = self.by_class.insert(class.ty_id(), type_id) {
            self.by_id.remove(&old_id);
        }
        log::debug!("registered user type {type_id} for `{}`", class.name());
        self.by_id.insert(
            type_id,
            UserType {
                type_id,
                class,
                serializer,
            },
        );
        self
    }

    /// Looks up a registration by user type id.
    pub fn user_type(&self, type_id: i32) -> Result<&UserType, PofError> {
        self.by_id
            .get(&type_id)
            .ok_or(PofError::UnknownUserType(type_id))
    }

    /// Looks up the registration of a Rust type.
    pub fn user_type_of(&self, type_id: TypeId) -> Result<&UserType, PofError> {
        self.by_class
            .get(&type_id)
            .and_then(|id| self.by_id.get(id))
            .ok_or(PofError::UnknownClass(type_id))
    }

    /// The user type id registered for `T`, if any.
    pub fn user_type_id<T: Any>(&self) -> Option<i32> {
        self.by_class.get_type::<T>().copied()
    }

    pub fn is_user_type<T: Any>(&self) -> bool {
        self.by_class.contains_type::<T>()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserType> {
        self.by_id.values()
    }
}

impl fmt::Debug for PofContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.by_id.values()).finish()
    }
}
