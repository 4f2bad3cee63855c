use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::hash::{Hash, Hasher};

use pof_reflect::{Class, ReflectError};
use pof_utils::hash::HashMap;

use crate::attribute::ClassAttribute;
use crate::key::TypeKey;

// -----------------------------------------------------------------------------
// ClassMetadata

/// The derived shape of one serializable type.
///
/// Holds a [`TypeKey`], the described [`Class`] and the attributes in
/// canonical order (version, index, name), unique by name. Built by a
/// [`ClassMetadataBuilder`](crate::ClassMetadataBuilder) and immutable
/// afterwards.
///
/// Equality compares the key and the ordered attributes.
#[derive(Clone, Default)]
pub struct ClassMetadata {
    class: Option<Arc<Class>>,
    key: TypeKey,
    attributes: Vec<ClassAttribute>,
    by_name: HashMap<String, usize>,
}

impl ClassMetadata {
    /// The described class, if one was set.
    #[inline]
    pub fn class(&self) -> Option<&Arc<Class>> {
        self.class.as_ref()
    }

    #[inline]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    #[inline]
    pub fn type_id(&self) -> i32 {
        self.key.type_id()
    }

    #[inline]
    pub fn version_id(&self) -> i32 {
        self.key.version_id()
    }

    /// Creates a new instance of the described class.
    pub fn new_instance(&self) -> Result<Box<dyn Any>, ReflectError> {
        match &self.class {
            Some(class) => class.new_instance(),
            None => Err(ReflectError::NotInstantiable { class: "<unset>" }),
        }
    }

    /// The attributes in canonical order.
    #[inline]
    pub fn attributes(&self) -> impl ExactSizeIterator<Item = &ClassAttribute> {
        self.attributes.iter()
    }

    #[inline]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn get_attribute(&self, name: &str) -> Option<&ClassAttribute> {
        self.by_name.get(name).map(|&i| &self.attributes[i])
    }

    // Staging, used by the builder.

    pub(crate) fn set_class(&mut self, class: Arc<Class>) {
        self.class = Some(class);
    }

    pub(crate) fn set_key(&mut self, key: TypeKey) {
        self.key = key;
    }

    /// Inserts `attribute` in canonical position; a name already present is
    /// left untouched and `false` returned.
    pub(crate) fn add_attribute(&mut self, attribute: ClassAttribute) -> bool {
        if self.by_name.contains_key(attribute.name()) {
            return false;
        }
        let at = self.attributes.partition_point(|a| a < &attribute);
        self.attributes.insert(at, attribute);
        self.reindex();
        true
    }

    /// Gives every attribute with a negative index the smallest
    /// non-negative index not used by another attribute, in canonical order.
    pub(crate) fn resolve_indices(&mut self) {
        if self.attributes.iter().all(|a| a.index() >= 0) {
            return;
        }
        let mut claimed: Vec<i32> = self
            .attributes
            .iter()
            .map(ClassAttribute::index)
            .filter(|&i| i >= 0)
            .collect();
        let mut next = 0;
        for attribute in self.attributes.iter_mut().filter(|a| a.index() < 0) {
            while claimed.contains(&next) {
                next += 1;
            }
            claimed.push(next);
            attribute.set_index(next);
        }
        self.attributes.sort();
        self.reindex();
    }

    fn reindex(&mut self) {
        self.by_name.clear();
        for (i, attribute) in self.attributes.iter().enumerate() {
            self.by_name.insert(String::from(attribute.name()), i);
        }
    }
}

impl PartialEq for ClassMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.attributes == other.attributes
    }
}

impl Eq for ClassMetadata {}

impl Hash for ClassMetadata {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.type_id().hash(state);
        self.key.version_id().hash(state);
        self.attributes.hash(state);
    }
}

impl fmt::Debug for ClassMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMetadata")
            .field("class", &self.class.as_ref().map(|c| c.name()))
            .field("key", &self.key)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl fmt::Display for ClassMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassMetadata(key={}, attributes=[", self.key)?;
        for (i, attribute) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(attribute, f)?;
        }
        f.write_str("])")
    }
}
