use alloc::string::String;
use alloc::sync::Arc;
use core::mem;

use pof_io::CodecRef;
use pof_reflect::Class;

use crate::attribute::ClassAttribute;
use crate::error::MetadataError;
use crate::invocation::InvocationStrategyRef;
use crate::key::TypeKey;
use crate::metadata::ClassMetadata;
use crate::visitor::TypeMetadataVisitor;

// -----------------------------------------------------------------------------
// ClassAttributeBuilder

/// Builds [`ClassAttribute`]s.
///
/// [`build`](Self::build) hands over the staged attribute and starts a blank
/// one, so a builder can be reused.
///
/// # Examples
///
/// ```
/// use pof_meta::ClassAttributeBuilder;
///
/// let mut builder = ClassAttributeBuilder::new();
/// let c = builder.set_index(0).set_name("c").build();
/// let a = builder.set_index(1).set_name("a").build();
///
/// assert_eq!((c.name(), c.index()), ("c", 0));
/// assert_eq!((a.name(), a.index()), ("a", 1));
/// ```
#[derive(Debug, Default)]
pub struct ClassAttributeBuilder {
    attribute: ClassAttribute,
}

impl ClassAttributeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.attribute.set_name(name.into());
        self
    }

    pub fn set_version_id(&mut self, version_id: i32) -> &mut Self {
        self.attribute.set_version_id(version_id);
        self
    }

    /// Sets the wire index; a negative index is resolved when the owning
    /// metadata is built.
    pub fn set_index(&mut self, index: i32) -> &mut Self {
        self.attribute.set_index(index);
        self
    }

    pub fn set_codec(&mut self, codec: CodecRef) -> &mut Self {
        self.attribute.set_codec(codec);
        self
    }

    pub fn set_invocation_strategy(&mut self, invocation: InvocationStrategyRef) -> &mut Self {
        self.attribute.set_invocation_strategy(invocation);
        self
    }

    /// Returns the staged attribute and resets the builder.
    pub fn build(&mut self) -> ClassAttribute {
        mem::take(&mut self.attribute)
    }
}

// -----------------------------------------------------------------------------
// ClassMetadataBuilder

/// Builds [`ClassMetadata`].
///
/// Like [`ClassAttributeBuilder`], [`build`](Self::build) resets the builder.
#[derive(Debug, Default)]
pub struct ClassMetadataBuilder {
    metadata: ClassMetadata,
    type_id: i32,
    version_id: i32,
    hash: i32,
}

impl ClassMetadataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_class(&mut self, class: Arc<Class>) -> &mut Self {
        self.metadata.set_class(class);
        self
    }

    pub fn set_type_id(&mut self, type_id: i32) -> &mut Self {
        self.type_id = type_id;
        self
    }

    pub fn set_version_id(&mut self, version_id: i32) -> &mut Self {
        self.version_id = version_id;
        self
    }

    pub fn set_hash(&mut self, hash: i32) -> &mut Self {
        self.hash = hash;
        self
    }

    /// Adds `attribute`, returning `false` if one with the same name is
    /// already present.
    pub fn add_attribute(&mut self, attribute: ClassAttribute) -> bool {
        self.metadata.add_attribute(attribute)
    }

    /// A fresh attribute builder. Its result still has to be added.
    pub fn new_attribute(&self) -> ClassAttributeBuilder {
        ClassAttributeBuilder::new()
    }

    /// The metadata staged so far.
    pub fn type_metadata(&self) -> &ClassMetadata {
        &self.metadata
    }

    /// Lets `visitor` populate this builder from `class`.
    pub fn accept<V>(&mut self, visitor: &V, class: &Arc<Class>) -> Result<(), MetadataError>
    where
        V: TypeMetadataVisitor + ?Sized,
    {
        visitor.visit(self, class)
    }

    /// Finalizes the key, resolves unassigned indices and returns the
    /// metadata, resetting the builder.
    pub fn build(&mut self) -> ClassMetadata {
        let Self {
            mut metadata,
            type_id,
            version_id,
            hash,
        } = mem::take(self);

        metadata.set_key(TypeKey::new(type_id, version_id, hash));
        metadata.resolve_indices();

        log::debug!(
            "built metadata for {} with {} attributes",
            metadata.key(),
            metadata.attribute_count()
        );
        metadata
    }
}

// -----------------------------------------------------------------------------
// Tests
