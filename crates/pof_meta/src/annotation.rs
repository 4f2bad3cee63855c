use alloc::sync::Arc;
use alloc::vec::Vec;

use pof_io::accessor::ReflectPofValue;
use pof_io::{CodecRef, Codecs};
use pof_reflect::Class;

use crate::builder::ClassMetadataBuilder;
use crate::error::MetadataError;
use crate::invocation::MethodInvocationStrategy;
use crate::visitor::TypeMetadataVisitor;

// -----------------------------------------------------------------------------
// Markers

/// Class marker: the class can be serialized from its annotations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Portable;

/// Accessor marker: the property is serialized, at `index` if given.
///
/// # Examples
///
/// ```
/// use pof_meta::PortableProperty;
///
/// assert_eq!(PortableProperty::new(2).index(), Some(2));
/// assert_eq!(PortableProperty::implied().index(), None);
/// assert_eq!(PortableProperty::new(-1).index(), None);
/// ```
#[derive(Debug, Clone)]
pub struct PortableProperty {
    index: i32,
    codec: Option<CodecRef>,
}

impl PortableProperty {
    /// A property at an explicit index; a negative index is implied.
    pub const fn new(index: i32) -> Self {
        Self { index, codec: None }
    }

    /// A property whose index is assigned by auto-indexing.
    pub const fn implied() -> Self {
        Self::new(-1)
    }

    /// Overrides the codec inferred from the accessor's value type.
    pub fn with_codec(mut self, codec: CodecRef) -> Self {
        self.codec = Some(codec);
        self
    }

    #[inline]
    pub fn index(&self) -> Option<i32> {
        (self.index >= 0).then_some(self.index)
    }

    #[inline]
    pub fn codec(&self) -> Option<&CodecRef> {
        self.codec.as_ref()
    }
}

// -----------------------------------------------------------------------------
// AnnotationVisitor

/// Discovers the attributes of a [`Portable`] class from the
/// [`PortableProperty`] markers on its accessors.
///
/// A property may be marked on its getter, its setter or both; the first
/// marked accessor in declaration order defines it. Superclass accessors are
/// visited before the class's own, most distant superclass first.
///
/// With auto-indexing, properties without an explicit index receive, in
/// declaration order, the smallest non-negative index no other property of
/// the class claims. Without it, such a property is a
/// [`MetadataError::MissingIndex`]. Two properties claiming the same explicit
/// index are a [`MetadataError::DuplicateIndex`].
///
/// The codec is the marker's, else the one inferred for the accessor pair's
/// value type (see [`pof_io::accessor`]), else [`Codecs::default_codec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationVisitor {
    auto_index: bool,
}

impl AnnotationVisitor {
    pub const fn new(auto_index: bool) -> Self {
        Self { auto_index }
    }

    #[inline]
    pub const fn auto_index(&self) -> bool {
        self.auto_index
    }
}

impl TypeMetadataVisitor for AnnotationVisitor {
    fn visit(&self, builder: &mut ClassMetadataBuilder, class: &Arc<Class>) -> Result<(), MetadataError> {
        if !class.has_marker::<Portable>() {
            log::warn!("skipping `{}`: not marked portable", class.name());
            return Ok(());
        }
        builder.set_class(class.clone());

        let mut lineage: Vec<&Arc<Class>> = class.superclasses().collect();
        lineage.reverse();
        lineage.push(class);

        let marked = || {
            lineage
                .iter()
                .flat_map(|c| c.declared_methods())
                .filter_map(|method| {
                    let property = method.get_marker::<PortableProperty>()?;
                    let name = method.property_name()?;
                    Some((method, property, name))
                })
        };

        let mut claimed: Vec<i32> = Vec::new();
        let mut excluded = Vec::new();
        for (method, property, name) in marked() {
            if excluded.contains(&name) {
                continue;
            }
            if let Some(index) = property.index() {
                if claimed.contains(&index) {
                    return Err(MetadataError::DuplicateIndex {
                        class: class.name(),
                        method: method.name(),
                        index,
                    });
                }
                claimed.push(index);
            }
            excluded.push(name);
        }
        excluded.clear();
        let mut next = 0;

        for (method, property, name) in marked() {
            if excluded.contains(&name) {
                continue;
            }

            let (index, implied) = match property.index() {
                Some(index) => (index, false),
                None if self.auto_index => {
                    while claimed.contains(&next) {
                        next += 1;
                    }
                    claimed.push(next);
                    (next, true)
                }
                None => {
                    return Err(MetadataError::MissingIndex {
                        class: class.name(),
                        method: method.name(),
                    });
                }
            };

            let mut strategy = MethodInvocationStrategy::from_method(method)?;
            if method.class_type_id() != class.ty_id() {
                strategy = strategy.through(class.clone());
            }
            let codec = property
                .codec()
                .cloned()
                .or_else(|| {
                    [strategy.getter(), strategy.setter()]
                        .into_iter()
                        .find_map(|m| m.get_trait::<ReflectPofValue>())
                        .map(ReflectPofValue::codec)
                })
                .unwrap_or_else(Codecs::default_codec);

            log::trace!(
                "`{}`: property `{name}` at index {index}{}",
                class.name(),
                if implied { " (implied)" } else { "" }
            );

            let attribute = builder
                .new_attribute()
                .set_name(name.clone())
                .set_index(index)
                .set_codec(codec)
                .set_invocation_strategy(Arc::new(strategy))
                .build();
            builder.add_attribute(attribute);
            excluded.push(name);
        }

        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
