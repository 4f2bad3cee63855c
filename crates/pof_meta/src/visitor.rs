use alloc::sync::Arc;

use pof_reflect::Class;

use crate::builder::ClassMetadataBuilder;
use crate::error::MetadataError;

/// A discovery strategy that populates a [`ClassMetadataBuilder`] from a
/// class.
///
/// The builder forwards to it from [`ClassMetadataBuilder::accept`], so the
/// builder stays unaware of how attributes are found.
pub trait TypeMetadataVisitor {
    fn visit(&self, builder: &mut ClassMetadataBuilder, class: &Arc<Class>) -> Result<(), MetadataError>;
}
