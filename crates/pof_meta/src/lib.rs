#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod annotation;
mod attribute;
mod builder;
mod error;
mod invocation;
mod key;
mod metadata;
mod schema;
mod serializer;
mod visitor;

#[cfg(test)]
pub(crate) mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use annotation::{AnnotationVisitor, Portable, PortableProperty};
pub use attribute::ClassAttribute;
pub use builder::{ClassAttributeBuilder, ClassMetadataBuilder};
pub use error::MetadataError;
pub use invocation::{InvocationStrategy, InvocationStrategyRef, MethodInvocationStrategy};
pub use key::TypeKey;
pub use metadata::ClassMetadata;
pub use serializer::PofAnnotationSerializer;
pub use visitor::TypeMetadataVisitor;
