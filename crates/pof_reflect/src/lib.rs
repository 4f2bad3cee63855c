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

mod accessor;
mod class;
mod class_trait;
mod error;
mod markers;
mod method;

pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use inventory;
}

pub use accessor::{AccessorKind, accessor_prefix, complement_names, property_name};
pub use class::{Class, ClassBuilder};
pub use class_trait::{ClassTrait, FromType, TraitTable};
pub use error::ReflectError;
pub use markers::{Marker, Markers};
pub use method::Method;
