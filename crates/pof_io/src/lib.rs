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

mod buffer;
mod codec;
mod context;
mod error;
mod evolvable;
mod helper;
mod stream;
mod value;

pub mod accessor;

#[doc(hidden)]
pub mod __macro_exports {
    pub use alloc::vec::Vec;
}

// -----------------------------------------------------------------------------
// Top-Level exports

pub use buffer::{BufferReader, BufferWriter, Tag};
pub use codec::{Codec, CodecRef, Codecs, DefaultCodec, TypedCodec};
pub use context::{PofContext, PofSerializer, UserType};
pub use error::PofError;
pub use evolvable::{Evolvable, EvolvableState, ReflectEvolvable};
pub use helper::{from_binary, to_binary};
pub use stream::{PofReader, PofWriter};
pub use value::{PofValue, read_user_type};
