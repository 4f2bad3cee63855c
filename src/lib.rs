#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use pof_io as io;
pub use pof_meta as meta;
pub use pof_reflect as reflect;
pub use pof_utils as utils;
