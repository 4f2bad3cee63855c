use pof_reflect::ReflectError;
use thiserror::Error;

/// Failures while deriving type metadata.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MetadataError {
    #[error("class `{class}` is not marked portable")]
    NotPortable { class: &'static str },

    #[error("`{class}::{method}` has no explicit index and auto-indexing is disabled")]
    MissingIndex {
        class: &'static str,
        method: &'static str,
    },

    #[error("`{class}::{method}` claims index {index}, already taken by another property")]
    DuplicateIndex {
        class: &'static str,
        method: &'static str,
        index: i32,
    },

    #[error(transparent)]
    Reflect(#[from] ReflectError),
}
