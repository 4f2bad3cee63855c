use alloc::string::String;
use core::any::TypeId;

use pof_reflect::ReflectError;
use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Failures while writing or reading a stream.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PofError {
    #[error("unexpected end of stream at offset {0}")]
    UnexpectedEof(usize),

    #[error("invalid value tag {tag} at offset {offset}")]
    InvalidTag { tag: u8, offset: usize },

    #[error("packed integer at offset {0} overflows its type")]
    Overflow(usize),

    #[error("invalid UTF-8 string at offset {0}")]
    InvalidUtf8(usize),

    #[error("property {requested} accessed after property {previous}")]
    PropertyOrder { previous: i32, requested: i32 },

    #[error("no property can be written after the remainder")]
    RemainderWritten,

    #[error("property {index} holds a {actual} value, expected {expected}")]
    TypeMismatch {
        index: i32,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("property {index} was given a value that is not `{expected}`")]
    ValueType { index: i32, expected: &'static str },

    #[error("property {index} has no value for required `{expected}`")]
    MissingValue { index: i32, expected: &'static str },

    #[error("no user type registered with type id {0}")]
    UnknownUserType(i32),

    #[error("no user type registered for {0:?}")]
    UnknownClass(TypeId),

    #[error(transparent)]
    Reflect(#[from] ReflectError),

    #[error("{0}")]
    Custom(String),
}
