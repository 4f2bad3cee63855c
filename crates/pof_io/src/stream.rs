use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::context::PofContext;
use crate::error::PofError;

// -----------------------------------------------------------------------------
// PofWriter

/// Writes the properties of one user type value.
///
/// Property indices must be written in strictly increasing order. The
/// version id may be set at any time before the writer is finished; the
/// remainder, if any, is written last.
pub trait PofWriter {
    /// The context used to resolve nested user types.
    fn context(&self) -> &PofContext;

    /// The type id of the user type being written.
    fn user_type_id(&self) -> i32;

    /// The version id of the user type being written, `0` unless set.
    fn version_id(&self) -> i32;

    /// Sets the version id of the user type being written.
    fn set_version_id(&mut self, version_id: i32);

    fn write_null(&mut self, index: i32) -> Result<(), PofError>;

    fn write_bool(&mut self, index: i32, value: bool) -> Result<(), PofError>;

    fn write_i32(&mut self, index: i32, value: i32) -> Result<(), PofError>;

    fn write_i64(&mut self, index: i32, value: i64) -> Result<(), PofError>;

    fn write_f64(&mut self, index: i32, value: f64) -> Result<(), PofError>;

    fn write_string(&mut self, index: i32, value: &str) -> Result<(), PofError>;

    fn write_binary(&mut self, index: i32, value: &[u8]) -> Result<(), PofError>;

    /// Writes a value whose concrete type is registered as a user type in
    /// the [`context`](Self::context).
    fn write_object(&mut self, index: i32, value: &dyn Any) -> Result<(), PofError>;

    /// Appends properties preserved from a newer version of this type.
    ///
    /// `None` (or an empty slice) writes nothing. No property can be written
    /// afterwards.
    fn write_remainder(&mut self, remainder: Option<&[u8]>) -> Result<(), PofError>;
}

// -----------------------------------------------------------------------------
// PofReader

/// Reads the properties of one user type value.
///
/// Property indices must be read in strictly increasing order. Properties
/// skipped over are dropped; properties after the last one read are
/// returned by [`read_remainder`](Self::read_remainder).
///
/// Absent properties read as the type's default (`false`, `0`, empty).
pub trait PofReader {
    /// The context used to resolve nested user types.
    fn context(&self) -> &PofContext;

    /// The type id of the user type being read.
    fn user_type_id(&self) -> i32;

    /// The version id the writer recorded for this value.
    fn version_id(&self) -> i32;

    /// Returns `true` and consumes the property if it is absent or an
    /// explicit null. Returns `false`, consuming nothing, otherwise.
    fn read_null(&mut self, index: i32) -> Result<bool, PofError>;

    fn read_bool(&mut self, index: i32) -> Result<bool, PofError>;

    fn read_i32(&mut self, index: i32) -> Result<i32, PofError>;

    fn read_i64(&mut self, index: i32) -> Result<i64, PofError>;

    fn read_f64(&mut self, index: i32) -> Result<f64, PofError>;

    fn read_string(&mut self, index: i32) -> Result<String, PofError>;

    fn read_binary(&mut self, index: i32) -> Result<Vec<u8>, PofError>;

    /// Reads any value, boxed as its natural Rust type (`bool`, `i32`, `i64`,
    /// `f64`, `String`, `Vec<u8>`, or the registered user type).
    ///
    /// Returns `None` for an absent property or an explicit null.
    fn read_object(&mut self, index: i32) -> Result<Option<Box<dyn Any>>, PofError>;

    /// Consumes every remaining property and returns their raw bytes,
    /// or `None` if there were none.
    fn read_remainder(&mut self) -> Result<Option<Vec<u8>>, PofError>;
}
