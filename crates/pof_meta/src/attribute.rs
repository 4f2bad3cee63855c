use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use pof_io::{CodecRef, PofError, PofReader, PofWriter};
use pof_reflect::ReflectError;

use crate::invocation::InvocationStrategyRef;

// -----------------------------------------------------------------------------
// ClassAttribute

/// Metadata of one serializable property.
///
/// Attributes compare, order and hash on `(version_id, index, name)`; the
/// codec and invocation strategy take no part in identity.
///
/// Using [`get`](Self::get), [`set`](Self::set), [`encode`](Self::encode) or
/// [`decode`](Self::decode) before the invocation strategy (and, for the
/// latter two, the codec) is set panics.
#[derive(Clone)]
pub struct ClassAttribute {
    name: String,
    version_id: i32,
    index: i32,
    codec: Option<CodecRef>,
    invocation: Option<InvocationStrategyRef>,
}

impl Default for ClassAttribute {
    fn default() -> Self {
        Self {
            name: String::new(),
            version_id: 0,
            index: -1,
            codec: None,
            invocation: None,
        }
    }
}

#[inline(never)]
#[cold]
fn unset(name: &str, what: &str) -> ! {
    panic!("attribute `{name}` is used before its {what} is set");
}

impl ClassAttribute {
    /// The canonical property name, such as `firstName`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version in which this attribute was introduced.
    #[inline]
    pub const fn version_id(&self) -> i32 {
        self.version_id
    }

    /// The property index on the wire; negative while unassigned.
    #[inline]
    pub const fn index(&self) -> i32 {
        self.index
    }

    #[inline]
    pub fn codec(&self) -> Option<&CodecRef> {
        self.codec.as_ref()
    }

    #[inline]
    pub fn invocation_strategy(&self) -> Option<&InvocationStrategyRef> {
        self.invocation.as_ref()
    }

    /// Reads this property from `container`.
    pub fn get(&self, container: &dyn Any) -> Result<Box<dyn Any>, ReflectError> {
        self.strategy().get(container)
    }

    /// Writes this property into `container`.
    pub fn set(&self, container: &mut dyn Any, value: Box<dyn Any>) -> Result<(), ReflectError> {
        self.strategy().set(container, value)
    }

    /// Writes this property of `container` to `writer`.
    pub fn encode(&self, writer: &mut dyn PofWriter, container: &dyn Any) -> Result<(), PofError> {
        let codec = self.codec_or_panic();
        let value = self.get(container)?;
        codec.encode(writer, self.index, &*value)
    }

    /// Reads this property from `reader` into `container`.
    ///
    /// A property the stream holds no value for is left as constructed.
    pub fn decode(&self, reader: &mut dyn PofReader, container: &mut dyn Any) -> Result<(), PofError> {
        let codec = self.codec_or_panic();
        if let Some(value) = codec.decode(reader, self.index)? {
            self.set(container, value)?;
        }
        Ok(())
    }

    fn strategy(&self) -> &InvocationStrategyRef {
        match &self.invocation {
            Some(invocation) => invocation,
            None => unset(&self.name, "invocation strategy"),
        }
    }

    fn codec_or_panic(&self) -> &CodecRef {
        match &self.codec {
            Some(codec) => codec,
            None => unset(&self.name, "codec"),
        }
    }

    // Staging setters, used by the builders.

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_version_id(&mut self, version_id: i32) {
        self.version_id = version_id;
    }

    pub(crate) fn set_index(&mut self, index: i32) {
        self.index = index;
    }

    pub(crate) fn set_codec(&mut self, codec: CodecRef) {
        self.codec = Some(codec);
    }

    pub(crate) fn set_invocation_strategy(&mut self, invocation: InvocationStrategyRef) {
        self.invocation = Some(invocation);
    }
}

impl PartialEq for ClassAttribute {
    fn eq(&self, other: &Self) -> bool {
        self.version_id == other.version_id && self.index == other.index && self.name == other.name
    }
}

impl Eq for ClassAttribute {}

impl Hash for ClassAttribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version_id.hash(state);
        self.index.hash(state);
        self.name.hash(state);
    }
}

impl PartialOrd for ClassAttribute {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClassAttribute {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version_id
            .cmp(&other.version_id)
            .then(self.index.cmp(&other.index))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Debug for ClassAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassAttribute")
            .field("name", &self.name)
            .field("version_id", &self.version_id)
            .field("index", &self.index)
            .field("codec", &self.codec)
            .field("invocation", &self.invocation)
            .finish()
    }
}

impl fmt::Display for ClassAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClassAttribute(name={}, version_id={}, index={})",
            self.name, self.version_id, self.index
        )
    }
}

// -----------------------------------------------------------------------------
// Tests
