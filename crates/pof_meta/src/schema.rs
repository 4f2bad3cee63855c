//! `serde` export of derived metadata.
//!
//! Only identity is exported: codecs and invocation strategies are runtime
//! bindings with no serialized form.

use serde_core::ser::{SerializeSeq, SerializeStruct};
use serde_core::{Serialize, Serializer};

use crate::attribute::ClassAttribute;
use crate::key::TypeKey;
use crate::metadata::ClassMetadata;

impl Serialize for TypeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TypeKey", 3)?;
        state.serialize_field("type_id", &self.type_id())?;
        state.serialize_field("version_id", &self.version_id())?;
        state.serialize_field("hash", &self.hash())?;
        state.end()
    }
}

impl Serialize for ClassAttribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ClassAttribute", 3)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("version_id", &self.version_id())?;
        state.serialize_field("index", &self.index())?;
        state.end()
    }
}

/// Serializes the attributes in canonical order.
struct Attributes<'a>(&'a ClassMetadata);

impl Serialize for Attributes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.attribute_count()))?;
        for attribute in self.0.attributes() {
            seq.serialize_element(attribute)?;
        }
        seq.end()
    }
}

impl Serialize for ClassMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ClassMetadata", 3)?;
        state.serialize_field("class", &self.class().map(|c| c.name()))?;
        state.serialize_field("key", self.key())?;
        state.serialize_field("attributes", &Attributes(self))?;
        state.end()
    }
}
