use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;

use pof_io::{PofError, PofReader, PofSerializer, PofWriter, ReflectEvolvable};
use pof_reflect::{Class, ReflectError};

use crate::annotation::{AnnotationVisitor, Portable};
use crate::builder::ClassMetadataBuilder;
use crate::error::MetadataError;
use crate::metadata::ClassMetadata;

// -----------------------------------------------------------------------------
// PofAnnotationSerializer

/// A [`PofSerializer`] driven by the [`ClassMetadata`] of a [`Portable`]
/// class.
///
/// The metadata is derived once, on construction. When the class carries a
/// [`ReflectEvolvable`] capability, the written version id is the larger of
/// the value's data and implementation versions, and unread properties are
/// kept as the value's future data.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use pof_io::accessor::{getter, setter};
/// use pof_io::{PofContext, from_binary, to_binary};
/// use pof_meta::{PofAnnotationSerializer, Portable, PortableProperty};
/// use pof_reflect::Class;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let class = Class::builder::<Point>("Point")
///     .default_constructor()
///     .marker(Portable)
///     .method(getter("getX", |p: &Point| p.x).with_marker(PortableProperty::new(0)))
///     .method(setter("setX", |p: &mut Point, v: i32| p.x = v))
///     .method(getter("getY", |p: &Point| p.y).with_marker(PortableProperty::new(1)))
///     .method(setter("setY", |p: &mut Point, v: i32| p.y = v))
///     .build();
///
/// let serializer = PofAnnotationSerializer::new(7, class.clone()).unwrap();
/// assert_eq!(serializer.type_metadata().attribute_count(), 2);
///
/// let mut context = PofContext::new();
/// context.register_user_type(7, class, Arc::new(serializer));
///
/// let bytes = to_binary(&context, &Point { x: 3, y: -4 }).unwrap();
/// let back = from_binary(&context, &bytes).unwrap();
/// assert_eq!(back.downcast_ref::<Point>(), Some(&Point { x: 3, y: -4 }));
/// ```
#[derive(Debug)]
pub struct PofAnnotationSerializer {
    type_id: i32,
    metadata: ClassMetadata,
    evolvable: Option<ReflectEvolvable>,
}

impl PofAnnotationSerializer {
    /// Requires an explicit index on every property.
    pub fn new(type_id: i32, class: Arc<Class>) -> Result<Self, MetadataError> {
        Self::with_auto_index(type_id, class, false)
    }

    pub fn with_auto_index(
        type_id: i32,
        class: Arc<Class>,
        auto_index: bool,
    ) -> Result<Self, MetadataError> {
        if !class.has_marker::<Portable>() {
            return Err(MetadataError::NotPortable { class: class.name() });
        }

        let mut builder = ClassMetadataBuilder::new();
        builder.set_type_id(type_id);
        builder.accept(&AnnotationVisitor::new(auto_index), &class)?;
        let metadata = builder.build();

        Ok(Self {
            type_id,
            evolvable: class.get_trait::<ReflectEvolvable>().copied(),
            metadata,
        })
    }

    #[inline]
    pub fn type_id(&self) -> i32 {
        self.type_id
    }

    #[inline]
    pub fn type_metadata(&self) -> &ClassMetadata {
        &self.metadata
    }

    fn check_instance(&self, value: &dyn Any) -> Result<(), PofError> {
        match self.metadata.class() {
            Some(class) if !class.is_instance(value) => Err(ReflectError::ContainerMismatch {
                class: class.type_name(),
                actual: value.type_id(),
            }
            .into()),
            _ => Ok(()),
        }
    }
}

impl PofSerializer for PofAnnotationSerializer {
    fn serialize(&self, writer: &mut dyn PofWriter, value: &dyn Any) -> Result<(), PofError> {
        self.check_instance(value)?;

        let evolvable = self.evolvable.as_ref().and_then(|e| e.get(value));
        if let Some(evolvable) = evolvable {
            writer.set_version_id(evolvable.data_version().max(evolvable.impl_version()));
        }

        for attribute in self.metadata.attributes() {
            attribute.encode(writer, value)?;
        }

        writer.write_remainder(evolvable.and_then(|e| e.future_data()))
    }

    fn deserialize(&self, reader: &mut dyn PofReader) -> Result<Box<dyn Any>, PofError> {
        let mut value = self.metadata.new_instance()?;

        if let Some(evolvable) = self.evolvable.as_ref().and_then(|e| e.get_mut(&mut *value)) {
            evolvable.set_data_version(reader.version_id());
        }

        for attribute in self.metadata.attributes() {
            attribute.decode(reader, &mut *value)?;
        }

        let remainder = reader.read_remainder()?;
        if let Some(evolvable) = self.evolvable.as_ref().and_then(|e| e.get_mut(&mut *value)) {
            evolvable.set_future_data(remainder);
        }

        Ok(value)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use pof_io::{Evolvable, PofContext, from_binary, to_binary};

    use super::*;
    use crate::fixtures::*;

    fn register(context: &mut PofContext, type_id: i32, class: Arc<Class>) {
        let serializer = PofAnnotationSerializer::with_auto_index(type_id, class.clone(), true).unwrap();
        context.register_user_type(type_id, class, Arc::new(serializer));
    }

    fn round_trip<T: Any>(context: &PofContext, value: &T) -> Box<T> {
        let bytes = to_binary(context, value).unwrap();
        from_binary(context, &bytes).unwrap().downcast::<T>().unwrap()
    }

    #[test]
    fn poffed_metadata() {
        let serializer = PofAnnotationSerializer::new(1001, poffed_class()).unwrap();
        let metadata = serializer.type_metadata();
        assert_eq!(serializer.type_id(), 1001);
        assert_eq!(metadata.type_id(), 1001);
        assert_eq!(metadata.version_id(), 0);
        assert_eq!(metadata.get_attribute("firstName").unwrap().index(), 2);
    }

    #[test]
    fn metadata_is_deterministic() {
        let a = PofAnnotationSerializer::new(1001, poffed_class()).unwrap();
        let b = PofAnnotationSerializer::new(1001, poffed_class()).unwrap();
        assert_eq!(a.type_metadata(), b.type_metadata());
        assert_eq!(
            pof_utils::hash::fixed_hash(a.type_metadata()),
            pof_utils::hash::fixed_hash(b.type_metadata())
        );
    }

    #[test]
    fn non_portable_class_is_rejected() {
        assert_eq!(
            PofAnnotationSerializer::new(1, unmarked_class()).unwrap_err(),
            MetadataError::NotPortable { class: "Unmarked" }
        );
    }

    #[test]
    fn serialization_round_trip() {
        let mut context = PofContext::new();
        let serializer = PofAnnotationSerializer::new(1001, poffed_class()).unwrap();
        context.register_user_type(1001, poffed_class(), Arc::new(serializer));
        register(&mut context, 1004, child_class());

        let mut person = Poffed::new("Frank", "Spencer", 57);
        person.adult = true;
        let back = round_trip(&context, &person);
        assert_eq!(back.first_name, "Frank");
        assert_eq!(back.last_name, "Spencer");
        assert_eq!(back.age, 57);
        assert!(back.adult);

        let child = Child::new("Betty", "Spencer", 55);
        assert_eq!(*round_trip(&context, &child), child);
    }

    #[test]
    fn ancestry_round_trip() {
        let classes = registry();
        let mut context = PofContext::new();
        register(&mut context, 1002, load::<GrandFather>(&classes));
        register(&mut context, 1003, load::<Father>(&classes));
        register(&mut context, 1004, load::<Child>(&classes));

        let son = Child::new("Bart", "Simpson", 10);
        let dad = Father::new("Homer", "Simpson", 50, Some(son));
        let grand_father = GrandFather::new("Abe", "Simpson", 100, Some(dad.clone()));

        let back = round_trip(&context, &grand_father);
        assert_eq!(*back, grand_father);
        let father = back.father.as_ref().unwrap();
        assert_eq!(father.first_name, "Homer");
        assert_eq!(father.child.as_ref().unwrap().first_name, "Bart");

        let orphan = Father::new("Ned", "Flanders", 60, None);
        assert_eq!(*round_trip(&context, &orphan), orphan);
    }

    #[test]
    fn evolution_between_versions() {
        let classes = registry();
        let mut v1 = PofContext::new();
        let mut v2 = PofContext::new();
        register(&mut v1, 1001, load::<PersonV1>(&classes));
        register(&mut v2, 1001, load::<PersonV2>(&classes));

        let original = PersonV1::new("Frank", "Spencer", 57);

        // 1 => 2
        let mut teleported_v2: PersonV2 =
            *from_binary(&v2, &to_binary(&v1, &original).unwrap()).unwrap().downcast().unwrap();
        assert_eq!(teleported_v2.first_name, "Frank");
        assert_eq!(teleported_v2.last_name, "Spencer");
        assert_eq!(teleported_v2.age, 57);
        assert_eq!(teleported_v2.male, None);
        assert_eq!(teleported_v2.data_version(), 0);

        // 2 => 1
        teleported_v2.male = Some(true);
        let bytes = to_binary(&v2, &teleported_v2).unwrap();
        let teleported_v1: PersonV1 = *from_binary(&v1, &bytes).unwrap().downcast().unwrap();
        assert!(teleported_v1.future_data().is_some());
        assert_eq!(teleported_v1.data_version(), 1);
        assert_eq!(teleported_v1.first_name, original.first_name);
        assert_eq!(teleported_v1.age, original.age);

        // 1 => 2, carrying what 1 did not understand
        let back_v2: PersonV2 =
            *from_binary(&v2, &to_binary(&v1, &teleported_v1).unwrap()).unwrap().downcast().unwrap();
        assert_eq!(back_v2.first_name, original.first_name);
        assert_eq!(back_v2.last_name, original.last_name);
        assert_eq!(back_v2.age, original.age);
        assert_eq!(back_v2.male, Some(true));
        assert_eq!(back_v2.future_data(), None);
    }

    #[test]
    fn future_data_survives_same_version_round_trip() {
        let mut context = PofContext::new();
        register(&mut context, 1001, person_v1_class());

        let mut person = PersonV1::new("Ada", "Lovelace", 36);
        let unknown = {
            let mut writer = pof_io::BufferWriter::new(&context, 0);
            writer.write_string(9, "x").unwrap();
            let bytes = writer.into_bytes();
            // strip the one-byte type id, version id and terminator
            bytes[2..bytes.len() - 1].to_vec()
        };
        person.set_future_data(Some(unknown.clone()));

        let back = round_trip(&context, &person);
        assert_eq!(back.future_data(), Some(&unknown[..]));
        assert_eq!(back.first_name, "Ada");
    }

    #[test]
    fn foreign_values_are_rejected() {
        let serializer = PofAnnotationSerializer::new(1001, poffed_class()).unwrap();
        let context = PofContext::new();
        let mut writer = pof_io::BufferWriter::new(&context, 1001);
        let err = serializer.serialize(&mut writer, &String::from("nope")).unwrap_err();
        assert!(matches!(err, PofError::Reflect(ReflectError::ContainerMismatch { .. })));
    }

    #[test]
    fn inherited_properties_round_trip() {
        let classes = registry();
        let person = load::<Poffed>(&classes);
        let bewildered = load::<BewilderedPerson>(&classes);
        assert!(Arc::ptr_eq(bewildered.superclass().unwrap(), &person));

        let mut context = PofContext::new();
        register(&mut context, 1001, person);
        register(&mut context, 1005, bewildered.clone());

        let serializer = PofAnnotationSerializer::with_auto_index(1005, bewildered, true).unwrap();
        let names: Vec<_> = serializer
            .type_metadata()
            .attributes()
            .map(|a| (a.name(), a.index()))
            .collect();
        assert_eq!(
            names,
            [("lastName", 0), ("age", 1), ("firstName", 2), ("adult", 3), ("state", 4)]
        );

        let person = BewilderedPerson::new("Frank", "Spencer", 57, "dizzy");
        let back = round_trip(&context, &person);
        assert_eq!(back.person.first_name, "Frank");
        assert_eq!(back.person.last_name, "Spencer");
        assert_eq!(back.person.age, 57);
        assert_eq!(back.state, "dizzy");
    }

    #[test]
    fn duplicate_index_fails_construction() {
        assert!(matches!(
            PofAnnotationSerializer::with_auto_index(1006, clashing_indices_class(), true),
            Err(MetadataError::DuplicateIndex { index: 1, .. })
        ));
    }

    #[test]
    fn marker_codec_is_invoked() {
        let codec = Arc::new(AliasesCodec::default());
        let mut context = PofContext::new();
        register(&mut context, 1007, custom_codec_class(codec.clone()));

        let person = PoffedCustomCodec {
            first_name: "Frank".into(),
            last_name: "Spencer".into(),
            age: 57,
            aliases: ["Francis", "Frankie"].map(String::from).to_vec(),
        };
        let back = round_trip(&context, &person);
        assert_eq!(*back, person);
        assert_eq!(codec.encoded.load(core::sync::atomic::Ordering::Relaxed), 1);
        assert_eq!(codec.decoded.load(core::sync::atomic::Ordering::Relaxed), 1);

        let empty = PoffedCustomCodec::default();
        assert_eq!(*round_trip(&context, &empty), empty);
        assert_eq!(codec.encoded.load(core::sync::atomic::Ordering::Relaxed), 2);
    }
}
