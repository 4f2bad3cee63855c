use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use crate::buffer::{BufferReader, BufferWriter};
use crate::context::PofContext;
use crate::error::PofError;
use crate::stream::PofReader;

/// Serializes a registered user type value to its binary form.
pub fn to_binary(context: &PofContext, value: &dyn Any) -> Result<Vec<u8>, PofError> {
    let user_type = context.user_type_of(value.type_id())?;
    let mut writer = BufferWriter::new(context, user_type.type_id());
    user_type.serializer().serialize(&mut writer, value)?;
    let bytes = writer.into_bytes();
    log::trace!("serialized `{}` into {} bytes", user_type.class().name(), bytes.len());
    Ok(bytes)
}

/// Deserializes a user type value from its binary form.
pub fn from_binary(context: &PofContext, bytes: &[u8]) -> Result<Box<dyn Any>, PofError> {
    let mut reader = BufferReader::new(context, bytes)?;
    let user_type = context.user_type(reader.user_type_id())?;
    let value = user_type.serializer().deserialize(&mut reader)?;
    let end = reader.finish()?;
    if end != bytes.len() {
        log::warn!("{} trailing bytes after `{}`", bytes.len() - end, user_type.class().name());
    }
    Ok(value)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use alloc::vec;
    use core::any::TypeId;

    use pof_reflect::Class;

    use super::*;
    use crate::{PofReader, PofSerializer, PofValue, PofWriter};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Point {
        x: i32,
        y: i64,
        label: String,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Pair {
        left: Point,
        right: Option<Point>,
        weight: f64,
    }

    crate::impl_user_type!(Point);

    struct PointSerializer;

    impl PofSerializer for PointSerializer {
        fn serialize(&self, writer: &mut dyn PofWriter, value: &dyn Any) -> Result<(), PofError> {
            let point = value.downcast_ref::<Point>().unwrap();
            writer.write_i32(0, point.x)?;
            writer.write_i64(1, point.y)?;
            writer.write_string(2, &point.label)
        }

        fn deserialize(&self, reader: &mut dyn PofReader) -> Result<Box<dyn Any>, PofError> {
            Ok(Box::new(Point {
                x: reader.read_i32(0)?,
                y: reader.read_i64(1)?,
                label: reader.read_string(2)?,
            }))
        }
    }

    struct PairSerializer;

    impl PofSerializer for PairSerializer {
        fn serialize(&self, writer: &mut dyn PofWriter, value: &dyn Any) -> Result<(), PofError> {
            let pair = value.downcast_ref::<Pair>().unwrap();
            pair.left.write_value(writer, 0)?;
            pair.right.write_value(writer, 1)?;
            writer.write_f64(2, pair.weight)
        }

        fn deserialize(&self, reader: &mut dyn PofReader) -> Result<Box<dyn Any>, PofError> {
            Ok(Box::new(Pair {
                left: Point::read_value(reader, 0)?,
                right: Option::<Point>::read_value(reader, 1)?,
                weight: reader.read_f64(2)?,
            }))
        }
    }

    fn context() -> PofContext {
        let mut context = PofContext::new();
        context
            .register_user_type(
                1,
                Class::builder::<Point>("Point").default_constructor().build(),
                Arc::new(PointSerializer),
            )
            .register_user_type(
                2,
                Class::builder::<Pair>("Pair").default_constructor().build(),
                Arc::new(PairSerializer),
            );
        context
    }

    fn point(x: i32) -> Point {
        Point {
            x,
            y: -(i64::from(x) << 40),
            label: x.to_string(),
        }
    }

    #[test]
    fn nested_values_round_trip() {
        let context = context();
        for right in [Some(point(2)), None] {
            let pair = Pair {
                left: point(1),
                right,
                weight: 0.25,
            };
            let bytes = to_binary(&context, &pair).unwrap();
            let back = from_binary(&context, &bytes).unwrap();
            assert_eq!(back.downcast_ref::<Pair>(), Some(&pair));
        }
    }

    #[test]
    fn unregistered_types_are_rejected() {
        let context = context();
        assert_eq!(
            to_binary(&context, &5_u8),
            Err(PofError::UnknownClass(TypeId::of::<u8>()))
        );

        let bytes = BufferWriter::new(&context, 77).into_bytes();
        assert_eq!(
            from_binary(&context, &bytes).err(),
            Some(PofError::UnknownUserType(77))
        );
    }

    #[test]
    fn indices_must_increase() {
        let context = context();
        let mut writer = BufferWriter::new(&context, 1);
        writer.write_i32(2, 0).unwrap();
        assert_eq!(
            writer.write_i32(2, 0),
            Err(PofError::PropertyOrder {
                previous: 2,
                requested: 2
            })
        );

        writer.write_remainder(None).unwrap();
        assert_eq!(writer.write_i32(3, 0), Err(PofError::RemainderWritten));

        let bytes = BufferWriter::new(&context, 1).into_bytes();
        let mut reader = BufferReader::new(&context, &bytes).unwrap();
        reader.read_i32(1).unwrap();
        assert!(matches!(reader.read_i32(0), Err(PofError::PropertyOrder { .. })));
    }

    #[test]
    fn absent_properties_read_as_defaults() {
        let context = context();
        let mut writer = BufferWriter::new(&context, 1);
        writer.set_version_id(4);
        writer.write_i64(1, 9).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = BufferReader::new(&context, &bytes).unwrap();
        assert_eq!(reader.user_type_id(), 1);
        assert_eq!(reader.version_id(), 4);
        assert_eq!(reader.read_i32(0).unwrap(), 0);
        assert_eq!(reader.read_i64(1).unwrap(), 9);
        assert_eq!(reader.read_string(2).unwrap(), "");
        assert!(reader.read_null(3).unwrap());
        assert_eq!(reader.read_remainder().unwrap(), None);
        assert_eq!(reader.finish().unwrap(), bytes.len());
    }

    #[test]
    fn remainder_carries_unread_properties() {
        let context = context();
        let mut writer = BufferWriter::new(&context, 1);
        writer.write_i32(0, 1).unwrap();
        writer.write_i64(1, 2).unwrap();
        writer.write_string(2, "three").unwrap();
        writer.write_binary(5, &[1, 2, 3]).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = BufferReader::new(&context, &bytes).unwrap();
        assert_eq!(reader.read_i64(1).unwrap(), 2);
        let remainder = reader.read_remainder().unwrap().unwrap();
        assert_eq!(reader.read_remainder().unwrap(), None);

        let mut writer = BufferWriter::new(&context, 1);
        writer.write_i64(1, 20).unwrap();
        writer.write_remainder(Some(&remainder)).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = BufferReader::new(&context, &bytes).unwrap();
        assert_eq!(reader.read_i32(0).unwrap(), 0);
        assert_eq!(reader.read_i64(1).unwrap(), 20);
        assert_eq!(reader.read_string(2).unwrap(), "three");
        assert_eq!(reader.read_binary(5).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn mismatched_tags_are_errors() {
        let context = context();
        let mut writer = BufferWriter::new(&context, 1);
        writer.write_string(0, "zero").unwrap();
        writer.write_i32(1, 1).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = BufferReader::new(&context, &bytes).unwrap();
        assert!(!reader.read_null(0).unwrap());
        assert_eq!(
            reader.read_i32(0),
            Err(PofError::TypeMismatch {
                index: 0,
                expected: "i32",
                actual: "string"
            })
        );
        // i32 widens to i64
        assert_eq!(reader.read_i64(1).unwrap(), 1);
    }

    #[test]
    fn read_object_boxes_natural_types() {
        let context = context();
        let mut writer = BufferWriter::new(&context, 2);
        writer.write_bool(0, true).unwrap();
        writer.write_null(1).unwrap();
        writer.write_object(2, &point(3)).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = BufferReader::new(&context, &bytes).unwrap();
        let flag = reader.read_object(0).unwrap().unwrap();
        assert_eq!(flag.downcast_ref::<bool>(), Some(&true));
        assert!(reader.read_object(1).unwrap().is_none());
        let nested = reader.read_object(2).unwrap().unwrap();
        assert_eq!(nested.downcast_ref::<Point>(), Some(&point(3)));
    }
}
