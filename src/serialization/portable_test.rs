use bytes::Bytes;

use super::*;
use crate::Error;
use crate::SerializationError;

#[derive(Debug, PartialEq)]
struct Sample {
    name: String,
    flag: bool,
    counter: i64,
    first: Bytes,
    second: Bytes,
}

impl Portable for Sample {
    const FACTORY_ID: i32 = 1;
    const CLASS_ID: i32 = 2;

    fn write_portable(
        &self,
        writer: &mut dyn PortableWriter,
    ) -> crate::Result<()> {
        writer.write_utf("n", &self.name)?;
        writer.write_bool("f", self.flag)?;
        writer.write_long("c", self.counter)?;
        writer.write_raw_data(&self.first)?;
        writer.write_raw_data(&self.second)
    }

    fn read_portable(reader: &mut dyn PortableReader) -> crate::Result<Self> {
        // named fields may be read in any order
        let counter = reader.read_long("c")?;
        let flag = reader.read_bool("f")?;
        let name = reader.read_utf("n")?;
        let first = reader.read_raw_data()?;
        let second = reader.read_raw_data()?;
        Ok(Self {
            name,
            flag,
            counter,
            first,
            second,
        })
    }
}

fn sample() -> Sample {
    Sample {
        name: "orders".to_string(),
        flag: true,
        counter: -42,
        first: Bytes::from_static(b"key-1"),
        second: Bytes::from_static(b"key-2"),
    }
}

#[test]
fn test_named_fields_and_raw_segments_survive_the_wire() {
    let bytes = to_bytes(&sample()).unwrap();
    let decoded: Sample = from_bytes(&bytes).unwrap();
    assert_eq!(decoded, sample());
}

#[test]
fn test_raw_segments_keep_write_order() {
    let mut writer = FieldWriter::new(1, 2);
    writer.write_raw_data(b"a").unwrap();
    writer.write_raw_data(b"b").unwrap();
    let mut reader = FieldReader::new(writer.finish());

    assert_eq!(reader.read_raw_data().unwrap(), Bytes::from_static(b"a"));
    assert_eq!(reader.read_raw_data().unwrap(), Bytes::from_static(b"b"));
    assert!(matches!(
        reader.read_raw_data(),
        Err(Error::Serialization(SerializationError::RawDataExhausted(2)))
    ));
}

#[test]
fn test_missing_field() {
    let mut reader = FieldReader::new(PortableRecord::new(1, 2));
    assert!(matches!(
        reader.read_utf("n"),
        Err(Error::Serialization(SerializationError::MissingField(f))) if f == "n"
    ));
}

#[test]
fn test_field_type_mismatch() {
    let mut writer = FieldWriter::new(1, 2);
    writer.write_bool("i", true).unwrap();
    let mut reader = FieldReader::new(writer.finish());

    match reader.read_long("i") {
        Err(Error::Serialization(SerializationError::FieldTypeMismatch { field, expected, found })) => {
            assert_eq!(field, "i");
            assert_eq!(expected, "long");
            assert_eq!(found, "bool");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_rewriting_a_field_replaces_it() {
    let mut writer = FieldWriter::new(1, 2);
    writer.write_utf("n", "first").unwrap();
    writer.write_utf("n", "second").unwrap();
    let record = writer.finish();

    assert_eq!(record.fields.len(), 1);
    assert_eq!(record.field("n"), Some(&FieldValue::Utf("second".to_string())));
}

#[test]
fn test_class_mismatch_is_rejected() {
    let bytes = FieldWriter::new(9, 9).finish().encode().unwrap();
    assert!(matches!(
        from_bytes::<Sample>(&bytes),
        Err(Error::Serialization(SerializationError::ClassMismatch { factory_id: 9, .. }))
    ));
}

#[test]
fn test_garbage_input_is_a_bincode_error() {
    assert!(matches!(
        PortableRecord::decode(&[0xff]),
        Err(Error::Serialization(SerializationError::Bincode(_)))
    ));
}
