use bytes::Bytes;

use super::FieldValue;
use super::PortableRecord;
use crate::Error;
use crate::Result;
use crate::SerializationError;

pub trait PortableWriter {
    fn write_utf(
        &mut self,
        name: &str,
        value: &str,
    ) -> Result<()>;

    fn write_bool(
        &mut self,
        name: &str,
        value: bool,
    ) -> Result<()>;

    fn write_long(
        &mut self,
        name: &str,
        value: i64,
    ) -> Result<()>;

    /// Appends an un-named trailing segment.
    fn write_raw_data(
        &mut self,
        data: &[u8],
    ) -> Result<()>;
}

pub trait PortableReader {
    fn read_utf(
        &mut self,
        name: &str,
    ) -> Result<String>;

    fn read_bool(
        &mut self,
        name: &str,
    ) -> Result<bool>;

    fn read_long(
        &mut self,
        name: &str,
    ) -> Result<i64>;

    /// Returns the next un-named segment in write order.
    fn read_raw_data(&mut self) -> Result<Bytes>;
}

/// A type with a stable factory/class identity and a named-field layout.
pub trait Portable: Sized {
    const FACTORY_ID: i32;
    const CLASS_ID: i32;

    fn write_portable(
        &self,
        writer: &mut dyn PortableWriter,
    ) -> Result<()>;

    fn read_portable(reader: &mut dyn PortableReader) -> Result<Self>;
}

pub fn to_bytes<P: Portable>(portable: &P) -> Result<Vec<u8>> {
    let mut writer = FieldWriter::new(P::FACTORY_ID, P::CLASS_ID);
    portable.write_portable(&mut writer)?;
    writer.finish().encode()
}

pub fn from_bytes<P: Portable>(bytes: &[u8]) -> Result<P> {
    let record = PortableRecord::decode(bytes)?;
    record.expect_class(P::FACTORY_ID, P::CLASS_ID)?;
    let mut reader = FieldReader::new(record);
    P::read_portable(&mut reader)
}

#[derive(Debug)]
pub struct FieldWriter {
    record: PortableRecord,
}

impl FieldWriter {
    pub fn new(
        factory_id: i32,
        class_id: i32,
    ) -> Self {
        Self {
            record: PortableRecord::new(factory_id, class_id),
        }
    }

    pub fn finish(self) -> PortableRecord {
        self.record
    }

    fn put(
        &mut self,
        name: &str,
        value: FieldValue,
    ) -> Result<()> {
        match self.record.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.record.fields.push((name.to_string(), value)),
        }
        Ok(())
    }
}

impl PortableWriter for FieldWriter {
    fn write_utf(
        &mut self,
        name: &str,
        value: &str,
    ) -> Result<()> {
        self.put(name, FieldValue::Utf(value.to_string()))
    }

    fn write_bool(
        &mut self,
        name: &str,
        value: bool,
    ) -> Result<()> {
        self.put(name, FieldValue::Bool(value))
    }

    fn write_long(
        &mut self,
        name: &str,
        value: i64,
    ) -> Result<()> {
        self.put(name, FieldValue::Long(value))
    }

    fn write_raw_data(
        &mut self,
        data: &[u8],
    ) -> Result<()> {
        self.record.raw.push(Bytes::copy_from_slice(data));
        Ok(())
    }
}

#[derive(Debug)]
pub struct FieldReader {
    record: PortableRecord,
    raw_cursor: usize,
}

impl FieldReader {
    pub fn new(record: PortableRecord) -> Self {
        Self { record, raw_cursor: 0 }
    }

    fn get(
        &self,
        name: &str,
    ) -> Result<&FieldValue> {
        self.record
            .field(name)
            .ok_or_else(|| SerializationError::MissingField(name.to_string()).into())
    }
}

fn mismatch(
    field: &str,
    expected: &'static str,
    found: &FieldValue,
) -> Error {
    SerializationError::FieldTypeMismatch {
        field: field.to_string(),
        expected,
        found: found.type_name(),
    }
    .into()
}

impl PortableReader for FieldReader {
    fn read_utf(
        &mut self,
        name: &str,
    ) -> Result<String> {
        match self.get(name)? {
            FieldValue::Utf(v) => Ok(v.clone()),
            other => Err(mismatch(name, "utf", other)),
        }
    }

    fn read_bool(
        &mut self,
        name: &str,
    ) -> Result<bool> {
        match self.get(name)? {
            FieldValue::Bool(v) => Ok(*v),
            other => Err(mismatch(name, "bool", other)),
        }
    }

    fn read_long(
        &mut self,
        name: &str,
    ) -> Result<i64> {
        match self.get(name)? {
            FieldValue::Long(v) => Ok(*v),
            other => Err(mismatch(name, "long", other)),
        }
    }

    fn read_raw_data(&mut self) -> Result<Bytes> {
        let segment = self
            .record
            .raw
            .get(self.raw_cursor)
            .cloned()
            .ok_or(SerializationError::RawDataExhausted(self.raw_cursor))?;
        self.raw_cursor += 1;
        Ok(segment)
    }
}
