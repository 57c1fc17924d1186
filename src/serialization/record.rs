use bytes::Bytes;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;
use crate::SerializationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Utf(String),
    Bool(bool),
    Long(i64),
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Utf(_) => "utf",
            FieldValue::Bool(_) => "bool",
            FieldValue::Long(_) => "long",
        }
    }
}

/// Wire image of one portable object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortableRecord {
    pub factory_id: i32,
    pub class_id: i32,
    pub fields: Vec<(String, FieldValue)>,
    pub raw: Vec<Bytes>,
}

impl PortableRecord {
    pub fn new(
        factory_id: i32,
        class_id: i32,
    ) -> Self {
        Self {
            factory_id,
            class_id,
            ..Default::default()
        }
    }

    pub fn field(
        &self,
        name: &str,
    ) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub(crate) fn expect_class(
        &self,
        factory_id: i32,
        class_id: i32,
    ) -> Result<()> {
        if self.factory_id != factory_id || self.class_id != class_id {
            return Err(SerializationError::ClassMismatch {
                expected_factory: factory_id,
                expected_class: class_id,
                factory_id: self.factory_id,
                class_id: self.class_id,
            }
            .into());
        }
        Ok(())
    }
}
