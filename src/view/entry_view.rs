use bytes::Bytes;
use serde::Deserialize;
use serde::Serialize;

use crate::Record;
use crate::RecordValue;

/// Immutable snapshot of a record's value and metadata at one instant.
///
/// Every field is copied out of the record, so later mutations of the record
/// are never visible through an already-returned view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView<V = Bytes> {
    pub key: Bytes,
    pub value: V,
    pub cost: u64,
    pub version: u64,
    pub creation_time: u64,
    pub last_access_time: u64,
    pub last_update_time: u64,
    pub last_stored_time: u64,
    pub expiration_time: Option<u64>,
    pub ttl: i64,
    pub hits: u64,
}

impl<V: RecordValue> EntryView<V> {
    /// Copies the record without recording an access.
    pub fn from_record(record: &Record<V>) -> Self {
        let statistics = record.statistics();
        Self {
            key: record.key().clone(),
            value: record.peek_value().clone(),
            cost: record.cost(),
            version: record.version(),
            creation_time: record.creation_time(),
            last_access_time: record.last_access_time(),
            last_update_time: record.last_update_time(),
            last_stored_time: statistics.last_stored_time,
            expiration_time: record.expiration_time(),
            ttl: record.ttl(),
            hits: statistics.hits,
        }
    }
}
