use bytes::Bytes;

/// Payload stored in a [`Record`](super::Record).
pub trait RecordValue: Clone + Send + Sync + 'static {
    /// Estimated heap footprint in bytes
    fn estimated_cost(&self) -> u64;
}

impl RecordValue for Bytes {
    fn estimated_cost(&self) -> u64 {
        self.len() as u64
    }
}

impl RecordValue for Vec<u8> {
    fn estimated_cost(&self) -> u64 {
        self.capacity() as u64
    }
}

impl RecordValue for String {
    fn estimated_cost(&self) -> u64 {
        self.capacity() as u64
    }
}
