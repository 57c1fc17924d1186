use serde::Deserialize;
use serde::Serialize;

/// Access counters owned by one record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStatistics {
    /// Number of reads through `get_value`
    pub hits: u64,
    /// Last time the record was handed to durable storage
    pub last_stored_time: u64,
}

impl RecordStatistics {
    pub(crate) fn on_access(&mut self) {
        self.hits = self.hits.saturating_add(1);
    }

    pub(crate) fn on_store(
        &mut self,
        now: u64,
    ) {
        self.last_stored_time = now;
    }
}
