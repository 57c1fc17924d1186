use std::cmp::max;
use std::sync::Arc;

use bytes::Bytes;
use serde::Deserialize;
use serde::Serialize;
use tracing::trace;

use super::CachedValue;
use super::CachedValueLease;
use super::CachedValueSlot;
use super::RecordStatistics;
use super::RecordValue;
use crate::constants::RECORD_OVERHEAD_BYTES;

/// Metadata used to rebuild a record during replay or migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordState {
    pub version: u64,
    pub sequence: u64,
    pub creation_time: u64,
    pub last_access_time: u64,
    pub last_update_time: u64,
    pub ttl: i64,
    /// Explicit expiration instant overriding `last_update_time + ttl`
    pub expiration_time: Option<u64>,
    pub eviction_criteria_number: u64,
    pub statistics: RecordStatistics,
}

/// One stored key/value pair inside a single partition's map segment.
///
/// Timestamps are milliseconds supplied by the owning store's clock.
/// `version` and `sequence` never decrease for the lifetime of the instance.
#[derive(Debug)]
pub struct Record<V: RecordValue> {
    key: Bytes,
    value: V,
    version: u64,
    sequence: u64,
    creation_time: u64,
    last_access_time: u64,
    last_update_time: u64,
    ttl: i64,
    expiration_time: Option<u64>,
    eviction_criteria_number: u64,
    cost: u64,
    statistics: RecordStatistics,
    cached: Arc<CachedValueSlot>,
}

impl<V: RecordValue> Record<V> {
    pub fn new(
        key: Bytes,
        value: V,
        now: u64,
    ) -> Self {
        let cost = estimate_cost(&key, &value);
        Self {
            key,
            value,
            version: 0,
            sequence: 0,
            creation_time: now,
            last_access_time: now,
            last_update_time: now,
            ttl: 0,
            expiration_time: None,
            eviction_criteria_number: 0,
            cost,
            statistics: RecordStatistics::default(),
            cached: Arc::new(CachedValueSlot::new()),
        }
    }

    /// Rebuilds a record from replayed metadata.
    ///
    /// Access and update times below the creation time are clamped up to it.
    pub fn restore(
        key: Bytes,
        value: V,
        state: RecordState,
    ) -> Self {
        let cost = estimate_cost(&key, &value);
        Self {
            key,
            value,
            version: state.version,
            sequence: state.sequence,
            creation_time: state.creation_time,
            last_access_time: max(state.last_access_time, state.creation_time),
            last_update_time: max(state.last_update_time, state.creation_time),
            ttl: state.ttl,
            expiration_time: state.expiration_time,
            eviction_criteria_number: state.eviction_criteria_number,
            cost,
            statistics: state.statistics,
            cached: Arc::new(CachedValueSlot::new()),
        }
    }

    /// Exports the metadata needed by [`Record::restore`].
    pub fn state(&self) -> RecordState {
        RecordState {
            version: self.version,
            sequence: self.sequence,
            creation_time: self.creation_time,
            last_access_time: self.last_access_time,
            last_update_time: self.last_update_time,
            ttl: self.ttl,
            expiration_time: self.expiration_time,
            eviction_criteria_number: self.eviction_criteria_number,
            statistics: self.statistics,
        }
    }

    pub fn key(&self) -> &Bytes {
        &self.key
    }

    /// Returns the current value and records the access.
    pub fn get_value(
        &mut self,
        now: u64,
    ) -> &V {
        self.on_access(now);
        &self.value
    }

    /// Returns the current value without touching access bookkeeping.
    pub fn peek_value(&self) -> &V {
        &self.value
    }

    /// Replaces the value wholesale.
    ///
    /// Bumps the version by one, recomputes the cost, refreshes the update
    /// time and resets the cached slot to "not computed".
    pub fn set_value(
        &mut self,
        value: V,
        now: u64,
    ) {
        self.value = value;
        self.version += 1;
        self.cost = estimate_cost(&self.key, &self.value);
        self.on_update(now);
        self.cached.invalidate();
        trace!(version = self.version, cost = self.cost, "record value replaced");
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Assigns the replay sequence of the latest durable mutation.
    ///
    /// Lower values are ignored.
    pub fn set_sequence(
        &mut self,
        sequence: u64,
    ) {
        if sequence < self.sequence {
            trace!(current = self.sequence, sequence, "ignoring stale sequence");
            return;
        }
        self.sequence = sequence;
    }

    pub fn creation_time(&self) -> u64 {
        self.creation_time
    }

    pub fn last_access_time(&self) -> u64 {
        self.last_access_time
    }

    pub fn last_update_time(&self) -> u64 {
        self.last_update_time
    }

    /// Never moves the access time backwards, even if `now` does.
    pub fn on_access(
        &mut self,
        now: u64,
    ) {
        self.last_access_time = max(now, self.last_access_time);
        self.statistics.on_access();
    }

    /// Never moves the update time backwards, even if `now` does.
    pub fn on_update(
        &mut self,
        now: u64,
    ) {
        self.last_update_time = max(now, self.last_update_time);
    }

    pub fn on_store(
        &mut self,
        now: u64,
    ) {
        self.statistics.on_store(now);
    }

    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    /// Stores the time-to-live in milliseconds. `<= 0` disables expiration.
    pub fn set_ttl(
        &mut self,
        ttl: i64,
    ) {
        self.ttl = ttl;
    }

    /// Overrides the `last_update_time + ttl` rule with an explicit instant.
    pub fn set_expiration_time(
        &mut self,
        expiration_time: Option<u64>,
    ) {
        self.expiration_time = expiration_time;
    }

    /// Effective expiration instant, if the record can expire at all.
    pub fn expiration_time(&self) -> Option<u64> {
        if let Some(at) = self.expiration_time {
            return Some(at);
        }
        if self.ttl <= 0 {
            return None;
        }
        Some(self.last_update_time.saturating_add(self.ttl as u64))
    }

    pub fn is_expired(
        &self,
        now: u64,
    ) -> bool {
        self.expiration_time().map(|at| now >= at).unwrap_or(false)
    }

    pub fn eviction_criteria_number(&self) -> u64 {
        self.eviction_criteria_number
    }

    pub fn set_eviction_criteria_number(
        &mut self,
        eviction_criteria_number: u64,
    ) {
        self.eviction_criteria_number = eviction_criteria_number;
    }

    pub fn cost(&self) -> u64 {
        self.cost
    }

    pub fn statistics(&self) -> &RecordStatistics {
        &self.statistics
    }

    pub fn set_statistics(
        &mut self,
        statistics: RecordStatistics,
    ) {
        self.statistics = statistics;
    }

    /// Shared handle to the cached slot, usable off the partition worker.
    pub fn cached_slot(&self) -> Arc<CachedValueSlot> {
        self.cached.clone()
    }

    /// Current value paired with the slot generation it belongs to.
    pub fn cached_lease(&self) -> CachedValueLease<V> {
        CachedValueLease::new(self.value.clone(), self.cached.generation(), self.cached.clone())
    }

    pub fn compare_and_set_cached_value(
        &self,
        expected: Option<&Arc<CachedValue>>,
        new: Option<Arc<CachedValue>>,
    ) -> bool {
        self.cached.compare_and_set(self.cached.generation(), expected, new)
    }

    pub fn get_or_compute_cached_value<F>(
        &self,
        compute: F,
    ) -> Arc<CachedValue>
    where
        F: FnOnce(&V) -> CachedValue,
    {
        self.cached.get_or_compute(self.cached.generation(), || compute(&self.value))
    }
}

fn estimate_cost<V: RecordValue>(
    key: &Bytes,
    value: &V,
) -> u64 {
    RECORD_OVERHEAD_BYTES + key.len() as u64 + value.estimated_cost()
}
