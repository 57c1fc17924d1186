use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;
use tracing::trace;

use super::select_eviction_candidates;
use super::update_eviction_criteria;
use crate::utils::time::Clock;
use crate::CachedValueLease;
use crate::EntryView;
use crate::Record;
use crate::RecordConfig;

/// All map segments of one partition.
///
/// Every mutation assigns a store-wide, strictly increasing replay sequence
/// to the touched record.
pub struct RecordStore {
    partition_id: u32,
    maps: HashMap<String, HashMap<Bytes, Record<Bytes>>>,
    config: RecordConfig,
    clock: Arc<dyn Clock>,
    next_sequence: u64,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("partition_id", &self.partition_id)
            .field("maps", &self.maps.len())
            .field("next_sequence", &self.next_sequence)
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    pub fn new(
        partition_id: u32,
        config: RecordConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            partition_id,
            maps: HashMap::new(),
            config,
            clock,
            next_sequence: 1,
        }
    }

    pub fn partition_id(&self) -> u32 {
        self.partition_id
    }

    /// Inserts or replaces a value, returning the previous one.
    ///
    /// `ttl` of `None` applies the configured default TTL.
    pub fn put(
        &mut self,
        map: &str,
        key: Bytes,
        value: Bytes,
        ttl: Option<i64>,
    ) -> Option<Bytes> {
        let now = self.clock.now_millis();
        let sequence = self.allocate_sequence();
        let ttl = ttl.unwrap_or(self.config.default_ttl_ms);
        let policy = self.config.eviction_policy;

        let segment = self.maps.entry(map.to_string()).or_default();
        let live = segment.get(&key).map(|r| !r.is_expired(now)).unwrap_or(false);
        let old_value = match segment.get_mut(&key) {
            Some(record) if live => {
                let old = record.peek_value().clone();
                record.set_value(value, now);
                Some(old)
            }
            _ => {
                // an expired record is replaced, not updated
                segment.insert(key.clone(), Record::new(key.clone(), value, now));
                None
            }
        };

        if let Some(record) = segment.get_mut(&key) {
            record.set_ttl(ttl);
            record.set_sequence(sequence);
            record.on_store(now);
            update_eviction_criteria(policy, record);
            trace!(
                partition_id = self.partition_id,
                map,
                version = record.version(),
                sequence,
                "record stored"
            );
        }

        self.evict_if_required(map, Some(&key));
        old_value
    }

    /// Reads a value, recording the access. Expired records are removed.
    pub fn get(
        &mut self,
        map: &str,
        key: &Bytes,
    ) -> Option<Bytes> {
        let now = self.clock.now_millis();
        let policy = self.config.eviction_policy;
        let segment = self.maps.get_mut(map)?;

        if segment.get(key).map(|r| r.is_expired(now)).unwrap_or(false) {
            segment.remove(key);
            debug!(partition_id = self.partition_id, map, "expired record removed on read");
            return None;
        }

        let record = segment.get_mut(key)?;
        let value = record.get_value(now).clone();
        update_eviction_criteria(policy, record);
        Some(value)
    }

    pub fn remove(
        &mut self,
        map: &str,
        key: &Bytes,
    ) -> Option<Bytes> {
        let now = self.clock.now_millis();
        let segment = self.maps.get_mut(map)?;
        let record = segment.remove(key)?;
        if segment.is_empty() {
            self.maps.remove(map);
        }
        if record.is_expired(now) {
            return None;
        }
        Some(record.peek_value().clone())
    }

    /// Snapshot of a live record, or `None` when absent or expired.
    ///
    /// Read-only: neither access statistics nor the store are modified.
    pub fn entry_view(
        &self,
        map: &str,
        key: &Bytes,
    ) -> Option<EntryView> {
        let now = self.clock.now_millis();
        self.record(map, key)
            .filter(|r| !r.is_expired(now))
            .map(EntryView::from_record)
    }

    pub fn record(
        &self,
        map: &str,
        key: &Bytes,
    ) -> Option<&Record<Bytes>> {
        self.maps.get(map).and_then(|segment| segment.get(key))
    }

    pub fn record_mut(
        &mut self,
        map: &str,
        key: &Bytes,
    ) -> Option<&mut Record<Bytes>> {
        self.maps.get_mut(map).and_then(|segment| segment.get_mut(key))
    }

    /// Current value of a record bound to its cached-slot generation, for
    /// near-cache style readers.
    pub fn cached_lease(
        &self,
        map: &str,
        key: &Bytes,
    ) -> Option<CachedValueLease<Bytes>> {
        self.record(map, key).map(Record::cached_lease)
    }

    pub fn contains_key(
        &self,
        map: &str,
        key: &Bytes,
    ) -> bool {
        self.record(map, key).is_some()
    }

    pub fn size(
        &self,
        map: &str,
    ) -> usize {
        self.maps.get(map).map(HashMap::len).unwrap_or(0)
    }

    /// Total estimated cost of all records in `map`.
    pub fn owned_entry_cost(
        &self,
        map: &str,
    ) -> u64 {
        self.maps
            .get(map)
            .map(|segment| segment.values().map(Record::cost).sum())
            .unwrap_or(0)
    }

    /// Removes every record expired at `now`. Returns how many were removed.
    pub fn evict_expired(
        &mut self,
        now: u64,
    ) -> usize {
        let mut removed = 0;
        for segment in self.maps.values_mut() {
            let before = segment.len();
            segment.retain(|_, record| !record.is_expired(now));
            removed += before - segment.len();
        }
        self.maps.retain(|_, segment| !segment.is_empty());

        if removed > 0 {
            debug!(partition_id = self.partition_id, removed, "expired records evicted");
        }
        removed
    }

    /// Evicts lowest-ranked records while `map` exceeds the configured bound.
    pub fn evict_if_required(
        &mut self,
        map: &str,
        protect: Option<&Bytes>,
    ) -> Vec<Bytes> {
        let max = self.config.max_entries_per_partition;
        if max == 0 {
            return Vec::new();
        }
        let Some(segment) = self.maps.get_mut(map) else {
            return Vec::new();
        };
        if segment.len() <= max {
            return Vec::new();
        }

        let victims = select_eviction_candidates(segment, segment.len() - max, protect);
        for key in &victims {
            segment.remove(key);
        }
        debug!(
            partition_id = self.partition_id,
            map,
            evicted = victims.len(),
            "size-based eviction"
        );
        victims
    }

    fn allocate_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }
}
