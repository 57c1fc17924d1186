use std::collections::HashMap;

use bytes::Bytes;

use crate::EvictionPolicy;
use crate::Record;
use crate::RecordValue;

/// Writes the policy's score into the record after an access or update.
pub fn update_eviction_criteria<V: RecordValue>(
    policy: EvictionPolicy,
    record: &mut Record<V>,
) {
    match policy {
        EvictionPolicy::None => {}
        EvictionPolicy::Lru => {
            let last_access = record.last_access_time();
            record.set_eviction_criteria_number(last_access);
        }
        EvictionPolicy::Lfu => {
            let hits = record.statistics().hits;
            record.set_eviction_criteria_number(hits);
        }
    }
}

/// Picks up to `count` keys with the lowest criteria number.
///
/// Ties are broken by creation time, then key bytes, so the order is stable.
pub fn select_eviction_candidates<V: RecordValue>(
    records: &HashMap<Bytes, Record<V>>,
    count: usize,
    exclude: Option<&Bytes>,
) -> Vec<Bytes> {
    if count == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(u64, u64, &Bytes)> = records
        .values()
        .filter(|r| Some(r.key()) != exclude)
        .map(|r| (r.eviction_criteria_number(), r.creation_time(), r.key()))
        .collect();
    ranked.sort();

    ranked.into_iter().take(count).map(|(_, _, key)| key.clone()).collect()
}
