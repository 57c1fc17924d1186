use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// How the record store scores entries for eviction
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Criteria number untouched, nothing evicted for size
    #[default]
    None,
    /// Least recently used: score is the last access time
    Lru,
    /// Least frequently used: score is the hit count
    Lfu,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecordConfig {
    #[serde(default)]
    pub eviction_policy: EvictionPolicy,

    /// Upper bound of entries per map per partition (0 = unbounded)
    #[serde(default)]
    pub max_entries_per_partition: usize,

    /// TTL applied when a put does not carry one (ms, <= 0 = no expiration)
    #[serde(default)]
    pub default_ttl_ms: i64,

    /// How often each partition worker sweeps expired records (ms, 0 = only
    /// on read)
    #[serde(default = "default_expiration_sweep_interval_ms")]
    pub expiration_sweep_interval_ms: u64,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            eviction_policy: EvictionPolicy::None,
            max_entries_per_partition: 0,
            default_ttl_ms: 0,
            expiration_sweep_interval_ms: default_expiration_sweep_interval_ms(),
        }
    }
}

impl RecordConfig {
    /// # Errors
    /// Returns `Error::InvalidConfig` when a size bound is configured without
    /// a policy to rank candidates
    pub fn validate(&self) -> Result<()> {
        if self.max_entries_per_partition > 0 && self.eviction_policy == EvictionPolicy::None {
            return Err(Error::InvalidConfig(
                "max_entries_per_partition requires an eviction_policy".into(),
            ));
        }
        if self.expiration_sweep_interval_ms > 0 && self.expiration_sweep_interval_ms < 10 {
            return Err(Error::InvalidConfig(format!(
                "expiration_sweep_interval_ms must be 0 or at least 10, got {}",
                self.expiration_sweep_interval_ms
            )));
        }
        Ok(())
    }
}

fn default_expiration_sweep_interval_ms() -> u64 {
    1000
}
