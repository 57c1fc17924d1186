use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PartitionConfig {
    /// Number of partitions the keyspace is split into
    #[serde(default = "default_partition_count")]
    pub partition_count: u32,

    /// Bounded operation queue per partition worker
    #[serde(default = "default_operation_queue_size")]
    pub operation_queue_size: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            partition_count: default_partition_count(),
            operation_queue_size: default_operation_queue_size(),
        }
    }
}

impl PartitionConfig {
    /// Validates partition layout
    /// # Errors
    /// Returns `Error::InvalidConfig` when:
    /// - `partition_count` is 0
    /// - `operation_queue_size` is 0
    pub fn validate(&self) -> Result<()> {
        if self.partition_count == 0 {
            return Err(Error::InvalidConfig("partition_count must be greater than 0".into()));
        }

        if self.operation_queue_size == 0 {
            return Err(Error::InvalidConfig(
                "operation_queue_size must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

fn default_partition_count() -> u32 {
    271
}

fn default_operation_queue_size() -> usize {
    1024
}
