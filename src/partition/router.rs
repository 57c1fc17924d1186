#[cfg(test)]
use mockall::automock;

/// Maps a binary key to the partition that owns it.
///
/// Queried again on every retry, ownership can change between attempts.
#[cfg_attr(test, automock)]
pub trait PartitionRouter: Send + Sync + 'static {
    fn route(
        &self,
        key: &[u8],
    ) -> u32;

    fn partition_count(&self) -> u32;
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the key bytes, modulo the partition count
#[derive(Debug, Clone, Copy)]
pub struct HashPartitionRouter {
    partition_count: u32,
}

impl HashPartitionRouter {
    pub fn new(partition_count: u32) -> Self {
        Self {
            partition_count: partition_count.max(1),
        }
    }
}

impl PartitionRouter for HashPartitionRouter {
    fn route(
        &self,
        key: &[u8],
    ) -> u32 {
        let hash = key.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
        });
        (hash % u64::from(self.partition_count)) as u32
    }

    fn partition_count(&self) -> u32 {
        self.partition_count
    }
}
