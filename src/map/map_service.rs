use std::sync::Arc;

use bytes::Bytes;

use crate::CachedValueLease;
use crate::EntryView;
use crate::OperationContext;
use crate::PartitionService;
use crate::Result;

/// Routes map operations to the partition owning each key.
#[derive(Debug, Clone)]
pub struct MapService {
    partitions: Arc<PartitionService>,
}

impl MapService {
    pub fn new(partitions: Arc<PartitionService>) -> Self {
        Self { partitions }
    }

    /// Stores `value` and returns the previous live value.
    ///
    /// `ttl` of `None` applies the configured default; `Some(ttl <= 0)`
    /// stores without expiration.
    pub async fn put(
        &self,
        map: &str,
        key: Bytes,
        value: Bytes,
        ttl: Option<i64>,
    ) -> Result<Option<Bytes>> {
        let owned = map.to_string();
        let route = key.clone();
        self.partitions
            .submit_to_key(&route, OperationContext::internal("map.put"), move |container| {
                container.record_store.put(&owned, key, value, ttl)
            })
            .await
    }

    pub async fn get(
        &self,
        map: &str,
        key: Bytes,
    ) -> Result<Option<Bytes>> {
        let owned = map.to_string();
        let route = key.clone();
        self.partitions
            .submit_to_key(&route, OperationContext::internal("map.get"), move |container| {
                container.record_store.get(&owned, &key)
            })
            .await
    }

    pub async fn remove(
        &self,
        map: &str,
        key: Bytes,
    ) -> Result<Option<Bytes>> {
        let owned = map.to_string();
        let route = key.clone();
        self.partitions
            .submit_to_key(&route, OperationContext::internal("map.remove"), move |container| {
                container.record_store.remove(&owned, &key)
            })
            .await
    }

    /// Snapshot without a permission check, for in-process callers.
    pub async fn entry_view(
        &self,
        map: &str,
        key: Bytes,
    ) -> Result<Option<EntryView>> {
        let owned = map.to_string();
        let route = key.clone();
        self.partitions
            .submit_to_key(&route, OperationContext::internal("map.entryView"), move |container| {
                container.record_store.entry_view(&owned, &key)
            })
            .await
    }

    /// Value of a live record paired with its cached-value slot.
    ///
    /// The lease may be used from any task; the record itself stays with its
    /// partition worker. A lease taken before a later write never publishes.
    pub async fn cached_lease(
        &self,
        map: &str,
        key: Bytes,
    ) -> Result<Option<CachedValueLease<Bytes>>> {
        let owned = map.to_string();
        let route = key.clone();
        self.partitions
            .submit_to_key(&route, OperationContext::internal("map.cachedLease"), move |container| {
                container.record_store.cached_lease(&owned, &key)
            })
            .await
    }

    /// Number of entries of `map` across every partition.
    pub async fn size(
        &self,
        map: &str,
    ) -> Result<usize> {
        let mut total = 0;
        for partition_id in 0..self.partitions.partition_count() {
            let owned = map.to_string();
            total += self
                .partitions
                .submit(partition_id, OperationContext::internal("map.size"), move |container| {
                    container.record_store.size(&owned)
                })
                .await?;
        }
        Ok(total)
    }
}
