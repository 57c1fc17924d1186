use std::sync::Arc;

use tracing::info;

use crate::ClientEngine;
use crate::CollectionService;
use crate::EventService;
use crate::GridConfig;
use crate::MapService;
use crate::PartitionService;

/// One running member: partitions, listener registry and request engine.
#[derive(Debug)]
pub struct GridNode {
    pub(super) member_id: String,
    pub(super) config: Arc<GridConfig>,
    pub(super) partitions: Arc<PartitionService>,
    pub(super) events: Arc<EventService>,
    pub(super) engine: Arc<ClientEngine>,
    pub(super) maps: MapService,
    pub(super) collections: CollectionService,
}

impl GridNode {
    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn partitions(&self) -> &Arc<PartitionService> {
        &self.partitions
    }

    pub fn events(&self) -> &Arc<EventService> {
        &self.events
    }

    pub fn engine(&self) -> &Arc<ClientEngine> {
        &self.engine
    }

    pub fn maps(&self) -> &MapService {
        &self.maps
    }

    pub fn collections(&self) -> &CollectionService {
        &self.collections
    }

    /// Stops the dispatcher, then the partition workers.
    pub async fn shutdown(&self) {
        self.events.stop().await;
        self.partitions.shutdown().await;
        info!(member_id = %self.member_id, "grid node stopped");
    }
}
