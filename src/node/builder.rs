//! Assembles a [`GridNode`] from configuration.
//!
//! Every component has a production default; tests and embedders override
//! the router, the clock or the permission checker before `build()`.
//!
//! ```ignore
//! let node = GridNodeBuilder::new(GridConfig::new()?.validate()?)
//!     .security(Arc::new(my_checker))
//!     .build()?;
//! ```

use std::sync::Arc;

use tracing::info;

use super::GridNode;
use crate::utils::time::Clock;
use crate::utils::time::SystemClock;
use crate::AllowAllPermissions;
use crate::ClientEngine;
use crate::CollectionService;
use crate::EventService;
use crate::GridConfig;
use crate::HashPartitionRouter;
use crate::MapService;
use crate::PartitionRouter;
use crate::PartitionService;
use crate::PermissionChecker;
use crate::Result;

pub struct GridNodeBuilder {
    pub(super) config: GridConfig,
    router: Option<Arc<dyn PartitionRouter>>,
    clock: Option<Arc<dyn Clock>>,
    security: Option<Arc<dyn PermissionChecker>>,
}

impl GridNodeBuilder {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            router: None,
            clock: None,
            security: None,
        }
    }

    /// Loads layered configuration, optionally merging an override file.
    pub fn from_env(override_path: Option<&str>) -> Result<Self> {
        let mut config = GridConfig::new()?;
        if let Some(path) = override_path {
            info!("with_override_config from: {}", path);
            config = config.with_override_config(path)?;
        }
        Ok(Self::new(config.validate()?))
    }

    pub fn router(
        mut self,
        router: Arc<dyn PartitionRouter>,
    ) -> Self {
        self.router = Some(router);
        self
    }

    pub fn clock(
        mut self,
        clock: Arc<dyn Clock>,
    ) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn security(
        mut self,
        security: Arc<dyn PermissionChecker>,
    ) -> Self {
        self.security = Some(security);
        self
    }

    /// Spawns partition workers and the event dispatcher.
    ///
    /// Must be called inside a tokio runtime.
    pub fn build(self) -> Result<GridNode> {
        let config = self.config.validate()?;
        let member_id = config.cluster.resolve_member_id();

        let router: Arc<dyn PartitionRouter> = match self.router {
            Some(router) => router,
            None => Arc::new(HashPartitionRouter::new(config.partition.partition_count)),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let security: Arc<dyn PermissionChecker> = match self.security {
            Some(security) => security,
            None => Arc::new(AllowAllPermissions),
        };

        let partitions = Arc::new(PartitionService::start(
            &config.partition,
            &config.record,
            router,
            clock,
        )?);

        let events = Arc::new(EventService::new(config.listener.clone(), member_id.clone()));
        events.start();

        let engine = ClientEngine::new(partitions.clone(), events.clone(), security, config.retry.clone());
        let maps = MapService::new(partitions.clone());
        let collections = CollectionService::new(partitions.clone(), events.clone());

        info!(
            member_id = %member_id,
            partition_count = config.partition.partition_count,
            "grid node started"
        );

        Ok(GridNode {
            member_id,
            config: Arc::new(config),
            partitions,
            events,
            engine: Arc::new(engine),
            maps,
            collections,
        })
    }
}
