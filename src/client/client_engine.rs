use std::sync::Arc;

use tracing::debug;

use super::ClientEndpointManager;
use super::KeyBasedRequest;
use super::RetryableRequest;
use super::SecureRequest;
use crate::ensure_permitted;
use crate::utils::async_task::task_with_timeout_and_exponential_backoff;
use crate::EventService;
use crate::OperationContext;
use crate::PartitionContainer;
use crate::PartitionService;
use crate::PermissionChecker;
use crate::Result;
use crate::RetryPolicies;

/// Executes client requests against the local partitions.
pub struct ClientEngine {
    partitions: Arc<PartitionService>,
    events: Arc<EventService>,
    endpoints: Arc<ClientEndpointManager>,
    security: Arc<dyn PermissionChecker>,
    retry: RetryPolicies,
}

impl std::fmt::Debug for ClientEngine {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ClientEngine")
            .field("partitions", &self.partitions)
            .field("events", &self.events)
            .field("endpoints", &self.endpoints.count())
            .finish_non_exhaustive()
    }
}

impl ClientEngine {
    pub fn new(
        partitions: Arc<PartitionService>,
        events: Arc<EventService>,
        security: Arc<dyn PermissionChecker>,
        retry: RetryPolicies,
    ) -> Self {
        let endpoints = Arc::new(ClientEndpointManager::new(events.clone()));
        Self {
            partitions,
            events,
            endpoints,
            security,
            retry,
        }
    }

    pub fn partition_service(&self) -> &Arc<PartitionService> {
        &self.partitions
    }

    pub fn event_service(&self) -> &Arc<EventService> {
        &self.events
    }

    pub fn endpoint_manager(&self) -> &Arc<ClientEndpointManager> {
        &self.endpoints
    }

    pub fn member_id(&self) -> &str {
        self.events.member_id()
    }

    /// Resolves and checks the permission a request requires.
    pub fn check_permission<R: SecureRequest + ?Sized>(
        &self,
        request: &R,
    ) -> Result<()> {
        let permission = request.required_permission()?;
        ensure_permitted(self.security.as_ref(), &permission)
    }

    /// Runs `op` on the partition that owns the request key.
    ///
    /// The key is routed again before every attempt, so an operation rejected
    /// because its partition moved follows the new owner.
    pub async fn invoke_on_key_owner<Req, R, F>(
        &self,
        request: &Req,
        ctx: OperationContext,
        op: F,
    ) -> Result<R>
    where
        Req: KeyBasedRequest + RetryableRequest + ?Sized,
        F: FnOnce(&mut PartitionContainer) -> R + Clone + Send + 'static,
        R: Send + 'static,
    {
        let partitions = &self.partitions;
        let key = request.key().clone();

        debug!(
            service_name = request.service_name(),
            object_name = request.distributed_object_name(),
            op = ctx.name,
            "invoking on key owner"
        );

        task_with_timeout_and_exponential_backoff(
            move || {
                let op = op.clone();
                let key = key.clone();
                async move { partitions.submit_to_key(&key, ctx, op).await }
            },
            self.retry.routing,
        )
        .await
    }
}
