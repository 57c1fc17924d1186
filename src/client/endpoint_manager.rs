use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use tracing::info;

use super::ClientEndpoint;
use crate::EventService;

/// Tracks connected clients and tears down their listeners on disconnect.
#[derive(Debug)]
pub struct ClientEndpointManager {
    endpoints: DashMap<String, Arc<ClientEndpoint>>,
    events: Arc<EventService>,
}

impl ClientEndpointManager {
    pub fn new(events: Arc<EventService>) -> Self {
        Self {
            endpoints: DashMap::new(),
            events,
        }
    }

    pub fn register(
        &self,
        endpoint: Arc<ClientEndpoint>,
    ) {
        debug!(uuid = %endpoint.uuid(), "client endpoint registered");
        self.endpoints.insert(endpoint.uuid().to_string(), endpoint);
    }

    pub fn get(
        &self,
        uuid: &str,
    ) -> Option<Arc<ClientEndpoint>> {
        self.endpoints.get(uuid).map(|e| e.clone())
    }

    pub fn count(&self) -> usize {
        self.endpoints.len()
    }

    /// Removes the endpoint and destroys every registration it created.
    ///
    /// Returns how many registrations were destroyed. Unknown uuids are a
    /// no-op.
    pub fn disconnect(
        &self,
        uuid: &str,
    ) -> usize {
        let Some((_, endpoint)) = self.endpoints.remove(uuid) else {
            return 0;
        };
        endpoint.mark_dead();

        let destroyed = endpoint
            .take_destroy_actions()
            .into_iter()
            .filter(|action| {
                self.events.deregister_listener(
                    &action.service_name,
                    &action.object_name,
                    &action.registration_id,
                )
            })
            .count();

        info!(uuid, destroyed, "client endpoint disconnected");
        destroyed
    }
}
