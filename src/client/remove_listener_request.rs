use std::sync::Arc;

use tracing::debug;

use super::add_listener_request::collection_permission;
use super::ClientEndpoint;
use super::ClientEngine;
use super::ClientRequest;
use super::RequestParameter;
use super::SecureRequest;
use crate::constants::COLLECTION_PORTABLE_FACTORY_ID;
use crate::constants::COLLECTION_REMOVE_LISTENER_CLASS_ID;
use crate::constants::FIELD_NAME;
use crate::constants::FIELD_REGISTRATION_ID;
use crate::constants::FIELD_SERVICE_NAME;
use crate::ActionType;
use crate::Permission;
use crate::Portable;
use crate::PortableReader;
use crate::PortableWriter;
use crate::Result;

/// Destroys a registration created by [`CollectionAddListenerRequest`](super::CollectionAddListenerRequest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRemoveListenerRequest {
    pub name: String,
    pub service_name: String,
    pub registration_id: String,
}

impl CollectionRemoveListenerRequest {
    pub fn new(
        service_name: impl Into<String>,
        name: impl Into<String>,
        registration_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            service_name: service_name.into(),
            registration_id: registration_id.into(),
        }
    }

    /// Returns whether a registration was removed.
    pub async fn process(
        &self,
        engine: &ClientEngine,
        endpoint: &Arc<ClientEndpoint>,
    ) -> Result<bool> {
        engine.check_permission(self)?;

        let removed = engine.event_service().deregister_listener(
            &self.service_name,
            &self.name,
            &self.registration_id,
        );
        if removed {
            endpoint.remove_listener_destroy_action(&self.registration_id);
        }

        debug!(
            uuid = %endpoint.uuid(),
            registration_id = %self.registration_id,
            removed,
            "item listener removed"
        );
        Ok(removed)
    }
}

impl ClientRequest for CollectionRemoveListenerRequest {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn method_name(&self) -> &'static str {
        "removeItemListener"
    }

    fn distributed_object_name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Vec<RequestParameter> {
        vec![RequestParameter::Null]
    }
}

impl SecureRequest for CollectionRemoveListenerRequest {
    fn required_permission(&self) -> Result<Permission> {
        collection_permission(&self.service_name, &self.name, ActionType::Listen)
    }
}

impl Portable for CollectionRemoveListenerRequest {
    const FACTORY_ID: i32 = COLLECTION_PORTABLE_FACTORY_ID;
    const CLASS_ID: i32 = COLLECTION_REMOVE_LISTENER_CLASS_ID;

    fn write_portable(
        &self,
        writer: &mut dyn PortableWriter,
    ) -> Result<()> {
        writer.write_utf(FIELD_NAME, &self.name)?;
        writer.write_utf(FIELD_SERVICE_NAME, &self.service_name)?;
        writer.write_utf(FIELD_REGISTRATION_ID, &self.registration_id)
    }

    fn read_portable(reader: &mut dyn PortableReader) -> Result<Self> {
        Ok(Self {
            name: reader.read_utf(FIELD_NAME)?,
            service_name: reader.read_utf(FIELD_SERVICE_NAME)?,
            registration_id: reader.read_utf(FIELD_REGISTRATION_ID)?,
        })
    }
}
