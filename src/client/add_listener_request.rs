use std::any::type_name;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;
use tracing::trace;

use super::ClientEndpoint;
use super::ClientEngine;
use super::ClientRequest;
use super::PortableItemEvent;
use super::RequestParameter;
use super::SecureRequest;
use crate::constants::COLLECTION_ADD_LISTENER_CLASS_ID;
use crate::constants::COLLECTION_PORTABLE_FACTORY_ID;
use crate::constants::FIELD_INCLUDE_VALUE;
use crate::constants::FIELD_LOCAL_ONLY;
use crate::constants::FIELD_NAME;
use crate::constants::FIELD_SERVICE_NAME;
use crate::metrics::DROP_REASON_ENDPOINT_DEAD;
use crate::metrics::EVENTS_DROPPED;
use crate::ActionType;
use crate::CollectionKind;
use crate::DataAwareItemEvent;
use crate::Error;
use crate::EventEnvelope;
use crate::EventError;
use crate::EventFilter;
use crate::EventListener;
use crate::Permission;
use crate::Portable;
use crate::PortableReader;
use crate::PortableWriter;
use crate::Result;

/// Subscribes the calling client to item events of a list or set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionAddListenerRequest {
    pub name: String,
    pub include_value: bool,
    pub service_name: String,
    /// Only fire for mutations made on the member that handles the request
    pub local_only: bool,
}

impl CollectionAddListenerRequest {
    pub fn new(
        service_name: impl Into<String>,
        name: impl Into<String>,
        include_value: bool,
    ) -> Self {
        Self {
            name: name.into(),
            include_value,
            service_name: service_name.into(),
            local_only: false,
        }
    }

    pub fn local_only(
        mut self,
        local_only: bool,
    ) -> Self {
        self.local_only = local_only;
        self
    }

    /// Registers the listener and returns its registration id.
    ///
    /// Pushes for this registration carry `call_id`. The registration is
    /// destroyed automatically when `endpoint` disconnects; if that already
    /// happened the registration is removed again and an error returned.
    pub async fn process(
        &self,
        engine: &ClientEngine,
        endpoint: &Arc<ClientEndpoint>,
        call_id: i64,
    ) -> Result<String> {
        engine.check_permission(self)?;

        let listener = Arc::new(ItemEventForwarder::new(
            endpoint.clone(),
            Bytes::from(self.name.clone()),
            call_id,
        ));
        let filter = EventFilter::new(self.include_value);
        let events = engine.event_service();

        let registration = if self.local_only {
            events.register_local_listener(&self.service_name, &self.name, filter, listener)
        } else {
            events.register_listener(&self.service_name, &self.name, filter, listener)
        };

        if !endpoint.add_listener_destroy_action(&self.service_name, &self.name, &registration.id) {
            events.deregister_listener(&self.service_name, &self.name, &registration.id);
            debug!(
                uuid = %endpoint.uuid(),
                registration_id = %registration.id,
                "endpoint disconnected during registration, rolled back"
            );
            return Err(EventError::EndpointDisconnected(endpoint.uuid().to_string()).into());
        }
        debug!(
            uuid = %endpoint.uuid(),
            registration_id = %registration.id,
            name = %self.name,
            local_only = self.local_only,
            "item listener added"
        );
        Ok(registration.id)
    }
}

/// Resolves the LISTEN permission on a list or set.
pub(crate) fn collection_permission(
    service_name: &str,
    name: &str,
    action: ActionType,
) -> Result<Permission> {
    match CollectionKind::from_service_name(service_name) {
        Some(CollectionKind::List) => Ok(Permission::list(name, action)),
        Some(CollectionKind::Set) => Ok(Permission::set(name, action)),
        None => Err(Error::InvalidArgument(format!(
            "No service matched: {service_name}"
        ))),
    }
}

impl ClientRequest for CollectionAddListenerRequest {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn method_name(&self) -> &'static str {
        "addItemListener"
    }

    fn distributed_object_name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Vec<RequestParameter> {
        vec![RequestParameter::Null, RequestParameter::Bool(self.include_value)]
    }
}

impl SecureRequest for CollectionAddListenerRequest {
    fn required_permission(&self) -> Result<Permission> {
        collection_permission(&self.service_name, &self.name, ActionType::Listen)
    }
}

impl Portable for CollectionAddListenerRequest {
    const FACTORY_ID: i32 = COLLECTION_PORTABLE_FACTORY_ID;
    const CLASS_ID: i32 = COLLECTION_ADD_LISTENER_CLASS_ID;

    fn write_portable(
        &self,
        writer: &mut dyn PortableWriter,
    ) -> Result<()> {
        writer.write_bool(FIELD_LOCAL_ONLY, self.local_only)?;
        writer.write_utf(FIELD_NAME, &self.name)?;
        writer.write_bool(FIELD_INCLUDE_VALUE, self.include_value)?;
        writer.write_utf(FIELD_SERVICE_NAME, &self.service_name)
    }

    fn read_portable(reader: &mut dyn PortableReader) -> Result<Self> {
        Ok(Self {
            local_only: reader.read_bool(FIELD_LOCAL_ONLY)?,
            name: reader.read_utf(FIELD_NAME)?,
            include_value: reader.read_bool(FIELD_INCLUDE_VALUE)?,
            service_name: reader.read_utf(FIELD_SERVICE_NAME)?,
        })
    }
}

/// Forwards item events of one registration to its client.
pub(crate) struct ItemEventForwarder {
    endpoint: Arc<ClientEndpoint>,
    partition_key: Bytes,
    call_id: i64,
}

impl ItemEventForwarder {
    pub(crate) fn new(
        endpoint: Arc<ClientEndpoint>,
        partition_key: Bytes,
        call_id: i64,
    ) -> Self {
        Self {
            endpoint,
            partition_key,
            call_id,
        }
    }
}

impl EventListener for ItemEventForwarder {
    fn on_event(
        &self,
        event: &EventEnvelope,
        include_value: bool,
    ) -> Result<()> {
        if !self.endpoint.is_alive() {
            trace!(uuid = %self.endpoint.uuid(), "endpoint not alive, skipping event");
            EVENTS_DROPPED.with_label_values(&[DROP_REASON_ENDPOINT_DEAD]).inc();
            return Ok(());
        }

        let Some(item_event) = event.payload::<DataAwareItemEvent>() else {
            return Err(EventError::UnexpectedEventType {
                expected: type_name::<DataAwareItemEvent>(),
                found: event.payload_type(),
            }
            .into());
        };

        let payload = PortableItemEvent {
            name: item_event.name.clone(),
            item: include_value.then(|| item_event.item_data.clone()),
            event_type: item_event.kind.code(),
            member_uuid: item_event.member_id.clone(),
        };
        self.endpoint
            .send_event(self.partition_key.clone(), payload, self.call_id);
        Ok(())
    }
}
