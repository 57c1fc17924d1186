use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use bytes::Bytes;
#[cfg(test)]
use mockall::automock;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;
use tracing::trace;

use crate::constants::FIELD_EVENT_TYPE;
use crate::constants::FIELD_HAS_ITEM;
use crate::constants::FIELD_MEMBER_UUID;
use crate::constants::FIELD_NAME;
use crate::constants::ITEM_EVENT_CLASS_ID;
use crate::constants::SPI_PORTABLE_FACTORY_ID;
use crate::Portable;
use crate::PortableReader;
use crate::PortableWriter;
use crate::Result;
use crate::SerializationError;

/// Wire form of an item event pushed to a client.
///
/// `item` is `None` when the registration did not ask for values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortableItemEvent {
    pub name: String,
    pub item: Option<Bytes>,
    pub event_type: i32,
    pub member_uuid: String,
}

impl Portable for PortableItemEvent {
    const FACTORY_ID: i32 = SPI_PORTABLE_FACTORY_ID;
    const CLASS_ID: i32 = ITEM_EVENT_CLASS_ID;

    fn write_portable(
        &self,
        writer: &mut dyn PortableWriter,
    ) -> Result<()> {
        writer.write_utf(FIELD_NAME, &self.name)?;
        writer.write_long(FIELD_EVENT_TYPE, i64::from(self.event_type))?;
        writer.write_utf(FIELD_MEMBER_UUID, &self.member_uuid)?;
        writer.write_bool(FIELD_HAS_ITEM, self.item.is_some())?;
        if let Some(item) = &self.item {
            writer.write_raw_data(item)?;
        }
        Ok(())
    }

    fn read_portable(reader: &mut dyn PortableReader) -> Result<Self> {
        let name = reader.read_utf(FIELD_NAME)?;
        let raw_type = reader.read_long(FIELD_EVENT_TYPE)?;
        let event_type = i32::try_from(raw_type).map_err(|_| SerializationError::ValueOutOfRange {
            field: FIELD_EVENT_TYPE.to_string(),
            value: raw_type,
        })?;
        let member_uuid = reader.read_utf(FIELD_MEMBER_UUID)?;
        let item = if reader.read_bool(FIELD_HAS_ITEM)? {
            Some(reader.read_raw_data()?)
        } else {
            None
        };
        Ok(Self {
            name,
            item,
            event_type,
            member_uuid,
        })
    }
}

/// One asynchronous push, tagged with the call id of the registration that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEvent {
    pub call_id: i64,
    pub partition_key: Bytes,
    pub payload: PortableItemEvent,
}

/// Transport towards connected clients.
///
/// Must not block: it is invoked from the event dispatcher.
#[cfg_attr(test, automock)]
pub trait EventSink: Send + Sync + 'static {
    fn send(
        &self,
        destination: &str,
        event: ClientEvent,
    );
}

/// Sink backed by an unbounded channel, for embedding and tests.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<(String, ClientEvent)>,
}

impl ChannelEventSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<(String, ClientEvent)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn send(
        &self,
        destination: &str,
        event: ClientEvent,
    ) {
        if self.tx.send((destination.to_string(), event)).is_err() {
            debug!(destination, "event sink receiver dropped");
        }
    }
}

/// Cleanup recorded for each listener a client registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerDestroyAction {
    pub service_name: String,
    pub object_name: String,
    pub registration_id: String,
}

/// Server-side handle of one connected client.
pub struct ClientEndpoint {
    uuid: String,
    alive: AtomicBool,
    sink: Arc<dyn EventSink>,
    destroy_actions: Mutex<Vec<ListenerDestroyAction>>,
}

impl std::fmt::Debug for ClientEndpoint {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ClientEndpoint")
            .field("uuid", &self.uuid)
            .field("alive", &self.is_alive())
            .field("destroy_actions", &self.destroy_actions.lock().len())
            .finish()
    }
}

impl ClientEndpoint {
    pub fn new(
        uuid: impl Into<String>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            alive: AtomicBool::new(true),
            sink,
            destroy_actions: Mutex::new(Vec::new()),
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Flags the connection as gone. Registrations stay until the endpoint
    /// manager tears them down.
    ///
    /// Taken under the destroy-action lock so no action can be recorded
    /// after the manager has collected them.
    pub fn mark_dead(&self) {
        let _actions = self.destroy_actions.lock();
        if self.alive.swap(false, Ordering::AcqRel) {
            debug!(uuid = %self.uuid, "client endpoint marked dead");
        }
    }

    pub fn send_event(
        &self,
        partition_key: Bytes,
        payload: PortableItemEvent,
        call_id: i64,
    ) {
        trace!(uuid = %self.uuid, call_id, "pushing event to client");
        self.sink.send(
            &self.uuid,
            ClientEvent {
                call_id,
                partition_key,
                payload,
            },
        );
    }

    /// Records the cleanup for a new registration.
    ///
    /// Returns `false` once the endpoint is dead; the caller then owns the
    /// registration and must remove it.
    pub fn add_listener_destroy_action(
        &self,
        service_name: &str,
        object_name: &str,
        registration_id: &str,
    ) -> bool {
        let mut actions = self.destroy_actions.lock();
        if !self.is_alive() {
            return false;
        }
        actions.push(ListenerDestroyAction {
            service_name: service_name.to_string(),
            object_name: object_name.to_string(),
            registration_id: registration_id.to_string(),
        });
        true
    }

    /// Forgets the cleanup of a registration removed explicitly.
    pub fn remove_listener_destroy_action(
        &self,
        registration_id: &str,
    ) -> bool {
        let mut actions = self.destroy_actions.lock();
        let before = actions.len();
        actions.retain(|a| a.registration_id != registration_id);
        actions.len() != before
    }

    pub fn destroy_actions(&self) -> Vec<ListenerDestroyAction> {
        self.destroy_actions.lock().clone()
    }

    pub(crate) fn take_destroy_actions(&self) -> Vec<ListenerDestroyAction> {
        std::mem::take(&mut *self.destroy_actions.lock())
    }
}
