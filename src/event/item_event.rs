use std::any::type_name;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Added,
    Removed,
}

impl EventKind {
    pub fn mask(self) -> u8 {
        match self {
            EventKind::Added => 0b01,
            EventKind::Removed => 0b10,
        }
    }

    /// Wire code used in client pushes
    pub fn code(self) -> i32 {
        match self {
            EventKind::Added => 1,
            EventKind::Removed => 2,
        }
    }
}

pub const ALL_EVENT_KINDS: u8 = 0b11;

/// Collection item change carrying the item's encoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataAwareItemEvent {
    pub name: String,
    pub item_data: Bytes,
    pub kind: EventKind,
    pub member_id: String,
}

/// Per-registration delivery filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventFilter {
    /// Ship the item bytes with each event
    pub include_value: bool,
    kinds: u8,
}

impl EventFilter {
    pub fn new(include_value: bool) -> Self {
        Self {
            include_value,
            kinds: ALL_EVENT_KINDS,
        }
    }

    pub fn with_kinds(
        include_value: bool,
        kinds: &[EventKind],
    ) -> Self {
        Self {
            include_value,
            kinds: kinds.iter().fold(0, |mask, kind| mask | kind.mask()),
        }
    }

    pub fn accepts(
        &self,
        kind: EventKind,
    ) -> bool {
        self.kinds & kind.mask() != 0
    }
}

/// What travels through the dispatch queue.
///
/// The payload is type-erased: the registry is shared by every service and
/// only the listener knows which representation it expects.
#[derive(Clone)]
pub struct EventEnvelope {
    pub service_name: String,
    pub object_name: String,
    pub kind: EventKind,
    /// Member on which the mutation happened
    pub member_id: String,
    payload: Arc<dyn Any + Send + Sync>,
    payload_type: &'static str,
}

impl fmt::Debug for EventEnvelope {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("EventEnvelope")
            .field("service_name", &self.service_name)
            .field("object_name", &self.object_name)
            .field("kind", &self.kind)
            .field("member_id", &self.member_id)
            .field("payload_type", &self.payload_type)
            .finish()
    }
}

impl EventEnvelope {
    pub fn new<T: Any + Send + Sync>(
        service_name: impl Into<String>,
        object_name: impl Into<String>,
        kind: EventKind,
        member_id: impl Into<String>,
        payload: T,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            object_name: object_name.into(),
            kind,
            member_id: member_id.into(),
            payload: Arc::new(payload),
            payload_type: type_name::<T>(),
        }
    }

    pub fn item(
        service_name: impl Into<String>,
        event: DataAwareItemEvent,
    ) -> Self {
        let object_name = event.name.clone();
        let member_id = event.member_id.clone();
        Self::new(service_name, object_name, event.kind, member_id, event)
    }

    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    pub fn payload_type(&self) -> &'static str {
        self.payload_type
    }
}
