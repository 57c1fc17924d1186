use std::sync::Arc;

use bytes::Bytes;

use super::CollectionKind;
use crate::DataAwareItemEvent;
use crate::EventEnvelope;
use crate::EventKind;
use crate::EventService;
use crate::OperationContext;
use crate::PartitionService;
use crate::Result;

#[derive(Debug, Clone)]
pub struct CollectionService {
    partitions: Arc<PartitionService>,
    events: Arc<EventService>,
}

impl CollectionService {
    pub fn new(
        partitions: Arc<PartitionService>,
        events: Arc<EventService>,
    ) -> Self {
        Self { partitions, events }
    }

    /// Adds `item` and publishes an ADDED event when the collection changed.
    pub async fn add(
        &self,
        kind: CollectionKind,
        name: &str,
        item: Bytes,
    ) -> Result<bool> {
        let events = self.events.clone();
        let owned = name.to_string();
        self.partitions
            .submit_to_key(
                name.as_bytes(),
                OperationContext::internal("collection.add"),
                move |container| {
                    let added = container.collections.get_or_create(kind, &owned).add(item.clone());
                    if added {
                        publish_item_event(&events, kind, owned, item, EventKind::Added);
                    }
                    added
                },
            )
            .await
    }

    /// Removes the first occurrence of `item` and publishes a REMOVED event
    /// when found.
    pub async fn remove(
        &self,
        kind: CollectionKind,
        name: &str,
        item: Bytes,
    ) -> Result<bool> {
        let events = self.events.clone();
        let owned = name.to_string();
        self.partitions
            .submit_to_key(
                name.as_bytes(),
                OperationContext::internal("collection.remove"),
                move |container| {
                    let removed = container
                        .collections
                        .get_mut(kind, &owned)
                        .map(|c| c.remove(&item))
                        .unwrap_or(false);
                    if removed {
                        publish_item_event(&events, kind, owned, item, EventKind::Removed);
                    }
                    removed
                },
            )
            .await
    }

    pub async fn size(
        &self,
        kind: CollectionKind,
        name: &str,
    ) -> Result<usize> {
        let owned = name.to_string();
        self.partitions
            .submit_to_key(
                name.as_bytes(),
                OperationContext::internal("collection.size"),
                move |container| container.collections.get(kind, &owned).map(|c| c.len()).unwrap_or(0),
            )
            .await
    }

    pub async fn contains(
        &self,
        kind: CollectionKind,
        name: &str,
        item: Bytes,
    ) -> Result<bool> {
        let owned = name.to_string();
        self.partitions
            .submit_to_key(
                name.as_bytes(),
                OperationContext::internal("collection.contains"),
                move |container| {
                    container
                        .collections
                        .get(kind, &owned)
                        .map(|c| c.contains(&item))
                        .unwrap_or(false)
                },
            )
            .await
    }

    pub async fn items(
        &self,
        kind: CollectionKind,
        name: &str,
    ) -> Result<Vec<Bytes>> {
        let owned = name.to_string();
        self.partitions
            .submit_to_key(
                name.as_bytes(),
                OperationContext::internal("collection.items"),
                move |container| {
                    container
                        .collections
                        .get(kind, &owned)
                        .map(|c| c.items().to_vec())
                        .unwrap_or_default()
                },
            )
            .await
    }

    /// Drops the collection and its items. No item events are published.
    pub async fn destroy(
        &self,
        kind: CollectionKind,
        name: &str,
    ) -> Result<bool> {
        let owned = name.to_string();
        self.partitions
            .submit_to_key(
                name.as_bytes(),
                OperationContext::internal("collection.destroy"),
                move |container| container.collections.destroy(kind, &owned),
            )
            .await
    }
}

fn publish_item_event(
    events: &EventService,
    kind: CollectionKind,
    name: String,
    item: Bytes,
    event_kind: EventKind,
) {
    let event = DataAwareItemEvent {
        name,
        item_data: item,
        kind: event_kind,
        member_id: events.member_id().to_string(),
    };
    events.publish(EventEnvelope::item(kind.service_name(), event));
}
