use bytes::Bytes;
use d_grid::constants::LIST_SERVICE_NAME;
use d_grid::constants::SET_SERVICE_NAME;
use d_grid::CollectionAddListenerRequest;
use d_grid::CollectionKind;
use d_grid::CollectionRemoveListenerRequest;
use d_grid::DataAwareItemEvent;
use d_grid::Error;
use d_grid::EventEnvelope;
use d_grid::EventKind;

use crate::commons::connect;
use crate::commons::next_push;
use crate::commons::start_node;
use crate::commons::stays_silent;
use crate::commons::MEMBER_ID;

#[tokio::test]
async fn test_pushes_carry_call_id_kind_and_member() {
    let (node, _) = start_node(8, None);
    let (client, mut inbox) = connect(&node, "client-1");
    CollectionAddListenerRequest::new(SET_SERVICE_NAME, "tags", true)
        .process(node.engine(), &client, 7)
        .await
        .unwrap();

    let sets = node.collections();
    sets.add(CollectionKind::Set, "tags", Bytes::from_static(b"red")).await.unwrap();
    sets.remove(CollectionKind::Set, "tags", Bytes::from_static(b"red")).await.unwrap();

    let (_, added) = next_push(&mut inbox).await.unwrap();
    assert_eq!(added.call_id, 7);
    assert_eq!(added.partition_key, Bytes::from_static(b"tags"));
    assert_eq!(added.payload.name, "tags");
    assert_eq!(added.payload.event_type, EventKind::Added.code());
    assert_eq!(added.payload.member_uuid, MEMBER_ID);

    let (_, removed) = next_push(&mut inbox).await.unwrap();
    assert_eq!(removed.payload.event_type, EventKind::Removed.code());
    assert_eq!(removed.payload.item, Some(Bytes::from_static(b"red")));
    node.shutdown().await;
}

#[tokio::test]
async fn test_without_include_value_items_are_stripped() {
    let (node, _) = start_node(8, None);
    let (client, mut inbox) = connect(&node, "client-1");
    CollectionAddListenerRequest::new(LIST_SERVICE_NAME, "orders", false)
        .process(node.engine(), &client, 1)
        .await
        .unwrap();

    node.collections()
        .add(CollectionKind::List, "orders", Bytes::from_static(b"secret"))
        .await
        .unwrap();

    let (_, push) = next_push(&mut inbox).await.unwrap();
    assert_eq!(push.payload.item, None);
    assert_eq!(push.payload.event_type, EventKind::Added.code());
    node.shutdown().await;
}

#[tokio::test]
async fn test_unknown_service_leaves_registry_untouched() {
    let (node, _) = start_node(2, None);
    let (client, _inbox) = connect(&node, "client-1");

    let result = CollectionAddListenerRequest::new("dgrid:impl:queueService", "jobs", true)
        .process(node.engine(), &client, 1)
        .await;

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert_eq!(node.events().registration_count(), 0);
    assert!(client.destroy_actions().is_empty());
    node.shutdown().await;
}

#[tokio::test]
async fn test_remove_listener_stops_pushes() {
    let (node, _) = start_node(4, None);
    let (client, mut inbox) = connect(&node, "client-1");
    let registration_id = CollectionAddListenerRequest::new(LIST_SERVICE_NAME, "orders", true)
        .process(node.engine(), &client, 1)
        .await
        .unwrap();

    let remove = CollectionRemoveListenerRequest::new(LIST_SERVICE_NAME, "orders", registration_id);
    assert!(remove.process(node.engine(), &client).await.unwrap());
    assert!(!remove.process(node.engine(), &client).await.unwrap());
    assert!(client.destroy_actions().is_empty());

    node.collections()
        .add(CollectionKind::List, "orders", Bytes::from_static(b"o-1"))
        .await
        .unwrap();
    assert!(stays_silent(&mut inbox).await);
    node.shutdown().await;
}

#[tokio::test]
async fn test_local_only_ignores_events_from_other_members() {
    let (node, _) = start_node(4, None);
    let (local, mut local_inbox) = connect(&node, "client-local");
    let (global, mut global_inbox) = connect(&node, "client-global");
    CollectionAddListenerRequest::new(LIST_SERVICE_NAME, "orders", true)
        .local_only(true)
        .process(node.engine(), &local, 1)
        .await
        .unwrap();
    CollectionAddListenerRequest::new(LIST_SERVICE_NAME, "orders", true)
        .process(node.engine(), &global, 2)
        .await
        .unwrap();

    node.events().publish(EventEnvelope::item(
        LIST_SERVICE_NAME,
        DataAwareItemEvent {
            name: "orders".to_string(),
            item_data: Bytes::from_static(b"remote"),
            kind: EventKind::Added,
            member_id: "member-other".to_string(),
        },
    ));

    let (_, push) = next_push(&mut global_inbox).await.unwrap();
    assert_eq!(push.payload.member_uuid, "member-other");
    assert!(stays_silent(&mut local_inbox).await);

    node.collections()
        .add(CollectionKind::List, "orders", Bytes::from_static(b"local"))
        .await
        .unwrap();
    let (_, push) = next_push(&mut local_inbox).await.unwrap();
    assert_eq!(push.payload.item, Some(Bytes::from_static(b"local")));
    node.shutdown().await;
}
