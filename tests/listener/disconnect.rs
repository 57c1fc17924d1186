use bytes::Bytes;
use d_grid::constants::LIST_SERVICE_NAME;
use d_grid::CollectionAddListenerRequest;
use d_grid::CollectionKind;

use crate::commons::connect;
use crate::commons::next_push;
use crate::commons::start_node;
use crate::commons::stays_silent;

#[tokio::test]
async fn test_disconnect_removes_only_that_clients_registrations() {
    let (node, _) = start_node(8, None);
    let (first, mut first_inbox) = connect(&node, "client-1");
    let (second, mut second_inbox) = connect(&node, "client-2");

    let a = CollectionAddListenerRequest::new(LIST_SERVICE_NAME, "orders", true)
        .process(node.engine(), &first, 1)
        .await
        .unwrap();
    let b = CollectionAddListenerRequest::new(LIST_SERVICE_NAME, "orders", true)
        .process(node.engine(), &second, 2)
        .await
        .unwrap();

    assert_eq!(node.engine().endpoint_manager().disconnect("client-1"), 1);
    assert!(!node.events().is_registered(&a));
    assert!(node.events().is_registered(&b));
    assert!(!first.is_alive());
    assert!(node.engine().endpoint_manager().get("client-1").is_none());

    node.collections()
        .add(CollectionKind::List, "orders", Bytes::from_static(b"o-1"))
        .await
        .unwrap();

    let (destination, push) = next_push(&mut second_inbox).await.unwrap();
    assert_eq!(destination, "client-2");
    assert_eq!(push.payload.item, Some(Bytes::from_static(b"o-1")));
    assert!(stays_silent(&mut first_inbox).await);
    node.shutdown().await;
}

#[tokio::test]
async fn test_disconnect_of_unknown_client_is_noop() {
    let (node, _) = start_node(2, None);
    let (client, _inbox) = connect(&node, "client-1");
    CollectionAddListenerRequest::new(LIST_SERVICE_NAME, "orders", false)
        .process(node.engine(), &client, 1)
        .await
        .unwrap();

    assert_eq!(node.engine().endpoint_manager().disconnect("nobody"), 0);
    assert_eq!(node.events().registration_count(), 1);
    assert_eq!(node.engine().endpoint_manager().disconnect("client-1"), 1);
    assert_eq!(node.engine().endpoint_manager().disconnect("client-1"), 0);
    assert_eq!(node.events().registration_count(), 0);
    node.shutdown().await;
}
