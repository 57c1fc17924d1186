use bytes::Bytes;
use d_grid::constants::LIST_SERVICE_NAME;
use d_grid::CollectionAddListenerRequest;
use d_grid::CollectionKind;

use crate::commons::connect;
use crate::commons::next_push;
use crate::commons::start_node;
use crate::commons::stays_silent;

#[tokio::test]
async fn test_dead_endpoint_is_skipped_without_dropping_registration() {
    let (node, _) = start_node(8, None);
    let (client, mut inbox) = connect(&node, "client-1");

    let registration_id = CollectionAddListenerRequest::new(LIST_SERVICE_NAME, "orders", true)
        .process(node.engine(), &client, 42)
        .await
        .unwrap();

    client.mark_dead();
    node.collections()
        .add(CollectionKind::List, "orders", Bytes::from_static(b"o-1"))
        .await
        .unwrap();

    assert!(stays_silent(&mut inbox).await);
    assert!(node.events().is_registered(&registration_id));
    node.shutdown().await;
}

#[tokio::test]
async fn test_one_dead_endpoint_does_not_block_others() {
    let (node, _) = start_node(8, None);
    let (dead, mut dead_inbox) = connect(&node, "client-dead");
    let (live, mut live_inbox) = connect(&node, "client-live");

    for (endpoint, call_id) in [(&dead, 1), (&live, 2)] {
        CollectionAddListenerRequest::new(LIST_SERVICE_NAME, "orders", true)
            .process(node.engine(), endpoint, call_id)
            .await
            .unwrap();
    }
    dead.mark_dead();

    node.collections()
        .add(CollectionKind::List, "orders", Bytes::from_static(b"o-1"))
        .await
        .unwrap();

    let (destination, push) = next_push(&mut live_inbox).await.unwrap();
    assert_eq!(destination, "client-live");
    assert_eq!(push.call_id, 2);
    assert!(stays_silent(&mut dead_inbox).await);
    node.shutdown().await;
}
