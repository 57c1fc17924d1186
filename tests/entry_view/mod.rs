use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use d_grid::ActionType;
use d_grid::Error;
use d_grid::MapGetEntryViewRequest;
use d_grid::Permission;
use d_grid::PermissionTable;
use d_grid::SecurityError;

use crate::commons::start_node;
use crate::commons::START_MILLIS;

fn key() -> Bytes {
    Bytes::from_static(b"order-1")
}

#[tokio::test]
async fn test_entry_view_reports_versions_and_hits() {
    let (node, clock) = start_node(8, None);
    let maps = node.maps();
    maps.put("orders", key(), Bytes::from_static(b"v1"), None).await.unwrap();
    clock.advance(5);
    maps.put("orders", key(), Bytes::from_static(b"v2"), None).await.unwrap();
    maps.get("orders", key()).await.unwrap();
    maps.get("orders", key()).await.unwrap();

    let view = MapGetEntryViewRequest::new("orders", key(), 1)
        .process(node.engine())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(view.value, Bytes::from_static(b"v2"));
    assert_eq!(view.version, 1);
    assert_eq!(view.hits, 2);
    assert_eq!(view.creation_time, START_MILLIS);
    assert_eq!(view.last_update_time, START_MILLIS + 5);
    assert!(view.cost > 0);
    node.shutdown().await;
}

#[tokio::test]
async fn test_entry_view_of_absent_key() {
    let (node, _) = start_node(8, None);

    let view = MapGetEntryViewRequest::new("orders", key(), 1)
        .process(node.engine())
        .await
        .unwrap();

    assert!(view.is_none());
    node.shutdown().await;
}

#[tokio::test]
async fn test_entry_view_ttl_boundary() {
    let (node, clock) = start_node(8, None);
    node.maps()
        .put("orders", key(), Bytes::from_static(b"v"), Some(5_000))
        .await
        .unwrap();
    let request = MapGetEntryViewRequest::new("orders", key(), 1);

    clock.advance(4_999);
    let view = request.process(node.engine()).await.unwrap().unwrap();
    assert_eq!(view.ttl, 5_000);
    assert_eq!(view.expiration_time, Some(START_MILLIS + 5_000));

    clock.advance(1);
    assert!(request.process(node.engine()).await.unwrap().is_none());
    node.shutdown().await;
}

#[tokio::test]
async fn test_entry_view_denied_without_read_permission() {
    let table = Arc::new(PermissionTable::new());
    table.grant(Permission::map("payments", ActionType::Read));
    let (node, _) = start_node(8, Some(table));
    node.maps().put("orders", key(), Bytes::from_static(b"v"), None).await.unwrap();

    let result = MapGetEntryViewRequest::new("orders", key(), 1)
        .process(node.engine())
        .await;

    match result {
        Err(Error::Security(SecurityError::AccessDenied { object_name, .. })) => {
            assert_eq!(object_name, "orders")
        }
        other => panic!("expected access denied, got {other:?}"),
    }
    node.shutdown().await;
}

#[tokio::test]
async fn test_entry_view_follows_partition_after_migration() {
    let (node, _) = start_node(8, None);
    node.maps().put("orders", key(), Bytes::from_static(b"v"), None).await.unwrap();
    let partitions = node.partitions().clone();
    let partition_id = partitions.partition_for(&key());
    partitions.set_migrating(partition_id, true).unwrap();

    let handoff = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        partitions.set_migrating(partition_id, false).unwrap();
    });

    let view = MapGetEntryViewRequest::new("orders", key(), 1)
        .process(node.engine())
        .await
        .unwrap();

    handoff.await.unwrap();
    assert_eq!(view.map(|v| v.value), Some(Bytes::from_static(b"v")));
    node.shutdown().await;
}
