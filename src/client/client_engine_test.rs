use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use bytes::Bytes;

use super::*;
use crate::constants::LIST_SERVICE_NAME;
use crate::test_utils::test_config;
use crate::test_utils::test_node;
use crate::test_utils::test_node_with;
use crate::test_utils::TEST_MEMBER_ID;
use crate::test_utils::TEST_START_MILLIS;
use crate::utils::time::ManualClock;
use crate::ActionType;
use crate::Error;
use crate::GridNodeBuilder;
use crate::MockPartitionRouter;
use crate::MockPermissionChecker;
use crate::OperationContext;
use crate::Permission;
use crate::PermissionTable;
use crate::SecurityError;

#[tokio::test]
async fn test_engine_exposes_member_and_services() {
    let (node, _) = test_node(2);
    let engine = node.engine();

    assert_eq!(engine.member_id(), TEST_MEMBER_ID);
    assert_eq!(engine.partition_service().partition_count(), 2);
    assert_eq!(engine.event_service().member_id(), TEST_MEMBER_ID);
    assert_eq!(engine.endpoint_manager().count(), 0);
    node.shutdown().await;
}

#[tokio::test]
async fn test_check_permission_allows_granted_request() {
    let table = Arc::new(PermissionTable::new());
    table.grant(Permission::map("orders", ActionType::Read));
    let (node, _) = test_node_with(2, Some(table));

    let request = MapGetEntryViewRequest::new("orders", Bytes::from_static(b"k"), 1);
    assert!(node.engine().check_permission(&request).is_ok());

    let other = MapGetEntryViewRequest::new("payments", Bytes::from_static(b"k"), 1);
    assert!(matches!(
        node.engine().check_permission(&other),
        Err(Error::Security(SecurityError::AccessDenied { .. }))
    ));
    node.shutdown().await;
}

#[tokio::test]
async fn test_check_permission_surfaces_resolution_failure() {
    let mut checker = MockPermissionChecker::new();
    checker.expect_check().never();
    let (node, _) = test_node_with(2, Some(Arc::new(checker)));

    let request = CollectionAddListenerRequest::new("dgrid:impl:queueService", "jobs", true);
    assert!(matches!(
        node.engine().check_permission(&request),
        Err(Error::InvalidArgument(_))
    ));

    let request = CollectionAddListenerRequest::new(LIST_SERVICE_NAME, "jobs", true);
    let mut checker = MockPermissionChecker::new();
    checker
        .expect_check()
        .withf(|p| *p == Permission::list("jobs", ActionType::Listen))
        .times(1)
        .returning(|_| true);
    let (other, _) = test_node_with(2, Some(Arc::new(checker)));
    assert!(other.engine().check_permission(&request).is_ok());

    node.shutdown().await;
    other.shutdown().await;
}

#[tokio::test]
async fn test_invoke_routes_again_after_partition_moved() {
    let routes = Arc::new(AtomicUsize::new(0));
    let counter = routes.clone();
    let mut router = MockPartitionRouter::new();
    router.expect_partition_count().return_const(2u32);
    // first lookup lands on the old owner, later lookups on the new one
    router.expect_route().returning(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            1
        } else {
            0
        }
    });

    let node = GridNodeBuilder::new(test_config(2))
        .router(Arc::new(router))
        .clock(Arc::new(ManualClock::new(TEST_START_MILLIS)))
        .build()
        .unwrap();
    node.partitions().set_migrating(1, true).unwrap();

    let request = MapGetEntryViewRequest::new("orders", Bytes::from_static(b"k"), 1);
    let partition = node
        .engine()
        .invoke_on_key_owner(&request, OperationContext::new("lookup", 1), |container| {
            container.partition_id()
        })
        .await
        .unwrap();

    assert_eq!(partition, 0);
    assert_eq!(routes.load(Ordering::SeqCst), 2);
    node.shutdown().await;
}

#[tokio::test]
async fn test_invoke_returns_non_retryable_error_immediately() {
    let (node, _) = test_node(2);
    node.partitions().shutdown().await;

    let request = MapGetEntryViewRequest::new("orders", Bytes::from_static(b"k"), 1);
    let result = node
        .engine()
        .invoke_on_key_owner(&request, OperationContext::new("lookup", 1), |_| ())
        .await;

    assert!(matches!(result, Err(Error::Routing(_))));
    assert!(!result.unwrap_err().is_retryable());
}

#[tokio::test]
async fn test_invoke_exhausts_configured_attempts() {
    let (node, _) = test_node(1);
    node.partitions().set_migrating(0, true).unwrap();
    let attempts = Arc::new(AtomicUsize::new(0));

    let counter = attempts.clone();
    let request = MapGetEntryViewRequest::new("orders", Bytes::from_static(b"k"), 1);
    let result = node
        .engine()
        .invoke_on_key_owner(&request, OperationContext::new("lookup", 1), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .await;

    assert!(matches!(result, Err(Error::RetryExhausted(_))));
    // rejected before the operation body runs
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
    node.shutdown().await;
}
