use std::sync::Arc;

use super::*;
use crate::constants::LIST_SERVICE_NAME;
use crate::constants::SET_SERVICE_NAME;
use crate::from_bytes;
use crate::test_utils::test_endpoint;
use crate::test_utils::test_node;
use crate::test_utils::test_node_with;
use crate::to_bytes;
use crate::Error;
use crate::PermissionTable;

#[test]
fn test_request_metadata_and_wire_form() {
    let request = CollectionRemoveListenerRequest::new(SET_SERVICE_NAME, "tags", "reg-1");

    assert_eq!(request.method_name(), "removeItemListener");
    assert_eq!(request.distributed_object_name(), "tags");
    assert_eq!(request.parameters(), vec![RequestParameter::Null]);

    let decoded: CollectionRemoveListenerRequest = from_bytes(&to_bytes(&request).unwrap()).unwrap();
    assert_eq!(decoded, request);
}

#[tokio::test]
async fn test_remove_clears_registration_and_destroy_action() {
    let (node, _) = test_node(2);
    let (endpoint, _rx) = test_endpoint("client-1");
    let id = CollectionAddListenerRequest::new(LIST_SERVICE_NAME, "jobs", true)
        .process(node.engine(), &endpoint, 1)
        .await
        .unwrap();

    let removed = CollectionRemoveListenerRequest::new(LIST_SERVICE_NAME, "jobs", id.clone())
        .process(node.engine(), &endpoint)
        .await
        .unwrap();

    assert!(removed);
    assert!(!node.events().is_registered(&id));
    assert!(endpoint.destroy_actions().is_empty());
    node.shutdown().await;
}

#[tokio::test]
async fn test_remove_under_wrong_object_keeps_registration() {
    let (node, _) = test_node(2);
    let (endpoint, _rx) = test_endpoint("client-1");
    let id = CollectionAddListenerRequest::new(LIST_SERVICE_NAME, "jobs", true)
        .process(node.engine(), &endpoint, 1)
        .await
        .unwrap();

    let removed = CollectionRemoveListenerRequest::new(LIST_SERVICE_NAME, "other", id.clone())
        .process(node.engine(), &endpoint)
        .await
        .unwrap();

    assert!(!removed);
    assert!(node.events().is_registered(&id));
    assert_eq!(endpoint.destroy_actions().len(), 1);
    node.shutdown().await;
}

#[tokio::test]
async fn test_remove_requires_listen_permission() {
    let (node, _) = test_node_with(2, Some(Arc::new(PermissionTable::new())));
    let (endpoint, _rx) = test_endpoint("client-1");

    let result = CollectionRemoveListenerRequest::new(LIST_SERVICE_NAME, "jobs", "reg-1")
        .process(node.engine(), &endpoint)
        .await;

    assert!(matches!(result, Err(Error::Security(_))));
    node.shutdown().await;
}
