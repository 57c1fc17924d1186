use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::utils::time::ManualClock;
use crate::BackoffPolicy;
use crate::ChannelEventSink;
use crate::ClientEndpoint;
use crate::ClientEvent;
use crate::GridConfig;
use crate::GridNode;
use crate::GridNodeBuilder;
use crate::PermissionChecker;

pub const TEST_MEMBER_ID: &str = "member-1";
pub const TEST_START_MILLIS: u64 = 1_000;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
}

/// Small layout, fixed member id, no background sweep and fast retries.
pub fn test_config(partition_count: u32) -> GridConfig {
    let mut config = GridConfig::default();
    config.cluster.member_id = Some(TEST_MEMBER_ID.to_string());
    config.partition.partition_count = partition_count;
    config.record.expiration_sweep_interval_ms = 0;
    config.retry.routing = fast_retry(5);
    config
}

pub fn fast_retry(max_retries: usize) -> BackoffPolicy {
    BackoffPolicy {
        max_retries,
        timeout_ms: 500,
        base_delay_ms: 1,
        max_delay_ms: 5,
    }
}

pub fn test_node_with(
    partition_count: u32,
    security: Option<Arc<dyn PermissionChecker>>,
) -> (GridNode, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(TEST_START_MILLIS));
    let mut builder = GridNodeBuilder::new(test_config(partition_count)).clock(clock.clone());
    if let Some(security) = security {
        builder = builder.security(security);
    }
    (builder.build().expect("test node builds"), clock)
}

pub fn test_node(partition_count: u32) -> (GridNode, Arc<ManualClock>) {
    test_node_with(partition_count, None)
}

pub type EventReceiver = mpsc::UnboundedReceiver<(String, ClientEvent)>;

/// Endpoint whose pushes land in the returned receiver.
pub fn test_endpoint(uuid: &str) -> (Arc<ClientEndpoint>, EventReceiver) {
    let (sink, rx) = ChannelEventSink::channel();
    (Arc::new(ClientEndpoint::new(uuid, Arc::new(sink))), rx)
}

pub async fn next_event(rx: &mut EventReceiver) -> Option<(String, ClientEvent)> {
    timeout(Duration::from_millis(500), rx.recv()).await.ok().flatten()
}

/// True when nothing arrives within a short grace period.
pub async fn no_event(rx: &mut EventReceiver) -> bool {
    timeout(Duration::from_millis(100), rx.recv()).await.is_err()
}
