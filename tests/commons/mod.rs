use std::sync::Arc;
use std::time::Duration;

use d_grid::utils::time::ManualClock;
use d_grid::BackoffPolicy;
use d_grid::ChannelEventSink;
use d_grid::ClientEndpoint;
use d_grid::ClientEvent;
use d_grid::GridConfig;
use d_grid::GridNode;
use d_grid::GridNodeBuilder;
use d_grid::PermissionChecker;
use tokio::sync::mpsc;
use tokio::time::timeout;

pub const MEMBER_ID: &str = "member-it";
pub const START_MILLIS: u64 = 10_000;

// events that should arrive
pub const EVENT_WAIT_IN_MS: u64 = 500;
// events that should not
pub const SILENCE_WAIT_IN_MS: u64 = 100;

pub type Inbox = mpsc::UnboundedReceiver<(String, ClientEvent)>;

pub fn config(partition_count: u32) -> GridConfig {
    let mut config = GridConfig::default();
    config.cluster.member_id = Some(MEMBER_ID.to_string());
    config.partition.partition_count = partition_count;
    config.record.expiration_sweep_interval_ms = 0;
    config.retry.routing = BackoffPolicy {
        max_retries: 50,
        timeout_ms: 500,
        base_delay_ms: 1,
        max_delay_ms: 10,
    };
    config
}

pub fn start_node(
    partition_count: u32,
    security: Option<Arc<dyn PermissionChecker>>,
) -> (GridNode, Arc<ManualClock>) {
    crate::enable_logger();
    let clock = Arc::new(ManualClock::new(START_MILLIS));
    let mut builder = GridNodeBuilder::new(config(partition_count)).clock(clock.clone());
    if let Some(security) = security {
        builder = builder.security(security);
    }
    (builder.build().expect("node starts"), clock)
}

/// Connects a client to `node` and returns its endpoint and push inbox.
pub fn connect(
    node: &GridNode,
    uuid: &str,
) -> (Arc<ClientEndpoint>, Inbox) {
    let (sink, inbox) = ChannelEventSink::channel();
    let endpoint = Arc::new(ClientEndpoint::new(uuid, Arc::new(sink)));
    node.engine().endpoint_manager().register(endpoint.clone());
    (endpoint, inbox)
}

pub async fn next_push(inbox: &mut Inbox) -> Option<(String, ClientEvent)> {
    timeout(Duration::from_millis(EVENT_WAIT_IN_MS), inbox.recv())
        .await
        .ok()
        .flatten()
}

pub async fn stays_silent(inbox: &mut Inbox) -> bool {
    timeout(Duration::from_millis(SILENCE_WAIT_IN_MS), inbox.recv())
        .await
        .is_err()
}
