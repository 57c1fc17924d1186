use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::Encoder;
use prometheus::IntCounterVec;
use prometheus::IntGaugeVec;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;
use tracing::error;


lazy_static! {
    pub static ref EVENTS_PUBLISHED: IntCounterVec = IntCounterVec::new(
        Opts::new("events_published", "Events accepted into the dispatch queue"),
        &["service"]
    )
    .expect("metric can not be created");

    pub static ref EVENTS_DELIVERED: IntCounterVec = IntCounterVec::new(
        Opts::new("events_delivered", "Events handed to a listener"),
        &["service"]
    )
    .expect("metric can not be created");

    pub static ref EVENTS_DROPPED: IntCounterVec = IntCounterVec::new(
        Opts::new("events_dropped", "Events discarded before reaching a client"),
        &["reason"]
    )
    .expect("metric can not be created");

    pub static ref EVENT_DELIVERY_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("event_delivery_failures", "Listener contract violations"),
        &["service"]
    )
    .expect("metric can not be created");

    pub static ref ACTIVE_REGISTRATIONS: IntGaugeVec = IntGaugeVec::new(
        Opts::new("active_registrations", "Listener registrations currently held"),
        &["member"]
    )
    .expect("metric can not be created");

    pub static ref ENTRY_VIEW_REQUESTS: IntCounterVec = IntCounterVec::new(
        Opts::new("entry_view_requests", "Entry view reads by outcome"),
        &["outcome"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

pub(crate) const DROP_REASON_QUEUE_FULL: &str = "queue_full";
pub(crate) const DROP_REASON_DISABLED: &str = "disabled";
pub(crate) const DROP_REASON_ENDPOINT_DEAD: &str = "endpoint_dead";

static REGISTER: Once = Once::new();

fn register_custom_metrics(registry: &Registry) {
    registry
        .register(Box::new(EVENTS_PUBLISHED.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(EVENTS_DELIVERED.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(EVENTS_DROPPED.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(EVENT_DELIVERY_FAILURES.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(ACTIVE_REGISTRATIONS.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(ENTRY_VIEW_REQUESTS.clone()))
        .expect("collector can be registered");
}

/// Text exposition of every grid metric, for a scrape endpoint owned by the
/// embedding process.
pub fn render() -> String {
    REGISTER.call_once(|| register_custom_metrics(&REGISTRY));

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        error!("could not encode grid metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_else(|e| {
        error!("grid metrics could not be from_utf8'd: {}", e);
        String::new()
    })
}
