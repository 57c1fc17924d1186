use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use nanoid::nanoid;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::trace;
use tracing::warn;

use super::EventEnvelope;
use super::EventFilter;
use super::EventListener;
use crate::metrics::ACTIVE_REGISTRATIONS;
use crate::metrics::DROP_REASON_DISABLED;
use crate::metrics::DROP_REASON_QUEUE_FULL;
use crate::metrics::EVENTS_DELIVERED;
use crate::metrics::EVENTS_DROPPED;
use crate::metrics::EVENTS_PUBLISHED;
use crate::metrics::EVENT_DELIVERY_FAILURES;
use crate::ListenerConfig;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TopicKey {
    service_name: String,
    object_name: String,
}

impl TopicKey {
    fn new(
        service_name: &str,
        object_name: &str,
    ) -> Self {
        Self {
            service_name: service_name.to_string(),
            object_name: object_name.to_string(),
        }
    }
}

/// Public view of one active subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRegistration {
    pub id: String,
    pub service_name: String,
    pub object_name: String,
    pub filter: EventFilter,
    pub local_only: bool,
}

struct Registration {
    meta: EventRegistration,
    listener: Arc<dyn EventListener>,
}

struct EventServiceInner {
    member_id: String,
    /// Registrations grouped by (service, object)
    topics: DashMap<TopicKey, Vec<Arc<Registration>>>,
    /// Registration id -> topic, for teardown by id
    by_id: DashMap<String, TopicKey>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
    shutdown_tx: Mutex<Option<watch::Sender<()>>>,
    event_receiver: Mutex<Option<mpsc::Receiver<EventEnvelope>>>,
    config: ListenerConfig,
}

/// Process-wide registry of event subscriptions.
///
/// Register and deregister may run concurrently with dispatch. The dispatcher
/// clones a topic's registrations out of the map before invoking listeners,
/// so registration churn never waits on a slow listener.
pub struct EventService {
    inner: Arc<EventServiceInner>,
    event_sender: mpsc::Sender<EventEnvelope>,
}

impl fmt::Debug for EventService {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("EventService")
            .field("member_id", &self.inner.member_id)
            .field("registrations", &self.inner.by_id.len())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl EventService {
    pub fn new(
        config: ListenerConfig,
        member_id: impl Into<String>,
    ) -> Self {
        let (event_sender, event_receiver) = mpsc::channel(config.event_queue_size.max(1));

        let inner = Arc::new(EventServiceInner {
            member_id: member_id.into(),
            topics: DashMap::new(),
            by_id: DashMap::new(),
            dispatcher: Mutex::new(None),
            shutdown_tx: Mutex::new(None),
            event_receiver: Mutex::new(Some(event_receiver)),
            config,
        });

        Self { inner, event_sender }
    }

    pub fn member_id(&self) -> &str {
        &self.inner.member_id
    }

    /// Spawns the dispatcher task.
    ///
    /// A no-op when already running, after `stop()`, or when listeners are
    /// disabled in configuration.
    pub fn start(&self) {
        if !self.inner.config.enabled {
            info!("listener dispatch disabled by configuration");
            return;
        }

        let mut dispatcher = self.inner.dispatcher.lock();
        if dispatcher.is_some() {
            return;
        }
        let Some(mut receiver) = self.inner.event_receiver.lock().take() else {
            return;
        };

        let (shutdown_tx, mut shutdown_rx) = watch::channel(());
        let inner = self.inner.clone();

        let handle = tokio::spawn(async move {
            debug!("event dispatcher started");
            loop {
                tokio::select! {
                    event = receiver.recv() => match event {
                        Some(event) => Self::dispatch_event(&inner, event),
                        None => {
                            warn!("event queue closed unexpectedly");
                            break;
                        }
                    },
                    _ = shutdown_rx.changed() => {
                        debug!("event dispatcher received shutdown signal");
                        break;
                    }
                }
            }
            debug!("event dispatcher stopped");
        });

        *dispatcher = Some(handle);
        *self.inner.shutdown_tx.lock() = Some(shutdown_tx);
    }

    /// Stops the dispatcher. Events still queued are discarded.
    pub async fn stop(&self) {
        if let Some(tx) = self.inner.shutdown_tx.lock().take() {
            let _ = tx.send(());
        }
        let handle = self.inner.dispatcher.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("event dispatcher ended abnormally: {:?}", e);
            }
        }
    }

    /// Subscribes `listener` to events of every member.
    pub fn register_listener(
        &self,
        service_name: &str,
        object_name: &str,
        filter: EventFilter,
        listener: Arc<dyn EventListener>,
    ) -> EventRegistration {
        self.register(service_name, object_name, filter, false, listener)
    }

    /// Subscribes `listener` to events produced on this member only.
    pub fn register_local_listener(
        &self,
        service_name: &str,
        object_name: &str,
        filter: EventFilter,
        listener: Arc<dyn EventListener>,
    ) -> EventRegistration {
        self.register(service_name, object_name, filter, true, listener)
    }

    fn register(
        &self,
        service_name: &str,
        object_name: &str,
        filter: EventFilter,
        local_only: bool,
        listener: Arc<dyn EventListener>,
    ) -> EventRegistration {
        let key = TopicKey::new(service_name, object_name);
        let meta = EventRegistration {
            id: nanoid!(),
            service_name: service_name.to_string(),
            object_name: object_name.to_string(),
            filter,
            local_only,
        };

        self.inner.by_id.insert(meta.id.clone(), key.clone());
        self.inner.topics.entry(key).or_default().push(Arc::new(Registration {
            meta: meta.clone(),
            listener,
        }));
        ACTIVE_REGISTRATIONS
            .with_label_values(&[self.inner.member_id.as_str()])
            .inc();

        trace!(
            registration_id = %meta.id,
            service_name,
            object_name,
            local_only,
            include_value = filter.include_value,
            "listener registered"
        );
        meta
    }

    /// Removes a registration. Returns false if it was not (or no longer)
    /// registered under that service and object.
    ///
    /// Events already handed to the listener are not recalled.
    pub fn deregister_listener(
        &self,
        service_name: &str,
        object_name: &str,
        registration_id: &str,
    ) -> bool {
        let key = TopicKey::new(service_name, object_name);
        if self
            .inner
            .by_id
            .remove_if(registration_id, |_, topic| *topic == key)
            .is_none()
        {
            return false;
        }

        self.inner.topics.remove_if_mut(&key, |_, registrations| {
            registrations.retain(|r| r.meta.id != registration_id);
            registrations.is_empty()
        });
        ACTIVE_REGISTRATIONS
            .with_label_values(&[self.inner.member_id.as_str()])
            .dec();

        trace!(registration_id, service_name, object_name, "listener deregistered");
        true
    }

    pub fn is_registered(
        &self,
        registration_id: &str,
    ) -> bool {
        self.inner.by_id.contains_key(registration_id)
    }

    /// Total number of live registrations
    pub fn registration_count(&self) -> usize {
        self.inner.by_id.len()
    }

    pub fn registrations(
        &self,
        service_name: &str,
        object_name: &str,
    ) -> Vec<EventRegistration> {
        self.inner
            .topics
            .get(&TopicKey::new(service_name, object_name))
            .map(|regs| regs.iter().map(|r| r.meta.clone()).collect())
            .unwrap_or_default()
    }

    /// Queues an event for dispatch.
    ///
    /// Called from partition workers and MUST NOT block: when the queue is
    /// full the event is dropped. Returns whether the event was queued.
    pub fn publish(
        &self,
        event: EventEnvelope,
    ) -> bool {
        if !self.inner.config.enabled {
            EVENTS_DROPPED.with_label_values(&[DROP_REASON_DISABLED]).inc();
            return false;
        }

        let service_name = event.service_name.clone();
        match self.event_sender.try_send(event) {
            Ok(()) => {
                EVENTS_PUBLISHED.with_label_values(&[&service_name]).inc();
                true
            }
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(
                    service_name = %event.service_name,
                    object_name = %event.object_name,
                    "event queue full, dropping event"
                );
                EVENTS_DROPPED.with_label_values(&[DROP_REASON_QUEUE_FULL]).inc();
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                EVENTS_DROPPED.with_label_values(&[DROP_REASON_DISABLED]).inc();
                false
            }
        }
    }

    fn dispatch_event(
        inner: &EventServiceInner,
        event: EventEnvelope,
    ) {
        let key = TopicKey::new(&event.service_name, &event.object_name);
        let registrations: Vec<Arc<Registration>> = match inner.topics.get(&key) {
            Some(regs) => regs.clone(),
            None => return,
        };

        for registration in registrations {
            let meta = &registration.meta;
            if !meta.filter.accepts(event.kind) {
                continue;
            }
            if meta.local_only && event.member_id != inner.member_id {
                continue;
            }

            match registration.listener.on_event(&event, meta.filter.include_value) {
                Ok(()) => {
                    EVENTS_DELIVERED.with_label_values(&[&event.service_name]).inc();
                }
                Err(e) => {
                    error!(
                        registration_id = %meta.id,
                        service_name = %event.service_name,
                        object_name = %event.object_name,
                        "listener rejected event: {}",
                        e
                    );
                    EVENT_DELIVERY_FAILURES
                        .with_label_values(&[&event.service_name])
                        .inc();
                }
            }
        }

        trace!(
            service_name = %event.service_name,
            object_name = %event.object_name,
            kind = ?event.kind,
            "event dispatched"
        );
    }
}
