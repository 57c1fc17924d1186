use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use tracing::info;
use tracing::trace;
use tracing::warn;

use super::PartitionRouter;
use crate::utils::time::Clock;
use crate::CollectionStore;
use crate::Error;
use crate::PartitionConfig;
use crate::RecordConfig;
use crate::RecordStore;
use crate::Result;
use crate::RoutingError;
use crate::SystemError;

/// State owned by one partition worker.
#[derive(Debug)]
pub struct PartitionContainer {
    pub record_store: RecordStore,
    pub collections: CollectionStore,
}

impl PartitionContainer {
    pub fn new(record_store: RecordStore) -> Self {
        Self {
            record_store,
            collections: CollectionStore::default(),
        }
    }

    pub fn partition_id(&self) -> u32 {
        self.record_store.partition_id()
    }
}

pub type PartitionTask = Box<dyn FnOnce(&mut PartitionContainer) + Send>;

/// Caller metadata forwarded to the worker for tracing.
///
/// `thread_id` correlates operations of one client session; it is not a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationContext {
    pub name: &'static str,
    pub thread_id: i64,
}

impl OperationContext {
    pub fn new(
        name: &'static str,
        thread_id: i64,
    ) -> Self {
        Self { name, thread_id }
    }

    /// Context for operations raised by the grid itself
    pub fn internal(name: &'static str) -> Self {
        Self { name, thread_id: -1 }
    }
}

struct PartitionHandle {
    sender: mpsc::Sender<PartitionTask>,
    migrating: Arc<AtomicBool>,
}

pub struct PartitionService {
    partitions: Vec<PartitionHandle>,
    router: Arc<dyn PartitionRouter>,
    shutdown_tx: watch::Sender<()>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for PartitionService {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("PartitionService")
            .field("partition_count", &self.partitions.len())
            .finish_non_exhaustive()
    }
}

impl PartitionService {
    /// Spawns one worker per partition. Must be called inside a tokio runtime.
    pub fn start(
        partition_config: &PartitionConfig,
        record_config: &RecordConfig,
        router: Arc<dyn PartitionRouter>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if router.partition_count() != partition_config.partition_count {
            return Err(Error::InvalidConfig(format!(
                "router serves {} partitions, configuration expects {}",
                router.partition_count(),
                partition_config.partition_count
            )));
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let mut partitions = Vec::with_capacity(partition_config.partition_count as usize);
        let mut workers = Vec::with_capacity(partition_config.partition_count as usize);

        for partition_id in 0..partition_config.partition_count {
            let (sender, receiver) = mpsc::channel(partition_config.operation_queue_size);
            let store = RecordStore::new(partition_id, record_config.clone(), clock.clone());
            let worker = PartitionWorker {
                container: PartitionContainer::new(store),
                receiver,
                shutdown: shutdown_rx.clone(),
                sweep_interval_ms: record_config.expiration_sweep_interval_ms,
                clock: clock.clone(),
            };
            workers.push(tokio::spawn(worker.run()));
            partitions.push(PartitionHandle {
                sender,
                migrating: Arc::new(AtomicBool::new(false)),
            });
        }

        info!(
            partition_count = partition_config.partition_count,
            "partition workers started"
        );

        Ok(Self {
            partitions,
            router,
            shutdown_tx,
            workers: Mutex::new(workers),
        })
    }

    pub fn partition_count(&self) -> u32 {
        self.partitions.len() as u32
    }

    /// Current owner of `key`. Not cached: ask again before each attempt.
    pub fn partition_for(
        &self,
        key: &[u8],
    ) -> u32 {
        self.router.route(key)
    }

    /// Runs `op` on the worker that owns `partition_id` and returns its output.
    ///
    /// Fails with [`RoutingError::PartitionMoved`] if the partition is
    /// migrating when the operation reaches the head of the queue.
    pub async fn submit<R, F>(
        &self,
        partition_id: u32,
        ctx: OperationContext,
        op: F,
    ) -> Result<R>
    where
        F: FnOnce(&mut PartitionContainer) -> R + Send + 'static,
        R: Send + 'static,
    {
        let handle = self.handle(partition_id)?;
        let migrating = handle.migrating.clone();
        let (tx, rx) = oneshot::channel();

        let task: PartitionTask = Box::new(move |container| {
            let result: Result<R> = if migrating.load(Ordering::Acquire) {
                Err(RoutingError::PartitionMoved { partition_id }.into())
            } else {
                trace!(
                    partition_id,
                    op = ctx.name,
                    thread_id = ctx.thread_id,
                    "executing partition operation"
                );
                Ok(op(container))
            };
            let _ = tx.send(result);
        });

        handle
            .sender
            .send(task)
            .await
            .map_err(|_| RoutingError::PartitionStopped { partition_id })?;

        rx.await
            .map_err(|_| SystemError::ResponseChannelClosed(format!("partition {partition_id}")))?
    }

    /// Routes `key` and runs `op` on its owner.
    pub async fn submit_to_key<R, F>(
        &self,
        key: &[u8],
        ctx: OperationContext,
        op: F,
    ) -> Result<R>
    where
        F: FnOnce(&mut PartitionContainer) -> R + Send + 'static,
        R: Send + 'static,
    {
        let partition_id = self.partition_for(key);
        self.submit(partition_id, ctx, op).await
    }

    /// Marks a partition as handing off ownership. Operations dequeued while
    /// the flag is set are rejected as moved.
    pub fn set_migrating(
        &self,
        partition_id: u32,
        migrating: bool,
    ) -> Result<()> {
        let handle = self.handle(partition_id)?;
        handle.migrating.store(migrating, Ordering::Release);
        debug!(partition_id, migrating, "partition migration flag changed");
        Ok(())
    }

    pub fn is_migrating(
        &self,
        partition_id: u32,
    ) -> bool {
        self.partitions
            .get(partition_id as usize)
            .map(|h| h.migrating.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    /// Signals every worker to stop and waits for them to exit.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
        let workers = std::mem::take(&mut *self.workers.lock());
        for worker in workers {
            if let Err(e) = worker.await {
                warn!("partition worker ended abnormally: {:?}", e);
            }
        }
        info!("partition workers stopped");
    }

    fn handle(
        &self,
        partition_id: u32,
    ) -> Result<&PartitionHandle> {
        self.partitions.get(partition_id as usize).ok_or_else(|| {
            RoutingError::UnknownPartition {
                partition_id,
                partition_count: self.partition_count(),
            }
            .into()
        })
    }
}

struct PartitionWorker {
    container: PartitionContainer,
    receiver: mpsc::Receiver<PartitionTask>,
    shutdown: watch::Receiver<()>,
    sweep_interval_ms: u64,
    clock: Arc<dyn Clock>,
}

impl PartitionWorker {
    async fn run(mut self) {
        let partition_id = self.container.partition_id();
        let sweep_enabled = self.sweep_interval_ms > 0;
        let mut sweep = interval(Duration::from_millis(self.sweep_interval_ms.max(1)));
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.changed() => {
                    debug!(partition_id, "partition worker received shutdown signal");
                    break;
                }

                task = self.receiver.recv() => match task {
                    Some(task) => task(&mut self.container),
                    None => {
                        debug!(partition_id, "partition queue closed");
                        break;
                    }
                },

                _ = sweep.tick(), if sweep_enabled => {
                    let now = self.clock.now_millis();
                    self.container.record_store.evict_expired(now);
                }
            }
        }
    }
}
