//! Bounded pool of asynchronous workers.
//!
//! This module defines the [`WorkerPool`] struct, which owns the submitting end
//! of a bounded multi-producer multi-consumer queue and a fixed set of worker
//! tasks draining it. Items are dequeued in submission order across the pool
//! as a whole; each worker runs one item at a time and answers through the
//! item's private result slot.
//!
//! Shutdown follows a close-then-drain protocol: the shared
//! [`CancellationToken`] is cancelled so new submissions are refused, the
//! pool's sender is dropped, and the workers exit once the queue is both
//! closed and empty.

use crate::{
    Error, PoolConfig, PoolStats, Result, StatsSnapshot, Task, WorkItem, pool::worker::worker_loop,
};
use flume::TrySendError;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::timeout;
use tokio_util::{sync::CancellationToken, task::TaskTracker};

/// A fixed-size pool of Tokio tasks processing [`WorkItem`]s from one shared
/// bounded queue.
///
/// Tasks run inline on the worker's runtime thread, so they should be short
/// and CPU-cheap. A slow function holds that thread for its whole run; use a
/// multi-threaded runtime with spare threads, or keep heavy work out of the
/// pool and run it with [`tokio::task::spawn_blocking`].
///
/// Share it between submitters with an [`Arc`]. Dropping the pool without
/// calling [`shutdown`](Self::shutdown) still closes the queue; the workers
/// finish whatever is queued and exit in the background.
pub struct WorkerPool {
    // `None` once shutdown has begun.
    queue: Mutex<Option<flume::Sender<WorkItem>>>,
    shutdown_token: CancellationToken,
    workers: TaskTracker,
    stats: Arc<PoolStats>,
    config: PoolConfig,
}

impl WorkerPool {
    /// Validates `config`, creates the work queue and spawns the workers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the worker count or queue capacity
    /// is zero.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn start(config: PoolConfig) -> Result<Self> {
        config.validate()?;

        let (tx, rx) = flume::bounded(config.queue_capacity);
        let stats = Arc::new(PoolStats::default());
        let workers = TaskTracker::new();

        for worker_id in 0..config.num_workers {
            workers.spawn(worker_loop(worker_id, rx.clone(), Arc::clone(&stats)));
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Started worker pool with {} workers (queue capacity {})",
            config.num_workers,
            config.queue_capacity
        );

        Ok(Self {
            queue: Mutex::new(Some(tx)),
            shutdown_token: CancellationToken::new(),
            workers,
            stats,
            config,
        })
    }

    fn sender(&self) -> Result<flume::Sender<WorkItem>> {
        if self.shutdown_token.is_cancelled() {
            return Err(Error::ServiceShutdown);
        }
        self.queue.lock().clone().ok_or(Error::ServiceShutdown)
    }

    /// Enqueues `item`, waiting while the queue is full.
    ///
    /// The outcome is delivered through the item's
    /// [`ResultSlot`](crate::ResultSlot). If this returns an error the item was
    /// dropped and its slot resolves to [`Error::ChannelError`].
    ///
    /// # Errors
    ///
    /// - [`Error::ServiceShutdown`] if shutdown has begun.
    /// - [`Error::ChannelError`] if every worker is gone.
    pub async fn submit(&self, item: WorkItem) -> Result<()> {
        let sender = self.sender()?;

        self.stats.record_submitted();
        if sender.send_async(item).await.is_err() {
            self.stats.record_rejected();
            return Err(Error::channel("work queue disconnected"));
        }

        Ok(())
    }

    /// Enqueues `item` without waiting.
    ///
    /// # Errors
    ///
    /// - [`Error::QueueFull`] if the queue is at capacity.
    /// - [`Error::ServiceShutdown`] if shutdown has begun.
    /// - [`Error::ChannelError`] if every worker is gone.
    pub fn try_submit(&self, item: WorkItem) -> Result<()> {
        let sender = self.sender()?;

        self.stats.record_submitted();
        sender.try_send(item).map_err(|e| {
            self.stats.record_rejected();
            match e {
                TrySendError::Full(_) => Error::QueueFull,
                TrySendError::Disconnected(_) => Error::channel("work queue disconnected"),
            }
        })
    }

    /// Submits `task` over `inputs` and waits for its result.
    ///
    /// # Errors
    ///
    /// Any error from [`submit`](Self::submit) or
    /// [`ResultSlot::wait`](crate::ResultSlot::wait).
    pub async fn compute(&self, inputs: Vec<i64>, task: Task) -> Result<i64> {
        let (item, slot) = WorkItem::with_task(inputs, task);
        self.submit(item).await?;
        slot.wait().await
    }

    /// Gracefully shuts down the pool.
    ///
    /// - Cancels the shared [`CancellationToken`] so new submissions fail with
    ///   [`Error::ServiceShutdown`].
    /// - Drops the pool's sender. Submissions already waiting for room keep
    ///   their own sender and still land in the queue.
    /// - Waits for every worker to drain the queue and exit.
    ///
    /// Calling it again after it returned is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DrainTimeout`] if a drain timeout is configured and the
    /// workers are still busy when it expires. The workers keep draining in
    /// the background.
    pub async fn shutdown(&self) -> Result<()> {
        // === Phase 0: Stop accepting new submissions ===
        #[cfg(feature = "tracing")]
        tracing::debug!("Refusing new submissions");
        self.shutdown_token.cancel();

        // === Phase 1: Close the queue ===
        // The channel disconnects once the last in-progress `submit` releases
        // its sender clone.
        drop(self.queue.lock().take());
        self.workers.close();

        // === Phase 2: Wait for the workers to drain ===
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Draining {} in-flight item(s)",
            self.stats.snapshot().in_flight()
        );

        match self.config.drain_timeout {
            Some(limit) => {
                if timeout(limit, self.workers.wait()).await.is_err() {
                    let pending = self.stats.snapshot().in_flight();
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Drain timed out ({pending} item(s) still pending)");
                    return Err(Error::DrainTimeout { pending });
                }
            }
            None => self.workers.wait().await,
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Worker pool shutdown complete");

        Ok(())
    }

    /// A handle to the pool's shutdown signal.
    ///
    /// Cancelled as the first step of [`shutdown`](Self::shutdown).
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Number of items currently waiting in the queue. Reads zero once
    /// shutdown has begun; use [`stats`](Self::stats) for the drain backlog.
    pub fn queued(&self) -> usize {
        self.queue.lock().as_ref().map_or(0, flume::Sender::len)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }
}
