use crate::{Error, Result};
use core::time::Duration;

/// Sizing and lifecycle settings for a [`WorkerPool`](crate::WorkerPool).
///
/// Both bounds are fixed for the lifetime of the pool. The defaults follow
/// the machine: one worker per logical CPU and a queue that can hold one
/// pending item per worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker tasks pulling from the shared queue.
    pub num_workers: usize,
    /// Maximum number of items waiting in the queue before `submit` blocks.
    pub queue_capacity: usize,
    /// Upper bound on how long `shutdown` waits for the drain. `None` waits
    /// until every worker has exited.
    pub drain_timeout: Option<Duration>,
}

impl PoolConfig {
    pub const fn new(num_workers: usize, queue_capacity: usize) -> Self {
        Self {
            num_workers,
            queue_capacity,
            drain_timeout: None,
        }
    }

    #[must_use]
    pub const fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = Some(timeout);
        self
    }

    /// Checks that the pool can make progress with these bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if either the worker count or the queue
    /// capacity is zero.
    pub fn validate(&self) -> Result<()> {
        if self.num_workers == 0 {
            return Err(Error::InvalidConfig {
                reason: "num_workers must be greater than 0".to_string(),
            });
        }

        // A zero-capacity flume channel is a rendezvous channel, which would
        // make `try_submit` fail whenever no worker is parked on the queue.
        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfig {
                reason: "queue_capacity must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        let cpus = num_cpus::get();
        Self::new(cpus, cpus)
    }
}
