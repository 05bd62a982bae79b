//! Error types for the worker pool.
//!
//! This module defines the central `Error` enum, which captures every
//! recoverable and reportable failure the pool can surface to a submitter.
//!
//! ## Error Cases
//! - `ChannelError`: An internal channel closed before a message got through.
//! - `WorkerPanic`: A submitted task panicked inside a worker.
//! - `QueueFull`: A non-blocking submission found the queue at capacity.
//! - `ServiceShutdown`: Work arrived after shutdown began.
//! - `InvalidConfig`: The pool was configured with unusable bounds.
//! - `DrainTimeout`: Workers did not finish draining before the deadline.

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the worker pool.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// Internal channel send/receive failure (e.g., disconnected queue or a
    /// result slot dropped before a value was written).
    #[error("Channel error: {context}")]
    ChannelError { context: String },

    /// The task panicked. The worker that ran it recovered and kept going.
    #[error("Worker {worker_id} recovered from a task panic: {message}")]
    WorkerPanic { worker_id: usize, message: String },

    /// The queue was at capacity and the caller asked not to wait.
    #[error("Work queue is full")]
    QueueFull,

    /// The pool is in the process of shutting down.
    #[error("Worker pool is shutting down")]
    ServiceShutdown,

    /// The pool configuration was rejected.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Shutdown gave up waiting on the workers.
    #[error("Drain timed out with {pending} item(s) still pending")]
    DrainTimeout { pending: u64 },
}

impl Error {
    pub(crate) fn channel(context: impl Into<String>) -> Self {
        Self::ChannelError {
            context: context.into(),
        }
    }
}
