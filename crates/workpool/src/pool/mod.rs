//! Worker pool orchestration.
//!
//! - [`manager`] - The [`WorkerPool`] handle: start, submit, shutdown.
//! - [`worker`] - The per-task loop draining the shared queue.

pub mod manager;
pub mod worker;


pub use manager::WorkerPool;
