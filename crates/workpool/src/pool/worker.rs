use crate::{Error, PoolStats, WorkItem};
use core::any::Any;
use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

/// Worker task responsible for processing [`WorkItem`]s.
///
/// All workers of a pool share one bounded MPMC queue. Each worker pulls the
/// next item, runs its task, writes the outcome into the item's result slot
/// and goes back to the queue. The loop exits once every sender of the queue
/// has been dropped and the queue is empty, so items accepted before shutdown
/// are always drained.
///
/// This function is designed to be spawned as a Tokio task.
///
/// # Arguments
///
/// - `worker_id`: Index of this worker (used for logs and panic reports).
/// - `rx`: Shared receiving end of the work queue.
/// - `stats`: Counters shared with the owning pool.
pub async fn worker_loop(worker_id: usize, rx: flume::Receiver<WorkItem>, stats: Arc<PoolStats>) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} started");

    while let Ok(item) = rx.recv_async().await {
        run_item(worker_id, item, &stats);

        // A non-empty queue resolves `recv_async` immediately, so hand the
        // thread back to the scheduler between items.
        tokio::task::yield_now().await;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} stopped");
}

/// Runs one item to completion and publishes the outcome.
///
/// A panicking task is caught here and reported through the item's slot as
/// [`Error::WorkerPanic`]; the worker itself keeps running.
pub(crate) fn run_item(worker_id: usize, item: WorkItem, stats: &PoolStats) {
    let WorkItem {
        inputs,
        task,
        slot,
    } = item;

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| task(&inputs))).map_err(|payload| {
        Error::WorkerPanic {
            worker_id,
            message: panic_message(payload.as_ref()),
        }
    });

    // Counted before publishing so a submitter that sees its result also sees
    // the item accounted for.
    match &outcome {
        Ok(_) => stats.record_completed(),
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("{_e}");
            stats.record_failed();
        }
    }

    if slot.send(outcome).is_err() {
        #[cfg(feature = "tracing")]
        tracing::debug!("Worker {worker_id} dropped a result: submitter went away");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
