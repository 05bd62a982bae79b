//! Units of work and their private result slots.

use crate::{Error, Result};
use core::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;

/// A pure function from an ordered sequence of integers to a single integer.
///
/// Shared behind an [`Arc`] so the same function can back many items.
pub type Task = Arc<dyn Fn(&[i64]) -> i64 + Send + Sync>;

/// One unit of work submitted to a [`WorkerPool`](crate::WorkerPool).
///
/// Created together with its [`ResultSlot`]. The worker that dequeues the
/// item consumes it, writes the outcome into the slot exactly once and drops
/// it. If the item is dropped without being processed, the slot resolves to
/// [`Error::ChannelError`].
pub struct WorkItem {
    pub(crate) inputs: Vec<i64>,
    pub(crate) task: Task,
    pub(crate) slot: oneshot::Sender<Result<i64>>,
}

impl WorkItem {
    /// Builds an item from a closure and returns it with its result slot.
    pub fn new<F>(inputs: Vec<i64>, task: F) -> (Self, ResultSlot)
    where
        F: Fn(&[i64]) -> i64 + Send + Sync + 'static,
    {
        Self::with_task(inputs, Arc::new(task))
    }

    /// Builds an item from an already shared [`Task`].
    pub fn with_task(inputs: Vec<i64>, task: Task) -> (Self, ResultSlot) {
        let (slot, rx) = oneshot::channel();
        let item = Self {
            inputs,
            task,
            slot,
        };
        (item, ResultSlot { rx })
    }

    pub fn inputs(&self) -> &[i64] {
        &self.inputs
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("inputs", &self.inputs)
            .field("slot_closed", &self.slot.is_closed())
            .finish_non_exhaustive()
    }
}

/// The submitter's end of a [`WorkItem`]'s single-use result channel.
#[derive(Debug)]
pub struct ResultSlot {
    rx: oneshot::Receiver<Result<i64>>,
}

impl ResultSlot {
    /// Waits for the worker to publish the item's outcome.
    ///
    /// # Errors
    ///
    /// - [`Error::WorkerPanic`] if the task panicked.
    /// - [`Error::ChannelError`] if the item was dropped before a worker ran
    ///   it, e.g. because its submission was rejected.
    pub async fn wait(self) -> Result<i64> {
        self.rx
            .await
            .map_err(|_| Error::channel("result slot dropped before completion"))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn slot_receives_written_value() {
        let (item, slot) = WorkItem::new(vec![1, 2, 3], |xs| xs.iter().sum());
        assert_eq!(item.inputs(), &[1, 2, 3]);

        let value = (item.task)(&item.inputs);
        item.slot.send(Ok(value)).unwrap();

        assert_eq!(slot.wait().await, Ok(6));
    }

    #[tokio::test]
    async fn dropped_item_closes_slot() {
        let (item, slot) = WorkItem::new(vec![7], |xs| xs[0]);
        drop(item);

        let err = slot.wait().await.unwrap_err();
        assert!(matches!(err, Error::ChannelError { .. }));
    }

    #[test]
    fn shared_task_backs_many_items() {
        let task: Task = Arc::new(|xs: &[i64]| -> i64 { xs.iter().product() });
        let (a, _) = WorkItem::with_task(vec![2, 3], Arc::clone(&task));
        let (b, _) = WorkItem::with_task(vec![4, 5], Arc::clone(&task));

        assert_eq!((a.task)(&a.inputs), 6);
        assert_eq!((b.task)(&b.inputs), 20);
        assert_eq!(Arc::strong_count(&task), 3);
    }
}
