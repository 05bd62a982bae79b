use portable_atomic::{AtomicU64, Ordering};

/// Lock-free counters shared by the pool handle and its workers.
///
/// `submitted` counts items accepted into the queue. Every accepted item is
/// eventually counted exactly once as either `completed` or `failed`.
#[derive(Debug, Default)]
pub struct PoolStats {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// A point-in-time copy of [`PoolStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub submitted: u64,
    pub completed: u64,
    pub failed: u64,
}

impl StatsSnapshot {
    /// Items accepted into the queue that have not produced a result yet.
    pub const fn in_flight(&self) -> u64 {
        self.submitted
            .saturating_sub(self.completed)
            .saturating_sub(self.failed)
    }
}

impl PoolStats {
    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    // Undo for a submission that never made it into the queue.
    pub(crate) fn record_rejected(&self) {
        self.submitted.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_tracks_outstanding_items() {
        let stats = PoolStats::default();
        for _ in 0..5 {
            stats.record_submitted();
        }
        stats.record_completed();
        stats.record_completed();
        stats.record_failed();

        let snap = stats.snapshot();
        assert_eq!(snap.submitted, 5);
        assert_eq!(snap.completed, 2);
        assert_eq!(snap.failed, 1);
        assert_eq!(snap.in_flight(), 2);
    }

    #[test]
    fn rejected_submission_is_not_counted() {
        let stats = PoolStats::default();
        stats.record_submitted();
        stats.record_rejected();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn in_flight_never_underflows() {
        let stats = PoolStats::default();
        stats.record_completed();
        assert_eq!(stats.snapshot().in_flight(), 0);
    }
}
