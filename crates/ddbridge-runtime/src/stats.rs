//! Worker Queue Monitoring
//!
//! Atomic counters describing the worker queue, readable from any thread while
//! producers enqueue and the worker dispatches.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

/// Queue statistics shared between producers and the worker thread
#[derive(Debug)]
pub struct WorkerStats {
    warning_depth: usize,
    enqueued: AtomicU64,
    dispatched: AtomicU64,
    dropped: AtomicU64,
    failed: AtomicU64,
    depth: AtomicUsize,
    high_water_mark: AtomicUsize,
    backlog_warned: AtomicBool,
}

/// Point-in-time copy of [`WorkerStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStatsSnapshot {
    pub enqueued: u64,
    pub dispatched: u64,
    pub dropped: u64,
    pub failed: u64,
    pub depth: usize,
    pub high_water_mark: usize,
}

impl WorkerStats {
    pub fn new(warning_depth: usize) -> Self {
        Self {
            warning_depth,
            enqueued: AtomicU64::new(0),
            dispatched: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            depth: AtomicUsize::new(0),
            high_water_mark: AtomicUsize::new(0),
            backlog_warned: AtomicBool::new(false),
        }
    }

    /// Record an accepted message, returning the new queue depth
    pub fn record_enqueued(&self) -> usize {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
        let depth = self.depth.fetch_add(1, Ordering::AcqRel) + 1;
        self.high_water_mark.fetch_max(depth, Ordering::Relaxed);
        depth
    }

    /// Undo [`record_enqueued`](Self::record_enqueued) for a message the channel refused
    pub fn record_rejected(&self) {
        self.enqueued.fetch_sub(1, Ordering::Relaxed);
        self.depth.fetch_sub(1, Ordering::AcqRel);
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a message leaving the queue, returning the remaining depth
    pub fn record_dequeued(&self) -> usize {
        self.depth.fetch_sub(1, Ordering::AcqRel).saturating_sub(1)
    }

    pub fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// True exactly once: the first time `depth` reaches the warning threshold
    pub fn should_warn_backlog(&self, depth: usize) -> bool {
        self.warning_depth > 0
            && depth >= self.warning_depth
            && !self.backlog_warned.swap(true, Ordering::AcqRel)
    }

    pub fn warning_depth(&self) -> usize {
        self.warning_depth
    }

    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> WorkerStatsSnapshot {
        WorkerStatsSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            depth: self.depth.load(Ordering::Acquire),
            high_water_mark: self.high_water_mark.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_and_high_water_mark() {
        let stats = WorkerStats::new(100);
        assert_eq!(stats.record_enqueued(), 1);
        assert_eq!(stats.record_enqueued(), 2);
        assert_eq!(stats.record_dequeued(), 1);
        stats.record_dispatched();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.enqueued, 2);
        assert_eq!(snapshot.dispatched, 1);
        assert_eq!(snapshot.depth, 1);
        assert_eq!(snapshot.high_water_mark, 2);
    }

    #[test]
    fn test_backlog_warning_fires_once() {
        let stats = WorkerStats::new(2);
        assert!(!stats.should_warn_backlog(1));
        assert!(stats.should_warn_backlog(2));
        assert!(!stats.should_warn_backlog(3));
    }

    #[test]
    fn test_zero_warning_depth_disables_warning() {
        let stats = WorkerStats::new(0);
        assert!(!stats.should_warn_backlog(10_000));
    }

    #[test]
    fn test_rejected_message_counts_as_dropped() {
        let stats = WorkerStats::new(10);
        stats.record_enqueued();
        stats.record_rejected();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.enqueued, 0);
        assert_eq!(snapshot.depth, 0);
        assert_eq!(snapshot.dropped, 1);
    }
}
