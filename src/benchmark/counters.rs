//! Atomic task counters shared by the units of one run
//!
//! These are the only state the execution units of a run share. The
//! progress reporter reads them; the runners write them.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Counters shared between the runner, its execution units and the progress reporter
pub struct TaskCounters {
    /// Tasks launched (called, spawned as thread, or spawned as process)
    pub tasks_started: AtomicU64,

    /// Tasks that finished, successfully or not
    pub tasks_finished: AtomicU64,

    /// Tasks whose execution unit failed
    pub tasks_failed: AtomicU64,

    /// Shutdown signal for the progress reporter
    pub shutdown: AtomicBool,

    /// Task count of the run
    total_tasks: u64,
}

impl TaskCounters {
    /// Create counters for a run of `total` tasks
    pub fn with_tasks(total: u64) -> Self {
        Self {
            tasks_started: AtomicU64::new(0),
            tasks_finished: AtomicU64::new(0),
            tasks_failed: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
            total_tasks: total,
        }
    }

    /// Task count of the run
    pub fn total(&self) -> u64 {
        self.total_tasks
    }

    #[inline]
    pub fn record_started(&self) {
        self.tasks_started.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_finished(&self) {
        self.tasks_finished.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed task; it also counts as finished
    #[inline]
    pub fn record_failed(&self) {
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
        self.tasks_finished.fetch_add(1, Ordering::Relaxed);
    }

    /// Check if every task of the run has finished
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.tasks_finished.load(Ordering::Relaxed) >= self.total_tasks
    }

    /// Signal shutdown to the progress reporter
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Check if shutdown has been signaled
    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Get current progress as (finished, started)
    pub fn progress(&self) -> (u64, u64) {
        (
            self.tasks_finished.load(Ordering::Relaxed),
            self.tasks_started.load(Ordering::Relaxed),
        )
    }

    /// Get failure count
    pub fn failures(&self) -> u64 {
        self.tasks_failed.load(Ordering::Relaxed)
    }
}
