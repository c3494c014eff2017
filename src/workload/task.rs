//! Task identifiers, parameters and reports
//!
//! A task report is what one invocation of a unit of work produced. Worker
//! processes hand it to the parent as a single JSON line on stdout, so the
//! same type serves the in-process runners and the process-per-task runner.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::TaskKind;
use crate::utils::Result;

/// Loop index of a task within one run
pub type TaskId = usize;

/// Default lower bound of the I/O wait
pub const DEFAULT_IO_MIN: Duration = Duration::from_millis(500);
/// Default upper bound (exclusive) of the I/O wait
pub const DEFAULT_IO_MAX: Duration = Duration::from_millis(1000);
/// Default busy-loop budget of the CPU task
pub const DEFAULT_CPU_BUDGET: Duration = Duration::from_millis(500);

/// Tunables of the two task simulators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskParams {
    /// Lower bound of the I/O wait (inclusive)
    pub io_min: Duration,
    /// Upper bound of the I/O wait (exclusive)
    pub io_max: Duration,
    /// Wall-clock budget of the CPU busy-loop
    pub cpu_budget: Duration,
}

impl Default for TaskParams {
    fn default() -> Self {
        Self {
            io_min: DEFAULT_IO_MIN,
            io_max: DEFAULT_IO_MAX,
            cpu_budget: DEFAULT_CPU_BUDGET,
        }
    }
}

impl TaskParams {
    /// Draw an I/O wait uniformly from `[io_min, io_max)`
    pub fn io_wait(&self, rng: &mut fastrand::Rng) -> Duration {
        let span = self.io_max.saturating_sub(self.io_min);
        if span.is_zero() {
            return self.io_min;
        }
        let wait = self.io_min + span.mul_f64(rng.f64());
        // mul_f64 rounds to whole nanoseconds
        if wait >= self.io_max {
            self.io_max - Duration::from_nanos(1)
        } else {
            wait
        }
    }
}

/// Per-task RNG derived from the run seed
///
/// The same (seed, id) pair yields the same stream in every strategy and in
/// worker processes.
pub fn task_rng(seed: u64, task_id: TaskId) -> fastrand::Rng {
    let mixed = seed ^ (task_id as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    fastrand::Rng::with_seed(mixed)
}

/// What a task did besides taking time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskDetail {
    /// Slept for the drawn wait
    Waited { wait_us: u64 },
    /// Spun the counter this many times
    Computed { iterations: u64 },
}

/// Result of one task invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReport {
    pub task_id: TaskId,
    pub kind: TaskKind,
    /// Measured wall time of the invocation in microseconds
    pub elapsed_us: u64,
    pub detail: TaskDetail,
}

impl TaskReport {
    pub fn new(task_id: TaskId, kind: TaskKind, elapsed: Duration, detail: TaskDetail) -> Self {
        Self {
            task_id,
            kind,
            elapsed_us: elapsed.as_micros() as u64,
            detail,
        }
    }

    /// Measured wall time of the invocation
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_us)
    }

    /// Encode as the single line a worker process prints
    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode the line printed by a worker process
    pub fn from_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = TaskParams::default();
        assert_eq!(params.io_min, Duration::from_millis(500));
        assert_eq!(params.io_max, Duration::from_secs(1));
        assert_eq!(params.cpu_budget, Duration::from_millis(500));
    }

    #[test]
    fn test_io_wait_within_half_open_range() {
        let params = TaskParams::default();
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..10_000 {
            let wait = params.io_wait(&mut rng);
            assert!(wait >= params.io_min, "{:?} below range", wait);
            assert!(wait < params.io_max, "{:?} not below upper bound", wait);
        }
    }

    #[test]
    fn test_io_wait_degenerate_range() {
        let params = TaskParams {
            io_min: Duration::from_millis(5),
            io_max: Duration::from_millis(5),
            ..TaskParams::default()
        };
        let mut rng = fastrand::Rng::with_seed(1);
        assert_eq!(params.io_wait(&mut rng), Duration::from_millis(5));
    }

    #[test]
    fn test_task_rng_is_deterministic_per_task() {
        let params = TaskParams::default();
        let a = params.io_wait(&mut task_rng(99, 3));
        let b = params.io_wait(&mut task_rng(99, 3));
        assert_eq!(a, b);

        let waits: Vec<Duration> = (0..8).map(|id| params.io_wait(&mut task_rng(99, id))).collect();
        assert!(waits.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_report_line_parses_back() {
        let report = TaskReport::new(
            2,
            TaskKind::Io,
            Duration::from_millis(612),
            TaskDetail::Waited { wait_us: 610_000 },
        );
        let line = report.to_line().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("\"kind\":\"io\""));
        assert_eq!(TaskReport::from_line(&format!("{}\n", line)).unwrap(), report);
    }

    #[test]
    fn test_report_rejects_garbage() {
        assert!(TaskReport::from_line("task finished").is_err());
    }
}
