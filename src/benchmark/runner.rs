//! Execution strategies and their runners
//!
//! Each runner executes one unit of work `num_tasks` times, passing task ids
//! `0..num_tasks`, and returns once every task has finished. The measured
//! duration brackets the whole batch: from before the first launch to after
//! the last completion.

use std::io;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{error, warn};

use super::counters::TaskCounters;
use super::process::WorkerLauncher;
use crate::metrics::timing::timed;
use crate::utils::{Result, WorkerError};
use crate::workload::{TaskId, TaskReport, UnitOfWork};

/// How the tasks of a run are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// One after another in the calling thread
    Sequential,
    /// One OS thread per task
    Threads,
    /// One OS process per task
    Processes,
}

impl Strategy {
    /// All strategies in the order they run by default
    pub const ALL: [Strategy; 3] = [Strategy::Sequential, Strategy::Threads, Strategy::Processes];

    /// Parse strategy from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sequential" | "seq" => Some(Self::Sequential),
            "threads" | "thread" | "threading" | "multithreading" => Some(Self::Threads),
            "processes" | "process" | "processing" | "multiprocessing" => Some(Self::Processes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Threads => "threads",
            Self::Processes => "processes",
        }
    }

    /// Noun for one execution unit of this strategy
    pub fn unit_label(&self) -> &'static str {
        match self {
            Self::Sequential => "tasks",
            Self::Threads => "threads",
            Self::Processes => "processes",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one runner invocation
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub strategy: Strategy,
    /// Name of the unit of work
    pub task_name: String,
    /// Task count of the run
    pub tasks: usize,
    /// Wall time of the whole batch
    pub duration: Duration,
    /// Reports of the tasks that finished, ordered by task id
    pub reports: Vec<TaskReport>,
    /// Execution units that died without a report
    pub failures: u64,
}

/// Run the tasks one after another in the calling thread
///
/// A panic inside a task unwinds out of this function.
pub fn run_sequentially<W: UnitOfWork + ?Sized>(
    work: &W,
    num_tasks: usize,
    counters: &TaskCounters,
) -> RunOutcome {
    let label = format!("{} {}", work.name(), Strategy::Sequential);
    let (reports, duration) = timed(&label, || {
        (0..num_tasks)
            .map(|task_id| {
                counters.record_started();
                let report = work.run(task_id);
                counters.record_finished();
                report
            })
            .collect::<Vec<_>>()
    });

    RunOutcome {
        strategy: Strategy::Sequential,
        task_name: work.name().to_string(),
        tasks: num_tasks,
        duration,
        reports,
        failures: 0,
    }
}

/// Run every task on its own OS thread and join them all
///
/// A panicking task does not stop the others. Once every thread is joined,
/// the first panicked task is returned as a worker error. If a thread fails
/// to spawn, no further tasks are launched, the running ones are joined, and
/// the spawn failure is returned.
pub fn run_with_threads<W: UnitOfWork + ?Sized>(
    work: &W,
    num_tasks: usize,
    counters: &TaskCounters,
) -> Result<RunOutcome> {
    run_threads_gated(work, num_tasks, counters, |_| Ok(()))
}

/// Thread runner with a gate consulted before each spawn
///
/// A gate error stands in for the spawn failing, so the failure path runs
/// the same code as a real `Builder::spawn_scoped` error.
fn run_threads_gated<W, G>(
    work: &W,
    num_tasks: usize,
    counters: &TaskCounters,
    gate: G,
) -> Result<RunOutcome>
where
    W: UnitOfWork + ?Sized,
    G: Fn(TaskId) -> io::Result<()>,
{
    let reports: Mutex<Vec<TaskReport>> = Mutex::new(Vec::with_capacity(num_tasks));
    let label = format!("{} {}", work.name(), Strategy::Threads);

    let ((spawn_error, first_panic), duration) = timed(&label, || {
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(num_tasks);
            let mut spawn_error = None;

            for task_id in 0..num_tasks {
                let reports = &reports;
                let spawned = gate(task_id).and_then(|()| {
                    thread::Builder::new()
                        .name(format!("task-worker-{}", task_id))
                        .spawn_scoped(scope, move || {
                            let report = work.run(task_id);
                            reports.lock().push(report);
                            counters.record_finished();
                        })
                });
                match spawned {
                    Ok(handle) => {
                        counters.record_started();
                        handles.push((task_id, handle));
                    }
                    Err(source) => {
                        spawn_error = Some(WorkerError::ThreadSpawn { task_id, source });
                        break;
                    }
                }
            }

            // join explicitly so a panicked thread never reaches the scope's own join
            let mut first_panic = None;
            for (task_id, handle) in handles {
                if handle.join().is_err() {
                    error!("Task {} panicked", task_id);
                    counters.record_failed();
                    first_panic.get_or_insert(task_id);
                }
            }
            (spawn_error, first_panic)
        })
    });

    if let Some(e) = spawn_error {
        return Err(e.into());
    }
    if let Some(task_id) = first_panic {
        return Err(WorkerError::Panicked(task_id).into());
    }

    let mut reports = reports.into_inner();
    reports.sort_by_key(|r| r.task_id);

    Ok(RunOutcome {
        strategy: Strategy::Threads,
        task_name: work.name().to_string(),
        tasks: num_tasks,
        duration,
        reports,
        failures: 0,
    })
}

/// Run every task in its own worker process and wait for all of them
///
/// All children are spawned before any is waited on. A child that exits
/// unsuccessfully or prints no report is counted as a failure and the run
/// goes on; failing to spawn a child aborts the run once the children
/// already spawned have been reaped.
pub fn run_with_processes<W: UnitOfWork + ?Sized>(
    work: &W,
    num_tasks: usize,
    launcher: &WorkerLauncher,
    counters: &TaskCounters,
) -> Result<RunOutcome> {
    let label = format!("{} {}", work.name(), Strategy::Processes);

    let ((reports, failures, spawn_error), duration) = timed(&label, || {
        let mut children = Vec::with_capacity(num_tasks);
        let mut spawn_error = None;

        for task_id in 0..num_tasks {
            match launcher.spawn(work, task_id) {
                Ok(child) => {
                    counters.record_started();
                    children.push((task_id, child));
                }
                Err(e) => {
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        let mut reports = Vec::with_capacity(children.len());
        let mut failures = 0u64;
        for (task_id, child) in children {
            match WorkerLauncher::collect_report(task_id, child) {
                Ok(report) => {
                    counters.record_finished();
                    reports.push(report);
                }
                Err(e) => {
                    warn!("{}", e);
                    counters.record_failed();
                    failures += 1;
                }
            }
        }
        (reports, failures, spawn_error)
    });

    if let Some(e) = spawn_error {
        return Err(e.into());
    }

    Ok(RunOutcome {
        strategy: Strategy::Processes,
        task_name: work.name().to_string(),
        tasks: num_tasks,
        duration,
        reports,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::{TaskDetail, TaskKind};
    use std::time::Instant;

    /// Sleeps for a fixed wait per task id
    struct FixedWaits {
        waits: Vec<Duration>,
    }

    impl FixedWaits {
        fn millis(waits: &[u64]) -> Self {
            Self {
                waits: waits.iter().map(|ms| Duration::from_millis(*ms)).collect(),
            }
        }
    }

    impl UnitOfWork for FixedWaits {
        fn name(&self) -> &str {
            "fixed_waits"
        }

        fn run(&self, task_id: TaskId) -> TaskReport {
            let start = Instant::now();
            let wait = self.waits[task_id];
            thread::sleep(wait);
            TaskReport::new(
                task_id,
                TaskKind::Io,
                start.elapsed(),
                TaskDetail::Waited {
                    wait_us: wait.as_micros() as u64,
                },
            )
        }

        fn worker_args(&self, _task_id: TaskId) -> Vec<String> {
            Vec::new()
        }
    }

    /// Panics on one task id
    struct PanicsOn(TaskId);

    impl UnitOfWork for PanicsOn {
        fn name(&self) -> &str {
            "panics_on"
        }

        fn run(&self, task_id: TaskId) -> TaskReport {
            if task_id == self.0 {
                panic!("task {} blew up", task_id);
            }
            TaskReport::new(
                task_id,
                TaskKind::Cpu,
                Duration::ZERO,
                TaskDetail::Computed { iterations: 0 },
            )
        }

        fn worker_args(&self, _task_id: TaskId) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn test_parse_strategies() {
        assert_eq!(Strategy::parse("sequential"), Some(Strategy::Sequential));
        assert_eq!(Strategy::parse("Threads"), Some(Strategy::Threads));
        assert_eq!(Strategy::parse("multiprocessing"), Some(Strategy::Processes));
        assert_eq!(Strategy::parse("fibers"), None);
        for strategy in Strategy::ALL {
            assert_eq!(Strategy::parse(strategy.as_str()), Some(strategy));
        }
    }

    #[test]
    fn test_sequential_duration_is_sum_of_waits() {
        // scaled-down version of waits [0.6, 0.7, 0.5, 0.9] s
        let work = FixedWaits::millis(&[60, 70, 50, 90]);
        let counters = TaskCounters::with_tasks(4);

        let outcome = run_sequentially(&work, 4, &counters);

        assert_eq!(outcome.strategy, Strategy::Sequential);
        assert_eq!(outcome.reports.len(), 4);
        assert!(outcome.duration >= Duration::from_millis(270));
        assert!(outcome.duration < Duration::from_millis(270 + 200));
        assert!(counters.is_complete());
    }

    #[test]
    fn test_sequential_runs_in_order() {
        let work = FixedWaits::millis(&[1, 1, 1]);
        let outcome = run_sequentially(&work, 3, &TaskCounters::with_tasks(3));
        let ids: Vec<TaskId> = outcome.reports.iter().map(|r| r.task_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_threads_duration_is_max_wait() {
        let work = FixedWaits::millis(&[60, 70, 50, 90]);
        let counters = TaskCounters::with_tasks(4);

        let outcome = run_with_threads(&work, 4, &counters).unwrap();

        assert_eq!(outcome.strategy, Strategy::Threads);
        assert!(outcome.duration >= Duration::from_millis(90));
        // well below the 270ms sum
        assert!(outcome.duration < Duration::from_millis(220));
        let ids: Vec<TaskId> = outcome.reports.iter().map(|r| r.task_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(counters.progress(), (4, 4));
    }

    #[test]
    fn test_zero_tasks() {
        let work = FixedWaits::millis(&[]);
        let counters = TaskCounters::with_tasks(0);
        assert!(run_sequentially(&work, 0, &counters).reports.is_empty());
        assert!(run_with_threads(&work, 0, &counters).unwrap().reports.is_empty());
    }

    #[test]
    fn test_thread_panic_surfaces_after_join() {
        let counters = TaskCounters::with_tasks(3);
        let err = run_with_threads(&PanicsOn(1), 3, &counters).unwrap_err();

        assert!(matches!(
            err,
            crate::utils::BenchmarkError::Worker(WorkerError::Panicked(1))
        ));
        // the other tasks still ran to completion
        assert_eq!(counters.failures(), 1);
        assert!(counters.is_complete());
    }

    #[test]
    fn test_spawn_failure_joins_running_threads() {
        let counters = TaskCounters::with_tasks(4);
        let gate = |task_id: TaskId| {
            if task_id == 2 {
                Err(io::Error::new(io::ErrorKind::WouldBlock, "thread limit reached"))
            } else {
                Ok(())
            }
        };

        // task 0 panics before the spawn of task 2 fails
        let err = run_threads_gated(&PanicsOn(0), 4, &counters, gate).unwrap_err();

        assert!(matches!(
            err,
            crate::utils::BenchmarkError::Worker(WorkerError::ThreadSpawn { task_id: 2, .. })
        ));
        // both launched threads were joined, the panicked one included
        assert_eq!(counters.progress(), (2, 2));
        assert_eq!(counters.failures(), 1);
    }

    #[test]
    #[should_panic(expected = "task 0 blew up")]
    fn test_sequential_panic_propagates() {
        run_sequentially(&PanicsOn(0), 2, &TaskCounters::with_tasks(2));
    }
}
