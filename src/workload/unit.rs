//! Units of work handed to the runners
//!
//! A runner only needs two things from a unit of work: run it for a task id
//! in the current execution unit, and describe it as command-line arguments
//! so a worker process can run the same thing.

use super::task::{TaskId, TaskParams, TaskReport};
use super::tasks::{cpu_bound_task, io_bound_task};
use super::TaskKind;

/// A unit of work the runners can execute
pub trait UnitOfWork: Send + Sync {
    /// Name for run headers and reports
    fn name(&self) -> &str;

    /// Run one invocation in the calling thread
    fn run(&self, task_id: TaskId) -> TaskReport;

    /// Arguments that make a worker process run this task and print its report
    fn worker_args(&self, task_id: TaskId) -> Vec<String>;
}

/// One of the built-in task simulators with its parameters
#[derive(Debug, Clone)]
pub struct Workload {
    kind: TaskKind,
    params: TaskParams,
    seed: u64,
    /// Task start/finish lines at info (true) or debug (false)
    loud: bool,
}

impl Workload {
    pub fn new(kind: TaskKind, params: TaskParams, seed: u64) -> Self {
        Self {
            kind,
            params,
            seed,
            loud: true,
        }
    }

    /// Demote per-task log lines to debug (used while a progress bar is drawn)
    pub fn with_quiet_tasks(mut self, quiet: bool) -> Self {
        self.loud = !quiet;
        self
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl UnitOfWork for Workload {
    fn name(&self) -> &str {
        self.kind.task_name()
    }

    fn run(&self, task_id: TaskId) -> TaskReport {
        match self.kind {
            TaskKind::Io => io_bound_task(task_id, &self.params, self.seed, self.loud),
            TaskKind::Cpu => cpu_bound_task(task_id, &self.params, self.loud),
        }
    }

    fn worker_args(&self, task_id: TaskId) -> Vec<String> {
        let mut args = vec![
            "--worker".to_string(),
            task_id.to_string(),
            "--tests".to_string(),
            self.kind.as_str().to_string(),
            "--seed".to_string(),
            self.seed.to_string(),
            "--io-min-ms".to_string(),
            self.params.io_min.as_millis().to_string(),
            "--io-max-ms".to_string(),
            self.params.io_max.as_millis().to_string(),
            "--cpu-budget-ms".to_string(),
            self.params.cpu_budget.as_millis().to_string(),
        ];
        if !self.loud {
            args.push("--progress".to_string());
        }
        args
    }
}
