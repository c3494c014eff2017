//! Worker process launcher
//!
//! The process-per-task runner re-executes a binary in worker mode. The
//! child runs one task, logs to stderr (inherited, so its lines show up on
//! the console) and prints its task report as one JSON line on stdout.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use crate::utils::{Result, WorkerError};
use crate::workload::{TaskId, TaskReport, UnitOfWork};

/// Spawns worker processes and reads their reports
#[derive(Debug, Clone)]
pub struct WorkerLauncher {
    program: PathBuf,
    /// Extra arguments appended to every worker command line (log level flags)
    extra_args: Vec<String>,
}

impl WorkerLauncher {
    /// Launcher for an arbitrary program
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Launcher that re-executes the running binary
    pub fn current_exe() -> Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }

    /// Append arguments to every worker command line
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Build the command line for one task
    pub fn command<W: UnitOfWork + ?Sized>(&self, work: &W, task_id: TaskId) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(work.worker_args(task_id))
            .args(&self.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        command
    }

    /// Spawn the worker process for one task
    pub fn spawn<W: UnitOfWork + ?Sized>(
        &self,
        work: &W,
        task_id: TaskId,
    ) -> std::result::Result<Child, WorkerError> {
        self.command(work, task_id)
            .spawn()
            .map_err(|source| WorkerError::ProcessSpawn { task_id, source })
    }

    /// Wait for a worker process and parse the report it printed
    pub fn collect_report(task_id: TaskId, child: Child) -> std::result::Result<TaskReport, WorkerError> {
        let output = child
            .wait_with_output()
            .map_err(|source| WorkerError::ProcessWait { task_id, source })?;

        if !output.status.success() {
            return Err(WorkerError::ExitStatus {
                task_id,
                status: output.status,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .ok_or_else(|| WorkerError::MalformedReport {
                task_id,
                reason: "no report on stdout".to_string(),
            })?;

        let report = TaskReport::from_line(line).map_err(|e| WorkerError::MalformedReport {
            task_id,
            reason: e.to_string(),
        })?;

        if report.task_id != task_id {
            return Err(WorkerError::MalformedReport {
                task_id,
                reason: format!("report belongs to task {}", report.task_id),
            });
        }

        Ok(report)
    }
}
