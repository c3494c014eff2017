//! Error types for exec-strategy-bench

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

use crate::workload::TaskId;

/// Top-level application error
#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

/// Failures of a single execution unit (thread or child process)
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Failed to spawn thread for task {task_id}: {source}")]
    ThreadSpawn { task_id: TaskId, source: io::Error },

    #[error("Task {0} panicked")]
    Panicked(TaskId),

    #[error("Failed to spawn worker process for task {task_id}: {source}")]
    ProcessSpawn { task_id: TaskId, source: io::Error },

    #[error("Failed to wait for worker process of task {task_id}: {source}")]
    ProcessWait { task_id: TaskId, source: io::Error },

    #[error("Worker process for task {task_id} exited with {status}")]
    ExitStatus { task_id: TaskId, status: ExitStatus },

    #[error("Worker process for task {task_id} sent a malformed report: {reason}")]
    MalformedReport { task_id: TaskId, reason: String },
}

impl WorkerError {
    /// Task the failed execution unit was running
    pub fn task_id(&self) -> TaskId {
        match self {
            Self::ThreadSpawn { task_id, .. }
            | Self::ProcessSpawn { task_id, .. }
            | Self::ProcessWait { task_id, .. }
            | Self::ExitStatus { task_id, .. }
            | Self::MalformedReport { task_id, .. } => *task_id,
            Self::Panicked(task_id) => *task_id,
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchmarkError>;
