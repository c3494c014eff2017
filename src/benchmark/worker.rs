//! Worker mode: the child side of the process-per-task runner
//!
//! A worker runs exactly one task of one kind and prints the task report as
//! a single JSON line on stdout. Everything else it says goes through the
//! logger, which worker mode points at stderr.

use std::io::Write;

use tracing::debug;

use crate::config::BenchmarkConfig;
use crate::utils::{BenchmarkError, Result};
use crate::workload::{TaskId, TaskReport, UnitOfWork, Workload};

/// Build the workload a worker process was asked to run
pub fn worker_workload(config: &BenchmarkConfig) -> Result<Workload> {
    let kind = match config.tests.as_slice() {
        [kind] => *kind,
        _ => {
            return Err(BenchmarkError::Config(
                "worker mode runs exactly one task kind".to_string(),
            ))
        }
    };
    Ok(Workload::new(kind, config.params, config.seed).with_quiet_tasks(config.progress))
}

/// Run one task and write its report line to `out`
pub fn run_worker<W: Write>(config: &BenchmarkConfig, task_id: TaskId, out: &mut W) -> Result<TaskReport> {
    let workload = worker_workload(config)?;
    debug!(
        "worker {} running {} (seed {})",
        std::process::id(),
        workload.name(),
        workload.seed()
    );

    let report = workload.run(task_id);
    writeln!(out, "{}", report.to_line()?)?;
    out.flush()?;
    Ok(report)
}
