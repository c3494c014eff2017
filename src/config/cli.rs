//! Command-line argument parsing
//!
//! Arguments are grouped by category. The hidden `--worker` flag switches the
//! binary into worker mode, which the process-per-task runner relies on.

use clap::Parser;
use std::path::PathBuf;

use crate::workload::TaskId;

/// Default task count when the CPU count cannot be determined
pub const FALLBACK_TASKS: usize = 2;

/// Compare sequential, thread-per-task and process-per-task execution
#[derive(Parser, Debug, Clone)]
#[command(name = "exec-strategy-bench")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    // ===== Run Matrix =====
    /// Tasks per run (0 = number of CPUs)
    #[arg(short = 'n', long = "tasks", default_value_t = 0)]
    pub tasks: usize,

    /// Task kind(s) to run: io, cpu
    #[arg(short = 't', long = "tests", value_delimiter = ',')]
    pub tests: Option<Vec<String>>,

    /// Execution strategies: sequential, threads, processes
    #[arg(short = 's', long = "strategies", value_delimiter = ',')]
    pub strategies: Option<Vec<String>>,

    // ===== Task Parameters =====
    /// Lower bound of the I/O wait in milliseconds
    #[arg(long = "io-min-ms", default_value_t = 500)]
    pub io_min_ms: u64,

    /// Upper bound (exclusive) of the I/O wait in milliseconds
    #[arg(long = "io-max-ms", default_value_t = 1000)]
    pub io_max_ms: u64,

    /// Busy-loop budget of the CPU task in milliseconds
    #[arg(long = "cpu-budget-ms", default_value_t = 500)]
    pub cpu_budget_ms: u64,

    /// Seed for the I/O wait draws (0 = random seed)
    #[arg(long = "seed", default_value_t = 0)]
    pub seed: u64,

    // ===== Output Options =====
    /// Show a progress bar per run (task log lines move to debug)
    #[arg(long = "progress")]
    pub progress: bool,

    /// Write all run results as JSON
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Write all run results as CSV
    #[arg(long = "csv")]
    pub csv_output: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    // ===== Worker Mode =====
    /// Run a single task and print its report (used by the process runner)
    #[arg(long = "worker", hide = true)]
    pub worker_task: Option<TaskId>,
}

/// Task count for a requested count (0 = auto) and the detected CPU count
///
/// An undetected or zero CPU count falls back to [`FALLBACK_TASKS`].
pub fn resolve_tasks(requested: usize, detected: Option<usize>) -> usize {
    if requested != 0 {
        return requested;
    }
    match detected {
        Some(cpus) if cpus > 0 => cpus,
        _ => FALLBACK_TASKS,
    }
}

impl CliArgs {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.io_min_ms >= self.io_max_ms {
            return Err(format!(
                "--io-min-ms ({}) must be below --io-max-ms ({})",
                self.io_min_ms, self.io_max_ms
            ));
        }

        if self.cpu_budget_ms == 0 {
            return Err("--cpu-budget-ms must be at least 1".to_string());
        }

        if matches!(self.tests.as_deref(), Some([])) {
            return Err("--tests needs at least one task kind".to_string());
        }

        if matches!(self.strategies.as_deref(), Some([])) {
            return Err("--strategies needs at least one strategy".to_string());
        }

        if self.worker_task.is_some() && self.tests.as_ref().map_or(true, |t| t.len() != 1) {
            return Err("--worker requires exactly one task kind in --tests".to_string());
        }

        Ok(())
    }

    /// Get effective task count (0 = auto-detect)
    pub fn effective_tasks(&self) -> usize {
        let detected = std::thread::available_parallelism().ok().map(|p| p.get());
        resolve_tasks(self.tasks, detected)
    }

    /// Log level flags to forward to worker processes
    pub fn log_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.quiet {
            flags.push("--quiet".to_string());
        }
        if self.verbose {
            flags.push("--verbose".to_string());
        }
        flags
    }
}
