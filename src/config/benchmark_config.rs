//! Benchmark configuration derived from CLI arguments

use std::path::PathBuf;
use std::time::Duration;

use super::cli::CliArgs;
use crate::benchmark::Strategy;
use crate::workload::{TaskId, TaskKind, TaskParams};

/// Complete benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    // Run matrix
    pub tasks: usize,
    pub tests: Vec<TaskKind>,
    pub strategies: Vec<Strategy>,

    // Task parameters
    pub params: TaskParams,
    /// Run seed as given (0 = pick one at startup)
    pub seed: u64,

    // Output
    pub progress: bool,
    pub output_path: Option<PathBuf>,
    pub csv_output: Option<PathBuf>,
    pub quiet: bool,
    /// Log flags forwarded to worker processes
    pub worker_log_flags: Vec<String>,

    // Worker mode
    pub worker_task: Option<TaskId>,
}

impl BenchmarkConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        // Validate first
        args.validate()?;

        let tests = match args.tests {
            Some(ref names) => names
                .iter()
                .map(|n| TaskKind::parse(n).ok_or_else(|| format!("Unknown test: {}", n)))
                .collect::<Result<Vec<_>, _>>()?,
            None => TaskKind::ALL.to_vec(),
        };

        let strategies = match args.strategies {
            Some(ref names) => names
                .iter()
                .map(|n| Strategy::parse(n).ok_or_else(|| format!("Unknown strategy: {}", n)))
                .collect::<Result<Vec<_>, _>>()?,
            None => Strategy::ALL.to_vec(),
        };

        let params = TaskParams {
            io_min: Duration::from_millis(args.io_min_ms),
            io_max: Duration::from_millis(args.io_max_ms),
            cpu_budget: Duration::from_millis(args.cpu_budget_ms),
        };

        Ok(Self {
            tasks: args.effective_tasks(),
            tests,
            strategies,

            params,
            seed: args.seed,

            progress: args.progress,
            output_path: args.output.clone(),
            csv_output: args.csv_output.clone(),
            quiet: args.quiet,
            worker_log_flags: args.log_flags(),

            worker_task: args.worker_task,
        })
    }

    /// Run seed to use: the configured one, or a fresh random one for seed 0
    pub fn resolve_seed(&self) -> u64 {
        if self.seed == 0 {
            // 0 is reserved for "random", never hand it out
            fastrand::u64(1..)
        } else {
            self.seed
        }
    }

    /// One-line description of the configuration for exports
    pub fn summary(&self, seed: u64) -> String {
        format!(
            "tasks={}, tests={:?}, strategies={:?}, io={}..{}ms, cpu={}ms, seed={}",
            self.tasks,
            self.tests.iter().map(|t| t.as_str()).collect::<Vec<_>>(),
            self.strategies.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            self.params.io_min.as_millis(),
            self.params.io_max.as_millis(),
            self.params.cpu_budget.as_millis(),
            seed
        )
    }
}
