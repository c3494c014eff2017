//! Benchmark orchestrator
//!
//! Runs the configured matrix of task kinds and strategies in fixed order,
//! prints each run as it completes, and the comparison per task kind.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::counters::TaskCounters;
use super::process::WorkerLauncher;
use super::runner::{run_sequentially, run_with_processes, run_with_threads, RunOutcome, Strategy};
use crate::config::BenchmarkConfig;
use crate::metrics::{
    print_kind_summary, print_run_header, print_run_result, summarize, BenchmarkResults, RunSummary,
};
use crate::utils::Result;
use crate::workload::{TaskKind, UnitOfWork, Workload};

/// Summaries of every run of one task kind
pub struct KindResults {
    pub kind: TaskKind,
    pub runs: Vec<RunSummary>,
}

/// Benchmark orchestrator
pub struct Orchestrator {
    config: Arc<BenchmarkConfig>,
    launcher: WorkerLauncher,
    /// Run seed shared by every strategy and worker process
    seed: u64,
}

impl Orchestrator {
    /// Create new orchestrator that launches workers from the running binary
    pub fn new(config: BenchmarkConfig) -> Result<Self> {
        let launcher = WorkerLauncher::current_exe()?;
        Ok(Self::with_launcher(config, launcher))
    }

    /// Create orchestrator with an explicit worker launcher
    pub fn with_launcher(config: BenchmarkConfig, launcher: WorkerLauncher) -> Self {
        let seed = config.resolve_seed();
        let launcher = launcher.with_extra_args(config.worker_log_flags.clone());
        Self {
            config: Arc::new(config),
            launcher,
            seed,
        }
    }

    /// Run seed in use
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Workload for a task kind with this run's parameters
    pub fn workload(&self, kind: TaskKind) -> Workload {
        Workload::new(kind, self.config.params, self.seed).with_quiet_tasks(self.config.progress)
    }

    /// Progress bar for one run; finishes when the run's counters complete or shut down
    fn report_progress(counters: &TaskCounters, label: &str) {
        let pb = ProgressBar::new(counters.total());
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(label.to_string());

        while !counters.is_shutdown() {
            let (finished, _) = counters.progress();
            pb.set_position(finished);
            if counters.is_complete() {
                break;
            }
            thread::sleep(Duration::from_millis(50));
        }

        let (finished, _) = counters.progress();
        pb.set_position(finished);
        pb.finish_with_message(format!("{} done", label));
    }

    /// Run one strategy for one task kind
    pub fn run_strategy(&self, workload: &Workload, strategy: Strategy) -> Result<RunOutcome> {
        let tasks = self.config.tasks;
        let counters = Arc::new(TaskCounters::with_tasks(tasks as u64));

        let progress = self.config.progress.then(|| {
            let counters = Arc::clone(&counters);
            let label = format!("{} {}", workload.name(), strategy);
            thread::spawn(move || Self::report_progress(&counters, &label))
        });

        let outcome = match strategy {
            Strategy::Sequential => Ok(run_sequentially(workload, tasks, &counters)),
            Strategy::Threads => run_with_threads(workload, tasks, &counters),
            Strategy::Processes => run_with_processes(workload, tasks, &self.launcher, &counters),
        };

        counters.signal_shutdown();
        if let Some(handle) = progress {
            handle.join().ok();
        }
        outcome
    }

    /// Run every configured strategy for one task kind
    pub fn run_kind(&self, kind: TaskKind) -> Result<KindResults> {
        let workload = self.workload(kind);
        let mut outcomes = Vec::with_capacity(self.config.strategies.len());

        for &strategy in &self.config.strategies {
            print_run_header(workload.name(), strategy, self.config.tasks);
            let outcome = self.run_strategy(&workload, strategy)?;
            print_run_result(&RunSummary::from_outcome(&outcome));
            outcomes.push(outcome);
        }

        let runs = summarize(&outcomes);
        print_kind_summary(kind, &runs);
        Ok(KindResults { kind, runs })
    }

    /// Run all configured task kinds in order
    pub fn run_all(&self) -> Result<Vec<KindResults>> {
        info!(
            "CPU count: {}, tasks per run: {}, seed: {}",
            thread::available_parallelism().map(|p| p.get()).unwrap_or(0),
            self.config.tasks,
            self.seed
        );

        let mut results = Vec::with_capacity(self.config.tests.len());
        for &kind in &self.config.tests {
            println!("\n{0} {1} {0}", "=".repeat(20), kind.title());
            results.push(self.run_kind(kind)?);
        }
        Ok(results)
    }

    /// Collect every run for export
    pub fn collect_results(&self, results: &[KindResults]) -> BenchmarkResults {
        let mut collected = BenchmarkResults::new(&self.config.summary(self.seed), self.seed);
        for kind_results in results {
            collected.extend(kind_results.runs.iter().cloned());
        }
        collected
    }
}
