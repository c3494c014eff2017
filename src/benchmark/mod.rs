//! Execution strategies, runners and orchestration
//!
//! This module provides the benchmark execution system:
//! - TaskCounters: Atomic counters shared by the units of one run
//! - Runners: sequential, thread-per-task and process-per-task
//! - WorkerLauncher: Spawns worker processes and reads their reports
//! - Orchestrator: Runs the task kind x strategy matrix

pub mod counters;
pub mod orchestrator;
pub mod process;
pub mod runner;
pub mod worker;

pub use counters::TaskCounters;
pub use orchestrator::{KindResults, Orchestrator};
pub use process::WorkerLauncher;
pub use runner::{run_sequentially, run_with_processes, run_with_threads, RunOutcome, Strategy};
pub use worker::run_worker;
