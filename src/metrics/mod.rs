//! Timing, run summaries and reporting
//!
//! This module provides:
//! - A wall-clock timing helper used by every runner
//! - Per-run summary statistics (speedup, overlap, task-time distribution)
//! - Console tables and JSON/CSV export

pub mod reporter;
pub mod summary;
pub mod timing;

pub use reporter::{print_kind_summary, print_run_header, print_run_result, BenchmarkResults};
pub use summary::{summarize, RunSummary};
pub use timing::timed;
