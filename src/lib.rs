//! exec-strategy-bench library
//!
//! Runs a unit of work N times sequentially, with one thread per task and
//! with one process per task, and compares the wall-clock durations.

pub mod benchmark;
pub mod config;
pub mod metrics;
pub mod utils;
pub mod workload;
