//! Utility modules

pub mod error;

pub use error::{BenchmarkError, Result, WorkerError};
