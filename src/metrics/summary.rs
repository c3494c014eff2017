//! Per-run summary statistics
//!
//! A summary condenses a run outcome into the numbers worth comparing across
//! strategies: wall time, speedup over the sequential baseline, and how much
//! task time was packed into that wall time.

use std::time::Duration;

use hdrhistogram::Histogram;
use serde_json::json;

use crate::benchmark::{RunOutcome, Strategy};

/// Summary of one runner invocation
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub strategy: Strategy,
    pub task_name: String,
    pub tasks: usize,
    /// Wall time of the batch
    pub duration: Duration,
    /// Sequential duration of the same task divided by this duration
    pub speedup: Option<f64>,
    /// Tasks that delivered a report
    pub completed: usize,
    pub failures: u64,
    /// Sum of the individual task times
    pub task_time_sum: Duration,
    /// Slowest individual task
    pub task_time_max: Duration,
    pub task_time_mean_ms: f64,
    pub task_time_p50_ms: f64,
}

impl RunSummary {
    /// Summarize a run outcome (no baseline yet)
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        let mut histogram =
            Histogram::<u64>::new_with_bounds(1, 3_600_000_000, 3).expect("valid histogram bounds");
        let mut sum = Duration::ZERO;
        let mut max = Duration::ZERO;

        for report in &outcome.reports {
            let elapsed = report.elapsed();
            sum += elapsed;
            max = max.max(elapsed);
            histogram.saturating_record(report.elapsed_us.max(1));
        }

        let (mean_ms, p50_ms) = if histogram.len() == 0 {
            (0.0, 0.0)
        } else {
            (
                histogram.mean() / 1000.0,
                histogram.value_at_quantile(0.5) as f64 / 1000.0,
            )
        };

        Self {
            strategy: outcome.strategy,
            task_name: outcome.task_name.clone(),
            tasks: outcome.tasks,
            duration: outcome.duration,
            speedup: None,
            completed: outcome.reports.len(),
            failures: outcome.failures,
            task_time_sum: sum,
            task_time_max: max,
            task_time_mean_ms: mean_ms,
            task_time_p50_ms: p50_ms,
        }
    }

    /// Set the speedup against a sequential baseline duration
    pub fn with_baseline(mut self, baseline: Option<Duration>) -> Self {
        self.speedup = baseline.and_then(|b| {
            let secs = self.duration.as_secs_f64();
            (secs > 0.0).then(|| b.as_secs_f64() / secs)
        });
        self
    }

    /// Task time packed into each second of wall time
    ///
    /// About 1 for a sequential run, up to the task count for a fully
    /// overlapped one.
    pub fn overlap(&self) -> f64 {
        let wall = self.duration.as_secs_f64();
        if wall > 0.0 {
            self.task_time_sum.as_secs_f64() / wall
        } else {
            0.0
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "task": self.task_name,
            "strategy": self.strategy,
            "tasks": self.tasks,
            "duration_secs": self.duration.as_secs_f64(),
            "speedup": self.speedup,
            "completed": self.completed,
            "failures": self.failures,
            "overlap": self.overlap(),
            "task_time": {
                "sum_secs": self.task_time_sum.as_secs_f64(),
                "max_secs": self.task_time_max.as_secs_f64(),
                "mean_ms": self.task_time_mean_ms,
                "p50_ms": self.task_time_p50_ms
            }
        })
    }

    pub fn csv_header() -> &'static str {
        "task,strategy,tasks,duration_secs,speedup,completed,failures,overlap,task_sum_secs,task_max_secs,task_mean_ms,task_p50_ms"
    }

    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{:.4},{},{},{},{:.2},{:.4},{:.4},{:.3},{:.3}",
            self.task_name,
            self.strategy,
            self.tasks,
            self.duration.as_secs_f64(),
            self.speedup.map(|s| format!("{:.2}", s)).unwrap_or_default(),
            self.completed,
            self.failures,
            self.overlap(),
            self.task_time_sum.as_secs_f64(),
            self.task_time_max.as_secs_f64(),
            self.task_time_mean_ms,
            self.task_time_p50_ms
        )
    }
}

/// Summarize outcomes, using each task's sequential run as its baseline
pub fn summarize(outcomes: &[RunOutcome]) -> Vec<RunSummary> {
    outcomes
        .iter()
        .map(|outcome| {
            let baseline = outcomes
                .iter()
                .find(|o| o.strategy == Strategy::Sequential && o.task_name == outcome.task_name)
                .map(|o| o.duration);
            RunSummary::from_outcome(outcome).with_baseline(baseline)
        })
        .collect()
}
