//! Result reporting - console output and export
//!
//! Supports:
//! - Console (per-run lines, per-task summary table)
//! - JSON
//! - CSV

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
};

use super::summary::RunSummary;
use crate::benchmark::Strategy;
use crate::workload::TaskKind;

/// Header line of a run, e.g. `--- cpu_bound_task threads (4 threads) ---`
pub fn run_header(task_name: &str, strategy: Strategy, tasks: usize) -> String {
    format!(
        "--- {} {} ({} {}) ---",
        task_name,
        strategy,
        tasks,
        strategy.unit_label()
    )
}

/// Print the header line of a run
pub fn print_run_header(task_name: &str, strategy: Strategy, tasks: usize) {
    println!("\n{}", run_header(task_name, strategy, tasks));
}

/// Print the result lines of a run
pub fn print_run_result(summary: &RunSummary) {
    println!("--- {} run complete ---", summary.strategy);
    println!(
        "Total time: {:.4} s{}",
        summary.duration.as_secs_f64(),
        if summary.failures > 0 {
            format!(" | Failed tasks: {}", summary.failures)
        } else {
            String::new()
        }
    );
}

/// Render the comparison table for one task kind
pub fn render_summary_table(summaries: &[RunSummary]) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Strategy",
        "Total (s)",
        "Speedup",
        "Task sum (s)",
        "Slowest task (s)",
        "Task p50 (ms)",
        "Overlap",
        "Failed",
    ]);

    for summary in summaries {
        builder.push_record([
            summary.strategy.to_string(),
            format!("{:.4}", summary.duration.as_secs_f64()),
            summary
                .speedup
                .map(|s| format!("{:.2}x", s))
                .unwrap_or_else(|| "-".to_string()),
            format!("{:.4}", summary.task_time_sum.as_secs_f64()),
            format!("{:.4}", summary.task_time_max.as_secs_f64()),
            format!("{:.1}", summary.task_time_p50_ms),
            format!("{:.2}", summary.overlap()),
            summary.failures.to_string(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::sharp())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    table.to_string()
}

/// Closing remarks for a task kind
pub fn conclusion(kind: TaskKind) -> [&'static str; 2] {
    match kind {
        TaskKind::Io => [
            "I/O-bound: threads wait side by side, so the threaded run takes about as long as its slowest wait.",
            "Processes overlap their waits too, but pay process startup for every task.",
        ],
        TaskKind::Cpu => [
            "CPU-bound: Rust threads have no global execution lock and spread over all cores like processes do.",
            "Both are bounded by the core count; processes add startup cost on top.",
        ],
    }
}

/// Print the summary of one task kind
pub fn print_kind_summary(kind: TaskKind, summaries: &[RunSummary]) {
    if summaries.is_empty() {
        return;
    }

    println!("\n--- {} summary ---", kind.task_name());
    println!("{}", render_summary_table(summaries));

    if summaries.len() > 1 {
        let [first, second] = conclusion(kind);
        println!("\nConclusion: {}", first);
        println!("            {}", second);
    }
}

/// All runs of an invocation, for export
#[derive(Debug)]
pub struct BenchmarkResults {
    /// Configuration summary
    pub config_summary: String,
    /// Run seed actually used
    pub seed: u64,
    /// Every run in execution order
    pub runs: Vec<RunSummary>,
}

impl BenchmarkResults {
    /// Create new results collection
    pub fn new(config_summary: &str, seed: u64) -> Self {
        Self {
            config_summary: config_summary.to_string(),
            seed,
            runs: Vec::new(),
        }
    }

    /// Add summarized runs
    pub fn extend(&mut self, runs: impl IntoIterator<Item = RunSummary>) {
        self.runs.extend(runs);
    }

    /// Export all results to JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "config": self.config_summary,
            "seed": self.seed,
            "runs": self.runs.iter().map(|r| r.to_json()).collect::<Vec<_>>()
        })
    }

    /// Write all results to JSON file
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let mut file = File::create(path)?;
        let text = serde_json::to_string_pretty(&self.to_json())?;
        writeln!(file, "{}", text)?;
        Ok(())
    }

    /// Write all results to CSV file, one row per run
    pub fn write_csv(&self, path: &Path) -> io::Result<()> {
        let mut file = File::create(path)?;
        self.write_csv_to(&mut file)
    }

    fn write_csv_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", RunSummary::csv_header())?;
        for run in &self.runs {
            writeln!(out, "{}", run.to_csv_row())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn summary(strategy: Strategy, duration_ms: u64) -> RunSummary {
        RunSummary {
            strategy,
            task_name: "io_bound_task".to_string(),
            tasks: 4,
            duration: Duration::from_millis(duration_ms),
            speedup: Some(2700.0 / duration_ms as f64),
            completed: 4,
            failures: 0,
            task_time_sum: Duration::from_millis(2700),
            task_time_max: Duration::from_millis(900),
            task_time_mean_ms: 675.0,
            task_time_p50_ms: 650.0,
        }
    }

    #[test]
    fn test_run_header_names_the_execution_unit() {
        assert_eq!(
            run_header("io_bound_task", Strategy::Sequential, 4),
            "--- io_bound_task sequential (4 tasks) ---"
        );
        assert_eq!(
            run_header("cpu_bound_task", Strategy::Threads, 4),
            "--- cpu_bound_task threads (4 threads) ---"
        );
        assert_eq!(
            run_header("cpu_bound_task", Strategy::Processes, 2),
            "--- cpu_bound_task processes (2 processes) ---"
        );
    }

    #[test]
    fn test_summary_table_lists_every_strategy() {
        let table = render_summary_table(&[
            summary(Strategy::Sequential, 2700),
            summary(Strategy::Threads, 900),
        ]);
        assert!(table.contains("Strategy"));
        assert!(table.contains("sequential"));
        assert!(table.contains("threads"));
        assert!(table.contains("3.00x"));
        assert!(table.contains("2.7000"));
    }

    #[test]
    fn test_benchmark_results_json() {
        let mut results = BenchmarkResults::new("tasks=4", 42);
        results.extend([summary(Strategy::Sequential, 2700), summary(Strategy::Threads, 900)]);

        let value = results.to_json();
        assert_eq!(value["seed"], 42);
        assert_eq!(value["runs"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["runs"][1]["strategy"], "threads");
    }

    #[test]
    fn test_csv_has_header_and_one_row_per_run() {
        let mut results = BenchmarkResults::new("tasks=4", 42);
        results.extend([
            summary(Strategy::Sequential, 2700),
            summary(Strategy::Threads, 900),
            summary(Strategy::Processes, 1100),
        ]);

        let mut out = Vec::new();
        results.write_csv_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], RunSummary::csv_header());
        assert!(lines[3].starts_with("io_bound_task,processes,4,1.1000,"));
    }

    #[test]
    fn test_conclusions_differ_per_kind() {
        assert_ne!(conclusion(TaskKind::Io), conclusion(TaskKind::Cpu));
    }
}
