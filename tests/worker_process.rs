//! Drives the compiled binary: worker mode and the process-per-task runner

use std::process::Command;
use std::time::Duration;

use exec_strategy_bench::benchmark::{run_with_processes, Strategy, TaskCounters, WorkerLauncher};
use exec_strategy_bench::workload::{TaskDetail, TaskKind, TaskParams, TaskReport, UnitOfWork, Workload};

const BIN: &str = env!("CARGO_BIN_EXE_exec-strategy-bench");

fn short_params() -> TaskParams {
    TaskParams {
        io_min: Duration::from_millis(100),
        io_max: Duration::from_millis(150),
        cpu_budget: Duration::from_millis(100),
    }
}

#[test]
fn test_worker_mode_prints_report() {
    let output = Command::new(BIN)
        .args([
            "--worker", "3", "--tests", "cpu", "--cpu-budget-ms", "20", "--seed", "5",
        ])
        .output()
        .expect("run worker");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let report = TaskReport::from_line(stdout.trim()).unwrap();
    assert_eq!(report.task_id, 3);
    assert_eq!(report.kind, TaskKind::Cpu);
    assert!(matches!(report.detail, TaskDetail::Computed { .. }));
    // task logs went to stderr
    assert!(String::from_utf8_lossy(&output.stderr).contains("CPU task 3"));
}

#[test]
fn test_process_runner_with_real_workers() {
    let workload = Workload::new(TaskKind::Io, short_params(), 21).with_quiet_tasks(true);
    let launcher = WorkerLauncher::new(BIN);
    let counters = TaskCounters::with_tasks(4);

    let outcome = run_with_processes(&workload, 4, &launcher, &counters).unwrap();

    assert_eq!(outcome.strategy, Strategy::Processes);
    assert_eq!(outcome.failures, 0);
    assert_eq!(outcome.reports.len(), 4);
    // waits overlap across processes: far below 4 x 100ms plus startup
    assert!(outcome.duration < Duration::from_millis(4 * 100 + 150));

    // each worker drew the same wait the in-process task would
    for report in &outcome.reports {
        assert_eq!(report.detail, workload.run(report.task_id).detail);
    }
}

#[test]
fn test_full_run_writes_exports() {
    let dir = std::env::temp_dir().join(format!("exec-strategy-bench-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let json = dir.join("results.json");
    let csv = dir.join("results.csv");

    let status = Command::new(BIN)
        .args(["-n", "2", "--io-min-ms", "10", "--io-max-ms", "20", "--cpu-budget-ms", "10", "-q"])
        .arg("-o")
        .arg(&json)
        .arg("--csv")
        .arg(&csv)
        .status()
        .expect("run benchmark");
    assert!(status.success());

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(value["runs"].as_array().map(Vec::len), Some(6));

    let csv_text = std::fs::read_to_string(&csv).unwrap();
    assert_eq!(csv_text.lines().count(), 7);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_invalid_config_exits_nonzero() {
    let status = Command::new(BIN)
        .args(["--io-min-ms", "900", "--io-max-ms", "100", "-q"])
        .status()
        .expect("run benchmark");
    assert!(!status.success());
}
