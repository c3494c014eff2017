//! exec-strategy-bench - compare execution strategies for I/O- and CPU-bound work
//!
//! Runs each task kind sequentially, with one thread per task and with one
//! process per task, then prints the wall-clock durations side by side.

use std::io;

use anyhow::Result;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use exec_strategy_bench::benchmark::{run_worker, Orchestrator};
use exec_strategy_bench::config::{BenchmarkConfig, CliArgs};

fn setup_logging(verbose: bool, quiet: bool, worker: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false);

    // Worker stdout carries the task report only
    let result = if worker {
        tracing::subscriber::set_global_default(builder.with_writer(io::stderr).finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.expect("Failed to set tracing subscriber");
}

fn print_banner(config: &BenchmarkConfig, seed: u64) {
    if config.quiet {
        return;
    }

    println!("exec-strategy-bench v{}", env!("CARGO_PKG_VERSION"));
    println!("====================================");
    println!(
        "Tasks per run: {}, CPUs: {}",
        config.tasks,
        std::thread::available_parallelism()
            .map(|p| p.get().to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    );
    println!(
        "Tests: {:?}, Strategies: {:?}",
        config.tests.iter().map(|t| t.as_str()).collect::<Vec<_>>(),
        config.strategies.iter().map(|s| s.as_str()).collect::<Vec<_>>()
    );
    println!(
        "I/O wait: {}..{} ms, CPU budget: {} ms, Seed: {}",
        config.params.io_min.as_millis(),
        config.params.io_max.as_millis(),
        config.params.cpu_budget.as_millis(),
        seed
    );
    println!("====================================");
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Setup logging
    setup_logging(args.verbose, args.quiet, args.worker_task.is_some());

    // Build configuration
    let config = BenchmarkConfig::from_cli(&args)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // Worker mode: one task, one report line, nothing else on stdout
    if let Some(task_id) = config.worker_task {
        let stdout = io::stdout();
        run_worker(&config, task_id, &mut stdout.lock())?;
        return Ok(());
    }

    let orchestrator = Orchestrator::new(config.clone())?;
    print_banner(&config, orchestrator.seed());

    // Run the whole matrix
    let results = orchestrator.run_all()?;
    let collected = orchestrator.collect_results(&results);

    // Export to JSON if requested
    if let Some(ref output_path) = config.output_path {
        info!("Writing results to: {:?}", output_path);
        collected.write_json(output_path)?;
    }

    // Export to CSV if requested
    if let Some(ref csv_path) = config.csv_output {
        info!("Writing CSV to: {:?}", csv_path);
        collected.write_csv(csv_path)?;
    }

    // Print summary
    println!("\n====================================");
    println!("BENCHMARK COMPLETE");
    println!("====================================");
    println!("Runs: {}", collected.runs.len());
    let failures: u64 = collected.runs.iter().map(|r| r.failures).sum();
    println!("Failed tasks: {}", failures);

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
