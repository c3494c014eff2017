//! Task simulators
//!
//! Two stand-ins for real work: a timed sleep for blocking I/O and a timed
//! busy-loop for computation. Both log start and finish with the task id.

use std::hint::black_box;
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use super::task::{task_rng, TaskDetail, TaskId, TaskParams, TaskReport};
use super::TaskKind;

/// Log at info when `loud`, otherwise at debug
macro_rules! task_log {
    ($loud:expr, $($arg:tt)*) => {
        if $loud {
            info!($($arg)*);
        } else {
            debug!($($arg)*);
        }
    };
}

/// Sleep for a random wait in `[io_min, io_max)` drawn from the task's RNG
pub fn io_bound_task(task_id: TaskId, params: &TaskParams, seed: u64, loud: bool) -> TaskReport {
    let start = Instant::now();
    let wait = params.io_wait(&mut task_rng(seed, task_id));
    task_log!(
        loud,
        "[I/O task {}] start - waiting {:.2}s...",
        task_id,
        wait.as_secs_f64()
    );
    thread::sleep(wait);
    task_log!(loud, "[I/O task {}] done!", task_id);

    TaskReport::new(
        task_id,
        TaskKind::Io,
        start.elapsed(),
        TaskDetail::Waited {
            wait_us: wait.as_micros() as u64,
        },
    )
}

/// Spin a counter until `cpu_budget` of wall-clock time has passed
pub fn cpu_bound_task(task_id: TaskId, params: &TaskParams, loud: bool) -> TaskReport {
    task_log!(loud, "[CPU task {}] start - computing...", task_id);
    let start = Instant::now();
    let deadline = start + params.cpu_budget;

    let mut count: u64 = 0;
    while Instant::now() < deadline {
        count = black_box(count + 1);
    }

    let elapsed = start.elapsed();
    task_log!(loud, "[CPU task {}] done ({} iterations)", task_id, count);

    TaskReport::new(
        task_id,
        TaskKind::Cpu,
        elapsed,
        TaskDetail::Computed { iterations: count },
    )
}
