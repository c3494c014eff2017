//! Wall-clock timing helper

use std::time::{Duration, Instant};

use tracing::debug;

/// Run `f`, log its working time under `label`, and return its result with the elapsed time
///
/// The timestamps bracket the closure call and nothing else, so callers put
/// exactly the batch they want measured inside it.
pub fn timed<T>(label: &str, f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    debug!("working time [{}]: {:.6} sec", label, elapsed.as_secs_f64());
    (result, elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_timed_returns_result_and_elapsed() {
        let (value, elapsed) = timed("sleep", || {
            thread::sleep(Duration::from_millis(20));
            42
        });
        assert_eq!(value, 42);
        assert!(elapsed >= Duration::from_millis(20));
    }

    #[test]
    fn test_timed_propagates_errors_as_values() {
        let (result, _) = timed("fails", || "x".parse::<u32>());
        assert!(result.is_err());
    }
}
