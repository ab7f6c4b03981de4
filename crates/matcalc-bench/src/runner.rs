//! Timing runner shared by the harness and calibration.

use std::time::{Duration, Instant};

/// Time a fallible function, keeping the output of the last measured run.
///
/// Stops at the first error. At least one measured iteration always runs.
pub fn measure<T, E, F>(
    warmup_iters: u32,
    measure_iters: u32,
    mut f: F,
) -> Result<(BenchmarkResult, T), E>
where
    F: FnMut() -> Result<T, E>,
{
    for _ in 0..warmup_iters {
        f()?;
    }

    let iterations = measure_iters.max(1);
    let mut durations = Vec::with_capacity(iterations as usize);
    let start = Instant::now();
    let mut output = f()?;
    durations.push(start.elapsed());
    for _ in 1..iterations {
        let start = Instant::now();
        output = f()?;
        durations.push(start.elapsed());
    }

    Ok((BenchmarkResult::from_durations(durations), output))
}

/// Timing statistics of the measured iterations.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Mean duration per iteration.
    pub mean: Duration,
    /// Median duration.
    pub median: Duration,
    /// Fastest iteration.
    pub min: Duration,
    /// Slowest iteration.
    pub max: Duration,
    /// Number of measured iterations.
    pub iterations: u32,
}

impl BenchmarkResult {
    fn from_durations(mut durations: Vec<Duration>) -> Self {
        durations.sort();
        let min = durations.first().copied().unwrap_or_default();
        let max = durations.last().copied().unwrap_or_default();
        let median = if durations.is_empty() {
            Duration::ZERO
        } else if durations.len() % 2 == 1 {
            durations[durations.len() / 2]
        } else {
            let mid = durations.len() / 2;
            (durations[mid - 1] + durations[mid]) / 2
        };
        let iterations = u32::try_from(durations.len()).unwrap_or(u32::MAX);
        let total: Duration = durations.iter().sum();
        let mean = total / iterations.max(1);

        Self {
            mean,
            median,
            min,
            max,
            iterations,
        }
    }
}

/// Duration in fractional milliseconds.
#[must_use]
pub fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_orders_statistics() {
        let (result, ()) = measure(2, 5, || {
            let _ = 2 + 2;
            Ok::<_, String>(())
        })
        .unwrap();
        assert_eq!(result.iterations, 5);
        assert!(result.min <= result.median);
        assert!(result.median <= result.max);
        assert!(result.mean.as_nanos() < 1_000_000);
    }

    #[test]
    fn measure_keeps_last_output() {
        let mut calls = 0;
        let (result, last) = measure(1, 3, || {
            calls += 1;
            Ok::<_, String>(calls)
        })
        .unwrap();
        assert_eq!(result.iterations, 3);
        assert_eq!(last, 4);
    }

    #[test]
    fn measure_stops_on_error() {
        let mut calls = 0;
        let err = measure(0, 5, || {
            calls += 1;
            if calls == 2 {
                Err("boom")
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert_eq!(err, "boom");
        assert_eq!(calls, 2);
    }

    #[test]
    fn zero_iterations_still_measures_once() {
        let (result, ()) = measure(0, 0, || Ok::<_, String>(())).unwrap();
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn millis_conversion() {
        assert!((millis(Duration::from_micros(1500)) - 1.5).abs() < 1e-12);
    }
}
