//! Constants for multiplication thresholds and configuration.

/// Default matrix size at or below which Strassen recursion stops.
///
/// Values below ~32 usually lose to the base kernel's cache and vector efficiency.
pub const DEFAULT_STRASSEN_THRESHOLD: usize = 64;

/// Default tile edge for the cache-blocked strategy.
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// Default absolute tolerance used by the verifier.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Default frame size at or above which Strassen products run on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Temporaries held by one sequential Strassen frame:
/// 8 quadrants, 7 products, 2 scratch buffers and 1 result quadrant.
pub const FRAME_BUFFERS: usize = 18;

/// Temporaries held by one parallel Strassen frame: the sequential set plus
/// 10 private operand buffers, one per sum/difference feeding a product.
pub const PARALLEL_FRAME_BUFFERS: usize = FRAME_BUFFERS + 10;

/// Default matrix sizes exercised by the benchmark harness.
pub const DEFAULT_BENCH_SIZES: [usize; 4] = [128, 256, 512, 1024];

/// Default number of timed repetitions per strategy and size.
pub const DEFAULT_REPEATS: u32 = 3;

/// Exit codes for the command-line harness.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Computation timed out.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// A strategy's result did not match the naive reference.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Computation cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_powers_of_two() {
        assert!(DEFAULT_STRASSEN_THRESHOLD.is_power_of_two());
        assert!(DEFAULT_PARALLEL_THRESHOLD.is_power_of_two());
        assert!(DEFAULT_PARALLEL_THRESHOLD > DEFAULT_STRASSEN_THRESHOLD);
    }

    #[test]
    fn frame_buffer_counts() {
        assert_eq!(FRAME_BUFFERS, 18);
        assert_eq!(PARALLEL_FRAME_BUFFERS, 28);
    }
}
