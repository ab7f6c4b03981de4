//! # matcalc-core
//!
//! Dense square-matrix multiplication: a naive reference, a cache-blocked
//! triple loop and Strassen's recursive algorithm, plus a verifier that
//! checks results against the reference within a tolerance.

pub mod algebra;
pub mod constants;
pub mod error;
pub mod kernel;
pub mod matrix;
pub mod memory_budget;
pub mod options;
pub mod padding;
pub mod progress;
pub mod registry;
pub mod strassen;
pub mod strategy;
pub mod verify;

// Re-exports
pub use constants::{
    exit_codes, DEFAULT_BLOCK_SIZE, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_STRASSEN_THRESHOLD,
    DEFAULT_TOLERANCE,
};
pub use error::MatError;
pub use kernel::BaseKernel;
pub use matrix::Matrix;
pub use memory_budget::MemoryEstimate;
pub use options::Options;
pub use progress::CancellationToken;
pub use registry::{DefaultFactory, StrategyFactory, STRATEGY_NAMES};
pub use strassen::{strassen, StrassenConfig, StrassenEngine};
pub use strategy::{BlockedStrategy, Multiplier, NaiveStrategy, StrassenStrategy};
pub use verify::{equal_within, equal_within_relative, max_abs_diff};

/// Multiply two square matrices with Strassen's algorithm and default settings.
///
/// For cancellation, other strategies or a custom threshold, go through
/// [`DefaultFactory`] or [`StrassenEngine`] directly.
///
/// # Example
/// ```
/// use matcalc_core::Matrix;
///
/// let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// let b = Matrix::from_rows(&[vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
/// let c = matcalc_core::multiply(&a, &b).unwrap();
/// assert_eq!(c.row(0), &[19.0, 22.0]);
/// assert_eq!(c.row(1), &[43.0, 50.0]);
/// ```
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, MatError> {
    strassen(a, b)
}
