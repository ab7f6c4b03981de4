//! Multiplication strategy trait and implementations.
//!
//! `Multiplier` is the interface consumed by the benchmark harness and the
//! binary. Every implementation validates dimensions before computing.

use tracing::debug;

use crate::constants::DEFAULT_BLOCK_SIZE;
use crate::error::MatError;
use crate::kernel::{blocked_band, naive_rows};
use crate::matrix::Matrix;
use crate::memory_budget::MemoryEstimate;
use crate::progress::CancellationToken;
use crate::strassen::{StrassenConfig, StrassenEngine};

/// Rows of the naive product computed between cancellation checks.
const NAIVE_ROW_BAND: usize = 32;

/// Interchangeable square-matrix multiplication strategy.
pub trait Multiplier: Send + Sync {
    /// Compute `a * b`, polling `cancel` at coarse checkpoints.
    fn multiply_with_cancel(
        &self,
        a: &Matrix,
        b: &Matrix,
        cancel: &CancellationToken,
    ) -> Result<Matrix, MatError>;

    /// Compute `a * b`.
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatError> {
        self.multiply_with_cancel(a, b, &CancellationToken::new())
    }

    /// Get the name of this strategy.
    fn name(&self) -> &str;

    /// Estimated peak working set for `n x n` operands.
    fn estimate(&self, n: usize) -> MemoryEstimate;
}

/// Reject operands that cannot be multiplied together.
pub fn check_dimensions(a: &Matrix, b: &Matrix) -> Result<(), MatError> {
    if a.dim() == b.dim() {
        Ok(())
    } else {
        Err(MatError::DimensionMismatch {
            left: a.dim(),
            right: b.dim(),
        })
    }
}

/// Textbook triple loop; the correctness reference.
pub struct NaiveStrategy;

impl NaiveStrategy {
    /// Create the reference strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NaiveStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Multiplier for NaiveStrategy {
    fn multiply_with_cancel(
        &self,
        a: &Matrix,
        b: &Matrix,
        cancel: &CancellationToken,
    ) -> Result<Matrix, MatError> {
        check_dimensions(a, b)?;
        let n = a.dim();
        debug!(n, "naive multiply");
        let mut c = Matrix::zeros(n);
        for start in (0..n).step_by(NAIVE_ROW_BAND) {
            cancel.check_cancelled()?;
            let end = (start + NAIVE_ROW_BAND).min(n);
            naive_rows(a.as_slice(), b.as_slice(), c.as_mut_slice(), n, start..end);
        }
        Ok(c)
    }

    fn name(&self) -> &'static str {
        "naive"
    }

    fn estimate(&self, n: usize) -> MemoryEstimate {
        MemoryEstimate::direct(n)
    }
}

/// Cache-blocked triple loop over square tiles.
pub struct BlockedStrategy {
    block: usize,
}

impl BlockedStrategy {
    /// Create a blocked strategy; a zero tile size falls back to the default.
    #[must_use]
    pub fn new(block: usize) -> Self {
        let block = if block == 0 { DEFAULT_BLOCK_SIZE } else { block };
        Self { block }
    }

    /// Tile edge length.
    #[must_use]
    pub fn block(&self) -> usize {
        self.block
    }
}

impl Default for BlockedStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_SIZE)
    }
}

impl Multiplier for BlockedStrategy {
    fn multiply_with_cancel(
        &self,
        a: &Matrix,
        b: &Matrix,
        cancel: &CancellationToken,
    ) -> Result<Matrix, MatError> {
        check_dimensions(a, b)?;
        let n = a.dim();
        debug!(n, block = self.block, "blocked multiply");
        let mut c = Matrix::zeros(n);
        for ii in (0..n).step_by(self.block) {
            cancel.check_cancelled()?;
            blocked_band(a.as_slice(), b.as_slice(), c.as_mut_slice(), n, self.block, ii);
        }
        Ok(c)
    }

    fn name(&self) -> &'static str {
        "blocked"
    }

    fn estimate(&self, n: usize) -> MemoryEstimate {
        MemoryEstimate::direct(n)
    }
}

/// Strassen's algorithm over padded power-of-two operands.
pub struct StrassenStrategy {
    engine: StrassenEngine,
}

impl StrassenStrategy {
    /// Create a Strassen strategy backed by its own engine.
    #[must_use]
    pub fn new(config: StrassenConfig) -> Self {
        Self {
            engine: StrassenEngine::new(config),
        }
    }

    /// The underlying engine, for allocation statistics.
    #[must_use]
    pub fn engine(&self) -> &StrassenEngine {
        &self.engine
    }
}

impl Default for StrassenStrategy {
    fn default() -> Self {
        Self::new(StrassenConfig::default())
    }
}

impl Multiplier for StrassenStrategy {
    fn multiply_with_cancel(
        &self,
        a: &Matrix,
        b: &Matrix,
        cancel: &CancellationToken,
    ) -> Result<Matrix, MatError> {
        self.engine.multiply_with_cancel(a, b, cancel)
    }

    fn name(&self) -> &'static str {
        "strassen"
    }

    fn estimate(&self, n: usize) -> MemoryEstimate {
        MemoryEstimate::strassen(n, self.engine.config())
    }
}
