//! Multiplication options and configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_STRASSEN_THRESHOLD, DEFAULT_TOLERANCE,
};
use crate::error::MatError;
use crate::kernel::BaseKernel;

/// Options shared by all multiplication strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Matrix size at or below which Strassen switches to the base kernel.
    pub strassen_threshold: usize,
    /// Tile edge for the blocked strategy.
    pub block_size: usize,
    /// Absolute tolerance for verification against the naive reference.
    pub tolerance: f64,
    /// Evaluate the seven Strassen products on the rayon pool.
    pub parallel: bool,
    /// Frame size at or above which parallel evaluation kicks in.
    pub parallel_threshold: usize,
    /// Kernel used at Strassen leaves.
    pub kernel: BaseKernel,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strassen_threshold: DEFAULT_STRASSEN_THRESHOLD,
            block_size: DEFAULT_BLOCK_SIZE,
            tolerance: DEFAULT_TOLERANCE,
            parallel: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            kernel: BaseKernel::default(),
        }
    }
}

impl Options {
    /// Normalize options, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.strassen_threshold == 0 {
            self.strassen_threshold = DEFAULT_STRASSEN_THRESHOLD;
        }
        if self.block_size == 0 {
            self.block_size = DEFAULT_BLOCK_SIZE;
        }
        if self.tolerance <= 0.0 || !self.tolerance.is_finite() {
            self.tolerance = DEFAULT_TOLERANCE;
        }
        if self.parallel_threshold == 0 {
            self.parallel_threshold = DEFAULT_PARALLEL_THRESHOLD;
        }
        if let BaseKernel::Blocked { block: 0 } = self.kernel {
            self.kernel = BaseKernel::Blocked {
                block: self.block_size,
            };
        }
        self
    }

    /// Reject values that normalization cannot repair.
    pub fn validate(&self) -> Result<(), MatError> {
        if self.parallel && self.parallel_threshold <= self.strassen_threshold {
            return Err(MatError::Config(format!(
                "parallel threshold ({}) must exceed the Strassen threshold ({})",
                self.parallel_threshold, self.strassen_threshold
            )));
        }
        Ok(())
    }
}
