//! Error type shared by every multiplication strategy.

/// Error type for matrix multiplication.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatError {
    /// Operands cannot be multiplied together.
    #[error("dimension mismatch: {left}x{left} cannot be multiplied by {right}x{right}")]
    DimensionMismatch {
        /// Dimension of the left operand.
        left: usize,
        /// Dimension of the right operand.
        right: usize,
    },

    /// Input data is malformed (wrong length, empty, non-finite values).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Computation was cancelled.
    #[error("computation cancelled")]
    Cancelled,

    /// Computation timed out.
    #[error("computation timed out after {0}")]
    Timeout(String),

    /// A strategy disagreed with the reference beyond tolerance.
    #[error("result mismatch for {algorithm}: max difference {max_diff:e}")]
    Mismatch {
        /// Strategy whose output diverged.
        algorithm: String,
        /// Largest absolute cell difference observed.
        max_diff: f64,
    },
}
