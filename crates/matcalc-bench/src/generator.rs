//! Seeded random operand generation.

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use matcalc_core::matrix::Matrix;

/// Distribution of generated cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueDistribution {
    /// Uniform in `[0, 1)`.
    #[default]
    Unit,
    /// Integers `0..10`; products stay exact in `f64`.
    SmallInt,
}

impl FromStr for ValueDistribution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unit" => Ok(Self::Unit),
            "int" | "small-int" => Ok(Self::SmallInt),
            _ => Err(format!("unknown value distribution: {s}")),
        }
    }
}

/// Deterministic matrix generator.
pub struct MatrixGenerator {
    rng: StdRng,
    distribution: ValueDistribution,
}

impl MatrixGenerator {
    /// Create a generator whose output is fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64, distribution: ValueDistribution) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            distribution,
        }
    }

    /// Next `n x n` matrix from the stream.
    pub fn next_matrix(&mut self, n: usize) -> Matrix {
        let mut m = Matrix::zeros(n);
        for cell in m.as_mut_slice() {
            *cell = match self.distribution {
                ValueDistribution::Unit => self.rng.gen::<f64>(),
                ValueDistribution::SmallInt => f64::from(self.rng.gen_range(0u8..10)),
            };
        }
        m
    }

    /// Next pair of operands.
    pub fn pair(&mut self, n: usize) -> (Matrix, Matrix) {
        let a = self.next_matrix(n);
        let b = self.next_matrix(n);
        (a, b)
    }
}
