//! Direct multiplication kernels used below the Strassen threshold.
//!
//! All kernels take row-major `n x n` slices and overwrite `c` entirely.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_BLOCK_SIZE;

/// Lanes accumulated together in the vectorizable inner loop.
const LANES: usize = 4;

/// Leaf kernel selection for the Strassen engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BaseKernel {
    /// Textbook i-j-k triple loop.
    Naive,
    /// i-k-j order with `A[i][k]` broadcast across contiguous rows of `B` and `C`.
    #[default]
    Vectorized,
    /// Cache-blocked i-k-j over square tiles.
    Blocked {
        /// Tile edge length.
        block: usize,
    },
}

impl BaseKernel {
    /// Compute `c = a * b` for `n x n` operands.
    #[inline]
    pub fn multiply_into(self, a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
        match self {
            Self::Naive => multiply_naive(a, b, c, n),
            Self::Vectorized => multiply_base(a, b, c, n),
            Self::Blocked { block } => multiply_blocked(a, b, c, n, block),
        }
    }

    /// Short name used in logs and reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Naive => "naive",
            Self::Vectorized => "vectorized",
            Self::Blocked { .. } => "blocked",
        }
    }

    /// Parse a kernel name; `blocked` uses the default tile size.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "naive" => Some(Self::Naive),
            "vectorized" | "ikj" => Some(Self::Vectorized),
            "blocked" => Some(Self::Blocked {
                block: DEFAULT_BLOCK_SIZE,
            }),
            _ => None,
        }
    }
}

/// Textbook `C[i][j] = sum_k A[i][k] * B[k][j]`, one dot product per cell.
pub fn multiply_naive(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    debug_assert!(a.len() == n * n && b.len() == n * n && c.len() == n * n);
    naive_rows(a, b, c, n, 0..n);
}

/// Rows `rows` of the naive product.
pub(crate) fn naive_rows(a: &[f64], b: &[f64], c: &mut [f64], n: usize, rows: Range<usize>) {
    for i in rows {
        let a_row = &a[i * n..(i + 1) * n];
        for j in 0..n {
            let mut sum = 0.0;
            for (k, &aik) in a_row.iter().enumerate() {
                sum += aik * b[k * n + j];
            }
            c[i * n + j] = sum;
        }
    }
}

/// Base kernel: zero `C`, then for each row `i` and each `k` add
/// `A[i][k] * B[k][..]` into `C[i][..]` in fixed-width lanes.
pub fn multiply_base(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    debug_assert!(a.len() == n * n && b.len() == n * n && c.len() == n * n);
    c.fill(0.0);
    for (a_row, c_row) in a.chunks_exact(n).zip(c.chunks_exact_mut(n)) {
        for (&aik, b_row) in a_row.iter().zip(b.chunks_exact(n)) {
            // padded margins are all zeros
            if aik == 0.0 {
                continue;
            }
            axpy(aik, b_row, c_row);
        }
    }
}

/// Cache-blocked multiplication over `block x block` tiles with ragged edges.
pub fn multiply_blocked(a: &[f64], b: &[f64], c: &mut [f64], n: usize, block: usize) {
    debug_assert!(a.len() == n * n && b.len() == n * n && c.len() == n * n);
    let block = block.max(1);
    c.fill(0.0);
    for ii in (0..n).step_by(block) {
        blocked_band(a, b, c, n, block, ii);
    }
}

/// One band of tile rows starting at `ii`. Expects that band of `c` zeroed.
pub(crate) fn blocked_band(a: &[f64], b: &[f64], c: &mut [f64], n: usize, block: usize, ii: usize) {
    let i_end = (ii + block).min(n);
    for kk in (0..n).step_by(block) {
        let k_end = (kk + block).min(n);
        for jj in (0..n).step_by(block) {
            let j_end = (jj + block).min(n);
            for i in ii..i_end {
                let c_seg = &mut c[i * n + jj..i * n + j_end];
                for k in kk..k_end {
                    let aik = a[i * n + k];
                    axpy(aik, &b[k * n + jj..k * n + j_end], c_seg);
                }
            }
        }
    }
}

/// `y += alpha * x`, unrolled by `LANES` so the compiler can emit vector FMAs.
#[inline]
fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    debug_assert_eq!(x.len(), y.len());
    let mut y_lanes = y.chunks_exact_mut(LANES);
    let mut x_lanes = x.chunks_exact(LANES);
    for (yl, xl) in (&mut y_lanes).zip(&mut x_lanes) {
        yl[0] += alpha * xl[0];
        yl[1] += alpha * xl[1];
        yl[2] += alpha * xl[2];
        yl[3] += alpha * xl[3];
    }
    for (yv, xv) in y_lanes.into_remainder().iter_mut().zip(x_lanes.remainder()) {
        *yv += alpha * xv;
    }
}
