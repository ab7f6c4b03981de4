//! Contiguous row-major storage for square matrices of `f64`.
//!
//! Element `(i, j)` lives at `i * n + j`. Storage is released when the
//! `Matrix` is dropped; ownership moves with the value, so a buffer never has
//! two live owners. Allocation failure aborts the process through the global
//! allocator, there is no recoverable error for it.

use std::fmt;
use std::mem::size_of;

use crate::error::MatError;

/// A dense `n x n` matrix stored in a single contiguous buffer.
#[derive(Clone, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Allocate a zero-filled `n x n` matrix.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        assert!(n > 0, "matrix dimension must be positive");
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// The `n x n` identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Build a matrix from a row-major buffer of exactly `n * n` finite values.
    pub fn from_vec(n: usize, data: Vec<f64>) -> Result<Self, MatError> {
        if n == 0 {
            return Err(MatError::InvalidInput("dimension must be positive".into()));
        }
        if data.len() != n * n {
            return Err(MatError::InvalidInput(format!(
                "expected {} elements for a {n}x{n} matrix, got {}",
                n * n,
                data.len()
            )));
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(MatError::InvalidInput(format!(
                "non-finite value at ({}, {})",
                pos / n,
                pos % n
            )));
        }
        Ok(Self { n, data })
    }

    /// Build a matrix from nested rows; every row must have one entry per row.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MatError> {
        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(MatError::InvalidInput(format!(
                "row {i} has {} columns, expected {n}",
                row.len()
            )));
        }
        Self::from_vec(n, rows.concat())
    }

    /// Declared dimension `n`.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Read element `(i, j)`.
    #[must_use]
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.n && j < self.n);
        self.data[i * self.n + j]
    }

    /// Write element `(i, j)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(i < self.n && j < self.n);
        self.data[i * self.n + j] = value;
    }

    /// Row `i` as a contiguous slice.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// The whole row-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The whole row-major buffer, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the matrix, returning its buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Whether every element is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }

    /// Bytes occupied by the element buffer of an `n x n` matrix.
    #[must_use]
    pub fn byte_size(n: usize) -> usize {
        n * n * size_of::<f64>()
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 4;
        writeln!(f, "Matrix {}x{} [", self.n, self.n)?;
        for i in 0..self.n.min(PREVIEW) {
            let row = self.row(i);
            write!(f, "  ")?;
            for v in &row[..self.n.min(PREVIEW)] {
                write!(f, "{v:10.4} ")?;
            }
            if self.n > PREVIEW {
                write!(f, "...")?;
            }
            writeln!(f)?;
        }
        if self.n > PREVIEW {
            writeln!(f, "  ...")?;
        }
        write!(f, "]")
    }
}
