//! Elementwise addition and subtraction of equally sized buffers.
//!
//! Shapes are a caller invariant: these helpers sit behind validated entry
//! points and only check lengths in debug builds.

use crate::matrix::Matrix;

/// `r[i] = a[i] + b[i]` for every cell.
#[inline]
pub fn add_into(a: &[f64], b: &[f64], r: &mut [f64]) {
    debug_assert!(a.len() == b.len() && a.len() == r.len());
    for ((r, a), b) in r.iter_mut().zip(a).zip(b) {
        *r = a + b;
    }
}

/// `r[i] = a[i] - b[i]` for every cell.
#[inline]
pub fn sub_into(a: &[f64], b: &[f64], r: &mut [f64]) {
    debug_assert!(a.len() == b.len() && a.len() == r.len());
    for ((r, a), b) in r.iter_mut().zip(a).zip(b) {
        *r = a - b;
    }
}

/// Sum of two same-dimension matrices.
///
/// # Panics
///
/// Panics if the dimensions differ.
#[must_use]
pub fn add(a: &Matrix, b: &Matrix) -> Matrix {
    assert_eq!(a.dim(), b.dim(), "add requires equal dimensions");
    let mut r = Matrix::zeros(a.dim());
    add_into(a.as_slice(), b.as_slice(), r.as_mut_slice());
    r
}

/// Difference of two same-dimension matrices.
///
/// # Panics
///
/// Panics if the dimensions differ.
#[must_use]
pub fn sub(a: &Matrix, b: &Matrix) -> Matrix {
    assert_eq!(a.dim(), b.dim(), "sub requires equal dimensions");
    let mut r = Matrix::zeros(a.dim());
    sub_into(a.as_slice(), b.as_slice(), r.as_mut_slice());
    r
}
