//! Correctness oracle for comparing strategy outputs.
//!
//! None of the engines call into this module; the benchmark harness and the
//! tests use it to check a result against the naive reference.

use crate::matrix::Matrix;

/// True iff every cell satisfies `|a - b| <= tol`. False when dimensions differ.
#[must_use]
pub fn equal_within(a: &Matrix, b: &Matrix, tol: f64) -> bool {
    a.dim() == b.dim()
        && a
            .as_slice()
            .iter()
            .zip(b.as_slice())
            .all(|(x, y)| (x - y).abs() <= tol)
}

/// Largest absolute cell difference, or `None` if dimensions differ.
#[must_use]
pub fn max_abs_diff(a: &Matrix, b: &Matrix) -> Option<f64> {
    if a.dim() != b.dim() {
        return None;
    }
    Some(
        a.as_slice()
            .iter()
            .zip(b.as_slice())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max),
    )
}

/// Tolerance scaled by the magnitude of `reference`.
///
/// Cells agree when `|a - reference| <= rel_tol * max(1, max|reference|)`.
#[must_use]
pub fn equal_within_relative(a: &Matrix, reference: &Matrix, rel_tol: f64) -> bool {
    let scale = reference
        .as_slice()
        .iter()
        .fold(1.0_f64, |acc, x| acc.max(x.abs()));
    equal_within(a, reference, rel_tol * scale)
}
