//! Embedding matrices into power-of-two buffers and extracting results back.

use crate::matrix::Matrix;

/// Smallest power of two `>= x`; `1` for `x <= 1`.
#[must_use]
pub fn next_power_of_two(x: usize) -> usize {
    if x <= 1 {
        1
    } else {
        x.next_power_of_two()
    }
}

/// Zero `dst` (`new_s x new_s`) and copy the `old_n x old_n` matrix `src` into its top-left corner.
pub fn pad_into(src: &[f64], old_n: usize, dst: &mut [f64], new_s: usize) {
    assert!(new_s >= old_n, "padded size {new_s} smaller than {old_n}");
    debug_assert!(src.len() == old_n * old_n && dst.len() == new_s * new_s);
    dst.fill(0.0);
    for (src_row, dst_row) in src.chunks_exact(old_n).zip(dst.chunks_exact_mut(new_s)) {
        dst_row[..old_n].copy_from_slice(src_row);
    }
}

/// Copy the top-left `rows x cols` block of the `s x s` buffer `src` into `dst`
/// (row-major, `cols` wide).
pub fn unpad_into(src: &[f64], s: usize, dst: &mut [f64], rows: usize, cols: usize) {
    assert!(rows <= s && cols <= s, "unpad {rows}x{cols} exceeds {s}x{s}");
    debug_assert!(src.len() == s * s && dst.len() == rows * cols);
    for (src_row, dst_row) in src.chunks_exact(s).zip(dst.chunks_exact_mut(cols)).take(rows) {
        dst_row.copy_from_slice(&src_row[..cols]);
    }
}

/// Pad `m` to `new_s x new_s` with zero margins.
#[must_use]
pub fn pad(m: &Matrix, new_s: usize) -> Matrix {
    let mut p = Matrix::zeros(new_s);
    pad_into(m.as_slice(), m.dim(), p.as_mut_slice(), new_s);
    p
}

/// Extract the top-left `n x n` block of `p`.
#[must_use]
pub fn unpad(p: &Matrix, n: usize) -> Matrix {
    let mut r = Matrix::zeros(n);
    unpad_into(p.as_slice(), p.dim(), r.as_mut_slice(), n, n);
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_power_of_two_values() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(2), 2);
        assert_eq!(next_power_of_two(3), 4);
        assert_eq!(next_power_of_two(64), 64);
        assert_eq!(next_power_of_two(65), 128);
        assert_eq!(next_power_of_two(70), 128);
    }

    #[test]
    fn pad_fills_margin_with_zeros() {
        let m = Matrix::from_rows(&[
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ])
        .unwrap();
        let p = pad(&m, 4);
        assert_eq!(p.dim(), 4);
        assert_eq!(p.row(0), &[1.0, 2.0, 3.0, 0.0]);
        assert_eq!(p.row(2), &[7.0, 8.0, 9.0, 0.0]);
        assert_eq!(p.row(3), &[0.0; 4]);
    }

    #[test]
    fn pad_into_clears_stale_contents() {
        let mut dst = vec![5.0; 16];
        pad_into(&[1.0], 1, &mut dst, 4);
        assert_eq!(dst[0], 1.0);
        assert!(dst[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn round_trip_is_exact() {
        for n in 1..=17 {
            let data: Vec<f64> = (0..n * n).map(|i| i as f64 * 0.5 - 3.0).collect();
            let m = Matrix::from_vec(n, data).unwrap();
            let back = unpad(&pad(&m, next_power_of_two(n)), n);
            assert_eq!(back, m, "round trip failed at n={n}");
        }
    }

    #[test]
    fn unpad_rectangular_block() {
        let src: Vec<f64> = (0..16).map(f64::from).collect();
        let mut dst = vec![0.0; 6];
        unpad_into(&src, 4, &mut dst, 2, 3);
        assert_eq!(dst, vec![0.0, 1.0, 2.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    #[should_panic(expected = "smaller than")]
    fn pad_rejects_shrinking() {
        let _ = pad(&Matrix::zeros(5), 4);
    }
}
