//! Memory budget estimation and validation.

use std::mem::size_of;

use crate::constants::{FRAME_BUFFERS, PARALLEL_FRAME_BUFFERS};
use crate::padding::next_power_of_two;
use crate::strassen::StrassenConfig;

/// Memory estimate for one multiplication of `n x n` operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryEstimate {
    /// Inputs plus output at the caller's dimension (in bytes).
    pub operand_bytes: usize,
    /// Padded copies of both inputs and the output (in bytes).
    pub padded_bytes: usize,
    /// Frame arenas alive at the deepest point of the recursion (in bytes).
    pub frame_bytes: usize,
    /// Total estimated memory (in bytes).
    pub total_bytes: usize,
}

impl MemoryEstimate {
    /// Estimate for a direct (naive or blocked) multiplication.
    #[must_use]
    pub fn direct(n: usize) -> Self {
        let operand_bytes = 3 * n * n * size_of::<f64>();
        Self {
            operand_bytes,
            padded_bytes: 0,
            frame_bytes: 0,
            total_bytes: operand_bytes,
        }
    }

    /// Estimate for the Strassen engine under `config`.
    ///
    /// Sequential frames along one root-to-leaf path are alive together.
    /// Parallel frames multiply that by the seven siblings running at once.
    #[must_use]
    pub fn strassen(n: usize, config: &StrassenConfig) -> Self {
        let operand_bytes = 3 * n * n * size_of::<f64>();
        let s = next_power_of_two(n);
        let padded_bytes = 3 * s * s * size_of::<f64>();

        let threshold = config.threshold.max(1);
        let mut frame_bytes = 0usize;
        let mut live_frames = 1usize;
        let mut size = s;
        while size > threshold {
            let mid = size / 2;
            let parallel = config.parallel && size >= config.parallel_threshold;
            let buffers = if parallel {
                PARALLEL_FRAME_BUFFERS
            } else {
                FRAME_BUFFERS
            };
            frame_bytes += live_frames * buffers * mid * mid * size_of::<f64>();
            if parallel {
                live_frames *= 7;
            }
            size = mid;
        }

        Self {
            operand_bytes,
            padded_bytes,
            frame_bytes,
            total_bytes: operand_bytes + padded_bytes + frame_bytes,
        }
    }

    /// Check if the computation fits within the given memory limit.
    ///
    /// `None` means unlimited (always fits).
    #[must_use]
    pub fn fits_in(&self, limit: Option<usize>) -> bool {
        match limit {
            None => true,
            Some(l) => self.total_bytes <= l,
        }
    }
}

/// Parse a memory limit string (e.g., "8G", "512M", "1024K").
///
/// # Errors
///
/// Returns an error string if the format is invalid or the number cannot be parsed.
pub fn parse_memory_limit(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix(['G', 'g']) {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix(['M', 'm']) {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix(['K', 'k']) {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('B') {
        (n, 1)
    } else {
        (s, 1)
    };

    let value: usize = num_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid memory limit '{s}': {e}"))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("memory limit '{s}' overflows"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_counts_three_operands() {
        let est = MemoryEstimate::direct(100);
        assert_eq!(est.total_bytes, 3 * 100 * 100 * 8);
        assert_eq!(est.frame_bytes, 0);
    }

    #[test]
    fn strassen_below_threshold_has_no_frames() {
        let est = MemoryEstimate::strassen(50, &StrassenConfig::with_threshold(64));
        assert_eq!(est.padded_bytes, 3 * 64 * 64 * 8);
        assert_eq!(est.frame_bytes, 0);
    }

    #[test]
    fn strassen_sums_levels_on_one_path() {
        let est = MemoryEstimate::strassen(256, &StrassenConfig::with_threshold(64));
        // frames at 256 (mid 128) and 128 (mid 64)
        let expected = FRAME_BUFFERS * (128 * 128 + 64 * 64) * 8;
        assert_eq!(est.frame_bytes, expected);
        assert_eq!(
            est.total_bytes,
            est.operand_bytes + est.padded_bytes + est.frame_bytes
        );
    }

    #[test]
    fn parallel_estimate_is_larger() {
        let sequential = StrassenConfig::with_threshold(64);
        let parallel = StrassenConfig {
            parallel: true,
            parallel_threshold: 128,
            ..sequential
        };
        let seq = MemoryEstimate::strassen(512, &sequential);
        let par = MemoryEstimate::strassen(512, &parallel);
        assert!(par.total_bytes > seq.total_bytes);
    }

    #[test]
    fn fits_in_limits() {
        let est = MemoryEstimate::direct(10);
        assert!(est.fits_in(None));
        assert!(est.fits_in(Some(est.total_bytes)));
        assert!(!est.fits_in(Some(est.total_bytes - 1)));
    }

    #[test]
    fn parse_memory_limit_values() {
        assert_eq!(parse_memory_limit("8G").unwrap(), 8 * 1024 * 1024 * 1024);
        assert_eq!(parse_memory_limit("512M").unwrap(), 512 * 1024 * 1024);
        assert_eq!(parse_memory_limit("512m").unwrap(), 512 * 1024 * 1024);
        assert_eq!(parse_memory_limit("1024K").unwrap(), 1024 * 1024);
        assert_eq!(parse_memory_limit("100B").unwrap(), 100);
        assert_eq!(parse_memory_limit("").unwrap(), 0);
    }

    #[test]
    fn parse_memory_limit_invalid() {
        assert!(parse_memory_limit("abc").is_err());
        assert!(parse_memory_limit("-5M").is_err());
    }
}
