//! Strassen's divide-and-conquer multiplication.
//!
//! The public entry pads both operands to the next power of two, recurses on
//! quadrants until a frame reaches the threshold, hands leaves to the base
//! kernel and finally extracts the caller's shape from the padded result.
//!
//! Every frame carves its quadrants, product terms and scratch buffers out of
//! one bump arena sized up front; the arena is dropped when the frame returns,
//! so at most one arena per recursion level is alive in sequential mode.

use std::mem::size_of;

use matcalc_memory::{AllocationStats, AtomicAllocationStats, BufferPool, FrameArena, PoolStats};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algebra::{add_into, sub_into};
use crate::constants::{
    DEFAULT_PARALLEL_THRESHOLD, DEFAULT_STRASSEN_THRESHOLD, FRAME_BUFFERS, PARALLEL_FRAME_BUFFERS,
};
use crate::error::MatError;
use crate::kernel::BaseKernel;
use crate::matrix::Matrix;
use crate::options::Options;
use crate::padding::{next_power_of_two, pad_into, unpad_into};
use crate::progress::CancellationToken;

/// Configuration of the Strassen engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrassenConfig {
    /// Frames of this size or smaller go straight to the base kernel.
    pub threshold: usize,
    /// Kernel used at the leaves.
    pub kernel: BaseKernel,
    /// Evaluate the seven products of large frames concurrently.
    pub parallel: bool,
    /// Smallest frame size evaluated concurrently when `parallel` is set.
    pub parallel_threshold: usize,
}

impl Default for StrassenConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_STRASSEN_THRESHOLD,
            kernel: BaseKernel::default(),
            parallel: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl StrassenConfig {
    /// Configuration with the given threshold and defaults elsewhere.
    #[must_use]
    pub fn with_threshold(threshold: usize) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    fn normalized(mut self) -> Self {
        if self.threshold == 0 {
            self.threshold = DEFAULT_STRASSEN_THRESHOLD;
        }
        if self.parallel_threshold == 0 {
            self.parallel_threshold = DEFAULT_PARALLEL_THRESHOLD;
        }
        self
    }
}

impl From<&Options> for StrassenConfig {
    fn from(opts: &Options) -> Self {
        Self {
            threshold: opts.strassen_threshold,
            kernel: opts.kernel,
            parallel: opts.parallel,
            parallel_threshold: opts.parallel_threshold,
        }
        .normalized()
    }
}

/// Number of recursion levels that split before reaching the threshold.
#[must_use]
pub fn recursion_depth(padded: usize, threshold: usize) -> u32 {
    let threshold = threshold.max(1);
    let mut size = padded;
    let mut depth = 0;
    while size > threshold {
        size /= 2;
        depth += 1;
    }
    depth
}

/// Strassen engine with reusable padded buffers and allocation statistics.
pub struct StrassenEngine {
    config: StrassenConfig,
    pool: BufferPool,
    stats: AtomicAllocationStats,
}

impl StrassenEngine {
    /// Create an engine; zero thresholds fall back to the defaults.
    #[must_use]
    pub fn new(config: StrassenConfig) -> Self {
        Self {
            config: config.normalized(),
            pool: BufferPool::default(),
            stats: AtomicAllocationStats::new(),
        }
    }

    /// Create a sequential engine with the given base-case threshold.
    #[must_use]
    pub fn with_threshold(threshold: usize) -> Self {
        Self::new(StrassenConfig::with_threshold(threshold))
    }

    /// The effective configuration.
    #[must_use]
    pub fn config(&self) -> &StrassenConfig {
        &self.config
    }

    /// Multiply two square matrices of equal dimension.
    pub fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatError> {
        self.multiply_with_cancel(a, b, &CancellationToken::new())
    }

    /// Multiply, checking `cancel` at every recursion frame.
    pub fn multiply_with_cancel(
        &self,
        a: &Matrix,
        b: &Matrix,
        cancel: &CancellationToken,
    ) -> Result<Matrix, MatError> {
        if a.dim() != b.dim() {
            return Err(MatError::DimensionMismatch {
                left: a.dim(),
                right: b.dim(),
            });
        }
        let n = a.dim();
        let s = next_power_of_two(n);
        debug!(
            n,
            padded = s,
            threshold = self.config.threshold,
            depth = recursion_depth(s, self.config.threshold),
            parallel = self.config.parallel,
            "strassen multiply"
        );

        let len = s * s;
        let mut a_pad = self.pool.acquire(len);
        let mut b_pad = self.pool.acquire(len);
        let mut c_pad = self.pool.acquire(len);
        pad_into(a.as_slice(), n, &mut a_pad, s);
        pad_into(b.as_slice(), n, &mut b_pad, s);

        let recursion = Recursion {
            config: &self.config,
            stats: &self.stats,
            cancel,
        };
        let result = recursion.run(&a_pad, &b_pad, &mut c_pad, s, 0).map(|()| {
            let mut c = Matrix::zeros(n);
            unpad_into(&c_pad, s, c.as_mut_slice(), n, n);
            c
        });

        self.pool.release(a_pad);
        self.pool.release(b_pad);
        self.pool.release(c_pad);
        result
    }

    /// Frame allocation statistics accumulated since the engine was created.
    #[must_use]
    pub fn stats(&self) -> AllocationStats {
        self.stats.snapshot()
    }

    /// Reuse statistics of the padded-operand pool.
    #[must_use]
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }
}

impl Default for StrassenEngine {
    fn default() -> Self {
        Self::new(StrassenConfig::default())
    }
}

/// Multiply two square matrices with the default engine configuration.
pub fn strassen(a: &Matrix, b: &Matrix) -> Result<Matrix, MatError> {
    StrassenEngine::default().multiply(a, b)
}

/// Recursive step on already padded `size x size` buffers (`size` a power of two).
///
/// Writes `x * y` into `out`. Performs no validation beyond debug assertions.
pub fn strassen_recursive(
    x: &[f64],
    y: &[f64],
    out: &mut [f64],
    size: usize,
    config: &StrassenConfig,
    cancel: &CancellationToken,
) -> Result<(), MatError> {
    debug_assert!(size.is_power_of_two());
    let config = config.normalized();
    let stats = AtomicAllocationStats::new();
    Recursion {
        config: &config,
        stats: &stats,
        cancel,
    }
    .run(x, y, out, size, 0)
}

/// Shared, read-only state of one top-level multiplication.
struct Recursion<'a> {
    config: &'a StrassenConfig,
    stats: &'a AtomicAllocationStats,
    cancel: &'a CancellationToken,
}

impl Recursion<'_> {
    fn run(
        &self,
        x: &[f64],
        y: &[f64],
        out: &mut [f64],
        size: usize,
        depth: u64,
    ) -> Result<(), MatError> {
        debug_assert!(x.len() == size * size && y.len() == size * size && out.len() == size * size);
        self.cancel.check_cancelled()?;

        if size <= self.config.threshold {
            self.config.kernel.multiply_into(x, y, out, size);
            return Ok(());
        }

        if self.config.parallel && size >= self.config.parallel_threshold {
            self.run_parallel(x, y, out, size, depth)
        } else {
            self.run_sequential(x, y, out, size, depth)
        }
    }

    fn record_frame(&self, depth: u64, len: usize, buffers: usize) {
        let bytes = len * buffers * size_of::<f64>();
        self.stats.record_frame(depth, buffers as u64, bytes as u64);
    }

    /// One frame, products computed one after another through two scratch buffers.
    fn run_sequential(
        &self,
        x: &[f64],
        y: &[f64],
        out: &mut [f64],
        size: usize,
        depth: u64,
    ) -> Result<(), MatError> {
        let mid = size / 2;
        let len = mid * mid;
        let arena = FrameArena::for_frame(len, FRAME_BUFFERS);
        self.record_frame(depth, len, FRAME_BUFFERS);

        let [x11, x12, x21, x22] = split(&arena, x, size);
        let [y11, y12, y21, y22] = split(&arena, y, size);
        let [m1, m2, m3, m4, m5, m6, m7]: [&mut [f64]; 7] =
            std::array::from_fn(|_| arena.alloc_buffer(len));
        let t1 = arena.alloc_buffer(len);
        let t2 = arena.alloc_buffer(len);
        let q = arena.alloc_buffer(len);
        let d = depth + 1;

        // M1 = (X11 + X22)(Y11 + Y22)
        add_into(x11, x22, t1);
        add_into(y11, y22, t2);
        self.run(t1, t2, m1, mid, d)?;

        // M2 = (X21 + X22) Y11
        add_into(x21, x22, t1);
        self.run(t1, y11, m2, mid, d)?;

        // M3 = X11 (Y12 - Y22)
        sub_into(y12, y22, t2);
        self.run(x11, t2, m3, mid, d)?;

        // M4 = X22 (Y21 - Y11)
        sub_into(y21, y11, t2);
        self.run(x22, t2, m4, mid, d)?;

        // M5 = (X11 + X12) Y22
        add_into(x11, x12, t1);
        self.run(t1, y22, m5, mid, d)?;

        // M6 = (X21 - X11)(Y11 + Y12)
        sub_into(x21, x11, t1);
        add_into(y11, y12, t2);
        self.run(t1, t2, m6, mid, d)?;

        // M7 = (X12 - X22)(Y21 + Y22)
        sub_into(x12, x22, t1);
        add_into(y21, y22, t2);
        self.run(t1, t2, m7, mid, d)?;

        combine([&*m1, &*m2, &*m3, &*m4, &*m5, &*m6, &*m7], t1, t2, q, out, size);
        Ok(())
    }

    /// One frame, the seven products evaluated concurrently with nested `rayon::join`.
    ///
    /// Each product reads its own operand buffers, so siblings share nothing mutable.
    fn run_parallel(
        &self,
        x: &[f64],
        y: &[f64],
        out: &mut [f64],
        size: usize,
        depth: u64,
    ) -> Result<(), MatError> {
        let mid = size / 2;
        let len = mid * mid;
        let arena = FrameArena::for_frame(len, PARALLEL_FRAME_BUFFERS);
        self.record_frame(depth, len, PARALLEL_FRAME_BUFFERS);

        let [x11, x12, x21, x22] = split(&arena, x, size);
        let [y11, y12, y21, y22] = split(&arena, y, size);

        let a1 = combined(&arena, x11, x22, add_into);
        let b1 = combined(&arena, y11, y22, add_into);
        let a2 = combined(&arena, x21, x22, add_into);
        let b3 = combined(&arena, y12, y22, sub_into);
        let b4 = combined(&arena, y21, y11, sub_into);
        let a5 = combined(&arena, x11, x12, add_into);
        let a6 = combined(&arena, x21, x11, sub_into);
        let b6 = combined(&arena, y11, y12, add_into);
        let a7 = combined(&arena, x12, x22, sub_into);
        let b7 = combined(&arena, y21, y22, add_into);

        let [m1, m2, m3, m4, m5, m6, m7]: [&mut [f64]; 7] =
            std::array::from_fn(|_| arena.alloc_buffer(len));
        let t1 = arena.alloc_buffer(len);
        let t2 = arena.alloc_buffer(len);
        let q = arena.alloc_buffer(len);
        let d = depth + 1;

        let ((r1, r2), ((r3, r4), (r5, (r6, r7)))) = rayon::join(
            || {
                rayon::join(
                    || self.run(a1, b1, m1, mid, d),
                    || self.run(a2, y11, m2, mid, d),
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || self.run(x11, b3, m3, mid, d),
                            || self.run(x22, b4, m4, mid, d),
                        )
                    },
                    || {
                        rayon::join(
                            || self.run(a5, y22, m5, mid, d),
                            || {
                                rayon::join(
                                    || self.run(a6, b6, m6, mid, d),
                                    || self.run(a7, b7, m7, mid, d),
                                )
                            },
                        )
                    },
                )
            },
        );
        r1?;
        r2?;
        r3?;
        r4?;
        r5?;
        r6?;
        r7?;

        combine([&*m1, &*m2, &*m3, &*m4, &*m5, &*m6, &*m7], t1, t2, q, out, size);
        Ok(())
    }
}

/// Copy the four quadrants of the `size x size` buffer `src` into fresh arena buffers.
fn split<'a>(arena: &'a FrameArena, src: &[f64], size: usize) -> [&'a [f64]; 4] {
    let mid = size / 2;
    let len = mid * mid;
    let q11 = arena.alloc_buffer(len);
    let q12 = arena.alloc_buffer(len);
    let q21 = arena.alloc_buffer(len);
    let q22 = arena.alloc_buffer(len);
    for i in 0..mid {
        let top = &src[i * size..(i + 1) * size];
        let bottom = &src[(i + mid) * size..(i + mid + 1) * size];
        let row = i * mid..(i + 1) * mid;
        q11[row.clone()].copy_from_slice(&top[..mid]);
        q12[row.clone()].copy_from_slice(&top[mid..]);
        q21[row.clone()].copy_from_slice(&bottom[..mid]);
        q22[row].copy_from_slice(&bottom[mid..]);
    }
    [&*q11, &*q12, &*q21, &*q22]
}

/// Allocate a buffer holding `op(a, b)`.
fn combined<'a>(
    arena: &'a FrameArena,
    a: &[f64],
    b: &[f64],
    op: fn(&[f64], &[f64], &mut [f64]),
) -> &'a [f64] {
    let r = arena.alloc_buffer(a.len());
    op(a, b, r);
    r
}

/// Build the four result quadrants from the products and write them into `out`.
fn combine(
    m: [&[f64]; 7],
    t1: &mut [f64],
    t2: &mut [f64],
    q: &mut [f64],
    out: &mut [f64],
    size: usize,
) {
    let [m1, m2, m3, m4, m5, m6, m7] = m;
    let mid = size / 2;

    // C11 = M1 + M4 - M5 + M7
    add_into(m1, m4, t1);
    sub_into(t1, m5, t2);
    add_into(t2, m7, q);
    join_quadrant(out, size, q, 0, 0);

    // C12 = M3 + M5
    add_into(m3, m5, q);
    join_quadrant(out, size, q, 0, mid);

    // C21 = M2 + M4
    add_into(m2, m4, q);
    join_quadrant(out, size, q, mid, 0);

    // C22 = (M1 - M2) + M3 + M6
    sub_into(m1, m2, t1);
    add_into(t1, m3, t2);
    add_into(t2, m6, q);
    join_quadrant(out, size, q, mid, mid);
}

/// Write a `mid x mid` quadrant into `dst` at the given row/column offsets.
fn join_quadrant(dst: &mut [f64], size: usize, quadrant: &[f64], row_off: usize, col_off: usize) {
    let mid = size / 2;
    for (i, src_row) in quadrant.chunks_exact(mid).enumerate() {
        let start = (row_off + i) * size + col_off;
        dst[start..start + mid].copy_from_slice(src_row);
    }
}
