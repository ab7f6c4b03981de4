//! Pool of `f64` buffers with power-of-two size classes.
//!
//! Padded operands are always `s * s` doubles with `s` a power of two, so
//! repeated multiplications of the same size land in the same class.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::stats::{AtomicPoolStats, PoolStats};

/// Pool for reusable `Vec<f64>` buffers, organized by size class.
pub struct BufferPool {
    pools: Mutex<HashMap<usize, Vec<Vec<f64>>>>,
    max_len: usize,
    max_per_class: usize,
    stats: AtomicPoolStats,
}

impl BufferPool {
    /// Create a new pool.
    #[must_use]
    pub fn new(max_len: usize, max_per_class: usize) -> Self {
        Self {
            pools: Mutex::new(HashMap::new()),
            max_len,
            max_per_class,
            stats: AtomicPoolStats::new(),
        }
    }

    /// Get a zero-filled buffer of exactly `len` elements, reusing a pooled one if possible.
    pub fn acquire(&self, len: usize) -> Vec<f64> {
        let class = Self::size_class(len);
        let reused = self.pools.lock().get_mut(&class).and_then(Vec::pop);
        if let Some(mut buf) = reused {
            self.stats.record_hit();
            buf.clear();
            buf.resize(len, 0.0);
            return buf;
        }
        self.stats.record_miss();
        let mut buf = Vec::with_capacity(class);
        buf.resize(len, 0.0);
        buf
    }

    /// Return a buffer to the pool.
    pub fn release(&self, buf: Vec<f64>) {
        let capacity = buf.capacity();
        if capacity == 0 || capacity > self.max_len {
            self.stats.record_eviction();
            return;
        }

        // A buffer serves every class up to its capacity.
        let class = Self::floor_class(capacity);
        let mut pools = self.pools.lock();
        let pool = pools.entry(class).or_default();
        if pool.len() < self.max_per_class {
            pool.push(buf);
        } else {
            self.stats.record_eviction();
        }
    }

    /// Size class for a request: next power of two.
    fn size_class(len: usize) -> usize {
        len.max(1).next_power_of_two()
    }

    /// Largest class a buffer of `capacity` elements can satisfy.
    fn floor_class(capacity: usize) -> usize {
        if capacity.is_power_of_two() {
            capacity
        } else {
            capacity.next_power_of_two() / 2
        }
    }

    /// Get a snapshot of pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }
}

impl Default for BufferPool {
    /// Buffers up to 4096 x 4096 doubles, three per class (A', B', C').
    fn default() -> Self {
        Self::new(4096 * 4096, 3)
    }
}
