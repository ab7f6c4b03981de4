//! Atomic statistics for lock-free usage tracking.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for buffer pool usage.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of cache hits (acquired from pool).
    pub hits: u64,
    /// Number of cache misses (allocated new).
    pub misses: u64,
    /// Number of evictions (too large or pool full).
    pub evictions: u64,
}

/// Atomic pool statistics for lock-free updates.
pub struct AtomicPoolStats {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl AtomicPoolStats {
    /// Create new zeroed stats.
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Take a snapshot of current stats.
    pub fn snapshot(&self) -> PoolStats {
        PoolStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Increment hit counter.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment miss counter.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment eviction counter.
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for AtomicPoolStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of recursion-frame allocation activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationStats {
    /// Number of recursion frames that split into quadrants.
    pub frames: u64,
    /// Number of temporary buffers handed out by frame arenas.
    pub buffers: u64,
    /// Total bytes reserved by frame arenas.
    pub bytes: u64,
    /// Largest arena reserved by a single frame, in bytes.
    pub peak_frame_bytes: u64,
    /// Deepest recursion level that split (0 = top-level frame).
    pub max_depth: u64,
}

/// Atomic frame allocation counters, shareable across worker threads.
pub struct AtomicAllocationStats {
    frames: AtomicU64,
    buffers: AtomicU64,
    bytes: AtomicU64,
    peak_frame_bytes: AtomicU64,
    max_depth: AtomicU64,
}

impl AtomicAllocationStats {
    /// Create new zeroed stats.
    pub fn new() -> Self {
        Self {
            frames: AtomicU64::new(0),
            buffers: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            peak_frame_bytes: AtomicU64::new(0),
            max_depth: AtomicU64::new(0),
        }
    }

    /// Record one frame that reserved `bytes` for `buffers` temporaries at `depth`.
    pub fn record_frame(&self, depth: u64, buffers: u64, bytes: u64) {
        self.frames.fetch_add(1, Ordering::Relaxed);
        self.buffers.fetch_add(buffers, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
        self.peak_frame_bytes.fetch_max(bytes, Ordering::Relaxed);
        self.max_depth.fetch_max(depth, Ordering::Relaxed);
    }

    /// Take a snapshot of current stats.
    pub fn snapshot(&self) -> AllocationStats {
        AllocationStats {
            frames: self.frames.load(Ordering::Relaxed),
            buffers: self.buffers.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
            peak_frame_bytes: self.peak_frame_bytes.load(Ordering::Relaxed),
            max_depth: self.max_depth.load(Ordering::Relaxed),
        }
    }
}

impl Default for AtomicAllocationStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stats_are_zeroed() {
        let stats = AtomicPoolStats::new();
        let snap = stats.snapshot();
        assert_eq!(snap.hits, 0);
        assert_eq!(snap.misses, 0);
        assert_eq!(snap.evictions, 0);
    }

    #[test]
    fn record_and_snapshot() {
        let stats = AtomicPoolStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        stats.record_eviction();
        let snap = stats.snapshot();
        assert_eq!(snap.hits, 2);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.evictions, 1);
    }

    #[test]
    fn frame_stats_track_peak_and_depth() {
        let stats = AtomicAllocationStats::new();
        stats.record_frame(0, 18, 4096);
        stats.record_frame(1, 18, 1024);
        stats.record_frame(2, 18, 256);
        let snap = stats.snapshot();
        assert_eq!(snap.frames, 3);
        assert_eq!(snap.buffers, 54);
        assert_eq!(snap.bytes, 4096 + 1024 + 256);
        assert_eq!(snap.peak_frame_bytes, 4096);
        assert_eq!(snap.max_depth, 2);
    }

    #[test]
    fn new_frame_stats_are_zeroed() {
        let stats = AtomicAllocationStats::new();
        assert_eq!(stats.snapshot(), AllocationStats::default());
    }
}
