//! Integration test verifying that the Strassen engine's frame arenas and
//! padded-operand pool are active.

use matcalc_core::constants::FRAME_BUFFERS;
use matcalc_core::matrix::Matrix;
use matcalc_core::strassen::{StrassenConfig, StrassenEngine};
use matcalc_memory::{AllocationStats, BufferPool, FrameArena};

fn ramp(n: usize) -> Matrix {
    let data = (0..n * n).map(|i| (i % 13) as f64).collect();
    Matrix::from_vec(n, data).unwrap()
}

#[test]
fn strassen_records_one_frame_per_split() {
    let engine = StrassenEngine::new(StrassenConfig::with_threshold(16));
    engine.multiply(&ramp(64), &ramp(64)).unwrap();

    // 64 -> 32 -> 16: one root frame plus seven children
    let stats: AllocationStats = engine.stats();
    assert_eq!(stats.frames, 8);
    assert_eq!(stats.max_depth, 1);
    assert_eq!(stats.buffers, 8 * FRAME_BUFFERS as u64);
    let root_bytes = (32 * 32 * FRAME_BUFFERS * 8) as u64;
    let child_bytes = (16 * 16 * FRAME_BUFFERS * 8) as u64;
    assert_eq!(stats.peak_frame_bytes, root_bytes);
    assert_eq!(stats.bytes, root_bytes + 7 * child_bytes);
}

#[test]
fn padded_operands_come_back_to_the_pool() {
    let engine = StrassenEngine::new(StrassenConfig::with_threshold(8));
    for _ in 0..4 {
        engine.multiply(&ramp(50), &ramp(50)).unwrap();
    }
    let pool = engine.pool_stats();
    assert_eq!(pool.misses, 3);
    assert_eq!(pool.hits, 9);
    assert_eq!(pool.evictions, 0);
}

#[test]
fn frame_arena_holds_a_whole_frame() {
    let len = 32 * 32;
    let arena = FrameArena::for_frame(len, FRAME_BUFFERS);
    let before = arena.allocated_bytes();
    let buffers: Vec<&mut [f64]> = (0..FRAME_BUFFERS).map(|_| arena.alloc_buffer(len)).collect();
    assert!(buffers.iter().all(|b| b.len() == len && b.iter().all(|&v| v == 0.0)));
    // sized up front, so carving the frame does not grow the arena
    assert_eq!(arena.allocated_bytes(), before);
}

#[test]
fn pool_shared_size_class() {
    let pool = BufferPool::default();
    let buf = pool.acquire(100);
    assert_eq!(buf.len(), 100);
    pool.release(buf);
    let again = pool.acquire(120);
    assert_eq!(again.len(), 120);
    assert!(again.iter().all(|&v| v == 0.0));
    assert_eq!(pool.stats().hits, 1);
}
