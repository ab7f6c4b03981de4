//! # matcalc-memory
//!
//! Memory management for the `MatCalc` workspace.
//!
//! Provides bump arenas scoped to one Strassen recursion frame, a size-classed
//! pool of `f64` buffers for padded operands, and lock-free allocation counters.
#![warn(missing_docs)]

pub mod arena;
pub mod pool;
pub mod stats;

pub use arena::FrameArena;
pub use pool::BufferPool;
pub use stats::{AllocationStats, AtomicAllocationStats, AtomicPoolStats, PoolStats};
