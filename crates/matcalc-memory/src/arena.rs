//! Bump arena for the temporaries of one recursion frame.
//!
//! Every quadrant, product term and scratch buffer of a frame is carved out of
//! a single bumpalo chunk and released in bulk when the arena is dropped.

use std::mem::size_of;

use bumpalo::Bump;

/// Frame-scoped bump arena handing out zero-filled `f64` buffers.
pub struct FrameArena {
    bump: Bump,
}

impl FrameArena {
    /// Create a new arena with the given initial capacity in bytes.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bump: Bump::with_capacity(bytes),
        }
    }

    /// Create an arena large enough for `buffers` buffers of `len` elements,
    /// so a frame never needs a second chunk.
    #[must_use]
    pub fn for_frame(len: usize, buffers: usize) -> Self {
        Self::with_capacity(len * buffers * size_of::<f64>())
    }

    /// Allocate a zero-filled buffer of `len` doubles.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_buffer(&self, len: usize) -> &mut [f64] {
        self.bump.alloc_slice_fill_copy(len, 0.0)
    }

    /// Get the number of bytes currently held by the arena's chunks.
    #[must_use]
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}
