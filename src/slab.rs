use std::alloc::{self, Layout};
use std::mem;
use std::ptr::NonNull;

use crate::error::QueueInitError;

/// A fixed backing buffer of `max_depth` message slots.
///
/// One contiguous heap allocation, obtained once from the system allocator
/// and released on `Drop`. This is a plain `Layout`-aligned allocation,
/// not a `memfd`/`mmap` region — producers and consumers share one
/// process, so there's no need for the shared-memory machinery
/// cross-process IPC would require.
pub struct Slab {
    ptr: NonNull<u8>,
    layout: Layout,
    message_size: usize,
    max_depth: usize,
}

// SAFETY: slots are handed out one at a time under the Allocator/Queue
// handshake protocol, so concurrent access to *disjoint* slots from
// different threads is always disjoint memory.
unsafe impl Send for Slab {}
unsafe impl Sync for Slab {}

impl Slab {
    /// Rounds `message_size` up so a slot's base address is suitably
    /// aligned for any primitive scalar, then carves `max_depth` of them
    /// out of one allocation.
    pub fn new(message_size: usize, max_depth: usize) -> Result<Self, QueueInitError> {
        if message_size == 0 || max_depth == 0 {
            return Err(QueueInitError::InvalidConfig);
        }

        let align = mem::align_of::<u128>();
        let padded_size = (message_size + align - 1) & !(align - 1);
        let total = padded_size
            .checked_mul(max_depth)
            .ok_or(QueueInitError::InvalidConfig)?;

        let layout =
            Layout::from_size_align(total, align).map_err(|_| QueueInitError::InvalidConfig)?;

        // SAFETY: `total` is non-zero since message_size and max_depth are
        // both non-zero above.
        let raw = unsafe { alloc::alloc(layout) };
        let ptr = NonNull::new(raw).ok_or(QueueInitError::Allocation(total))?;

        Ok(Self {
            ptr,
            layout,
            message_size: padded_size,
            max_depth,
        })
    }

    /// Padded per-slot size in bytes.
    pub fn message_size(&self) -> usize {
        self.message_size
    }

    /// Requested logical capacity.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Exclusive view of slot `index`'s bytes.
    ///
    /// `index` must be `< max_depth`; the caller must hold exclusive
    /// ownership of this slot per the Allocator/Queue handoff protocol —
    /// the Slab itself performs no locking.
    pub fn slot_mut(&self, index: usize) -> &mut [u8] {
        debug_assert!(index < self.max_depth, "slot index out of bounds");
        let base = unsafe { self.ptr.as_ptr().add(index * self.message_size) };
        unsafe { std::slice::from_raw_parts_mut(base, self.message_size) }
    }

    /// Shared view of slot `index`'s bytes.
    pub fn slot(&self, index: usize) -> &[u8] {
        debug_assert!(index < self.max_depth, "slot index out of bounds");
        let base = unsafe { self.ptr.as_ptr().add(index * self.message_size) };
        unsafe { std::slice::from_raw_parts(base, self.message_size) }
    }
}

impl Drop for Slab {
    fn drop(&mut self) {
        // SAFETY: `ptr`/`layout` are exactly what `alloc::alloc` returned.
        unsafe {
            alloc::dealloc(self.ptr.as_ptr(), self.layout);
        }
    }
}
