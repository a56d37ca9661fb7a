use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicI64, AtomicU64, AtomicU8, Ordering};

use crossbeam_utils::CachePadded;

use crate::backoff::Backoff;

const EMPTY: u8 = 0;
const OCCUPIED: u8 = 1;

/// One cell of a [`Ring`]: either `EMPTY` or holding a published `T`.
///
/// The handshake is a single atomic word (`state`) guarding a plain
/// `UnsafeCell` payload, bounding the critical-section span to a single
/// memory word.
struct Cell<T> {
    state: AtomicU8,
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Cell<T> {
    fn empty() -> Self {
        Self {
            state: AtomicU8::new(EMPTY),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    fn occupied(value: T) -> Self {
        Self {
            state: AtomicU8::new(OCCUPIED),
            value: UnsafeCell::new(MaybeUninit::new(value)),
        }
    }
}

// SAFETY: access to `value` is serialized by the `state` handshake below —
// a reader only ever touches a cell after observing OCCUPIED (and a writer
// only after observing EMPTY), so at most one thread holds a live reference
// to a given cell's payload at a time.
unsafe impl<T: Send> Send for Cell<T> {}
unsafe impl<T: Send> Sync for Cell<T> {}

/// A bounded concurrent ring: fetch-and-add cursors over a power-of-two
/// array of cells, each cell gated by an empty/occupied handshake.
///
/// Reused verbatim by both the Allocator (a freelist bag of slab indices)
/// and the Queue (a FIFO of in-flight messages) — one structure, two
/// instantiations with producer/consumer roles swapped.
pub struct Ring<T: Copy> {
    cells: Box<[Cell<T>]>,
    mask: usize,
    /// Cursor used by whichever operation *publishes* into a cell
    /// (`free` for the Allocator, `write` for the Queue).
    give_cursor: CachePadded<AtomicU64>,
    /// Cursor used by whichever operation *drains* a cell
    /// (`alloc` for the Allocator, `tryread`/`read` for the Queue).
    take_cursor: CachePadded<AtomicU64>,
    /// Signed count of items currently available to `take`. May transiently
    /// go negative while a `take` speculatively reserves ahead of `give`.
    count: CachePadded<AtomicI64>,
}

// SAFETY: the ring's own atomics establish the happens-before edges the
// cell handshake needs; `Cell<T>` is `Sync` under the same condition.
unsafe impl<T: Copy + Send> Send for Ring<T> {}
unsafe impl<T: Copy + Send> Sync for Ring<T> {}

impl<T: Copy> Ring<T> {
    /// An empty ring with room for at least `logical_bound` items (rounded
    /// up to a power of two for the cursor mask).
    pub fn empty(logical_bound: usize) -> Self {
        let capacity = logical_bound.max(1).next_power_of_two();
        let cells = (0..capacity).map(|_| Cell::empty()).collect();
        Self {
            cells,
            mask: capacity - 1,
            give_cursor: CachePadded::new(AtomicU64::new(0)),
            take_cursor: CachePadded::new(AtomicU64::new(0)),
            count: CachePadded::new(AtomicI64::new(0)),
        }
    }

    /// A ring pre-seeded with `values` (exactly `logical_bound` of them),
    /// used by the Allocator to start with every slab slot available.
    pub fn seeded<I: Iterator<Item = T>>(logical_bound: usize, values: I) -> Self {
        let capacity = logical_bound.max(1).next_power_of_two();
        let mut cells = Vec::with_capacity(capacity);
        let mut seeded_count = 0usize;
        for value in values.take(logical_bound) {
            cells.push(Cell::occupied(value));
            seeded_count += 1;
        }
        debug_assert_eq!(
            seeded_count, logical_bound,
            "seeded() requires exactly logical_bound initial values"
        );
        while cells.len() < capacity {
            cells.push(Cell::empty());
        }
        Self {
            cells: cells.into_boxed_slice(),
            mask: capacity - 1,
            give_cursor: CachePadded::new(AtomicU64::new(seeded_count as u64)),
            take_cursor: CachePadded::new(AtomicU64::new(0)),
            count: CachePadded::new(AtomicI64::new(seeded_count as i64)),
        }
    }

    /// Non-blocking: reserve and drain one occupied cell, or `None` if the
    /// ring was empty at the moment of reservation.
    pub fn take(&self) -> Option<T> {
        let prev = self.count.fetch_sub(1, Ordering::SeqCst);
        if prev <= 0 {
            self.count.fetch_add(1, Ordering::SeqCst);
            return None;
        }

        let idx = (self.take_cursor.fetch_add(1, Ordering::SeqCst) as usize) & self.mask;
        let cell = &self.cells[idx];

        let mut backoff = Backoff::new();
        let mut spins = 0u32;
        while cell.state.load(Ordering::SeqCst) != OCCUPIED {
            if spins == 1 {
                tracing::trace!(idx, "take waiting on cell handshake past first spin");
            }
            backoff.snooze();
            spins += 1;
        }
        std::sync::atomic::fence(Ordering::SeqCst);

        // SAFETY: state just observed OCCUPIED under SeqCst, so the value
        // written by the matching `give` is visible and exclusively ours —
        // no other `take` can have reserved this same cell index until we
        // mark it EMPTY below.
        let value = unsafe { cell.value.get().read().assume_init() };
        cell.state.store(EMPTY, Ordering::SeqCst);
        Some(value)
    }

    /// Publish one value into the ring. Never fails — by construction the
    /// caller holds at most `capacity` outstanding reservations, so the
    /// handshake spin below is only ever a brief window where a slower
    /// counterpart hasn't cleared its cell yet.
    pub fn give(&self, value: T) {
        let idx = (self.give_cursor.fetch_add(1, Ordering::SeqCst) as usize) & self.mask;
        let cell = &self.cells[idx];

        let mut backoff = Backoff::new();
        let mut spins = 0u32;
        while cell.state.load(Ordering::SeqCst) != EMPTY {
            if spins == 1 {
                tracing::trace!(idx, "give waiting on cell handshake past first spin");
            }
            backoff.snooze();
            spins += 1;
        }

        // SAFETY: state just observed EMPTY under SeqCst, so no live `take`
        // can still be reading this cell's prior payload.
        unsafe {
            cell.value.get().write(MaybeUninit::new(value));
        }
        cell.state.store(OCCUPIED, Ordering::SeqCst);
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of cells in the ring (the power-of-two capacity, not the
    /// caller-requested logical bound).
    pub fn capacity(&self) -> usize {
        self.mask + 1
    }
}
